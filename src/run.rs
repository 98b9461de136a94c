use anyhow::Result;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::info;

use crate::store::Store;
use crate::tools::{ToolHost, TOOLS};

/// Serve tool calls over stdin/stdout: one JSON request per line in, one
/// JSON reply per line out. Stdout carries protocol replies only;
/// diagnostics go to stderr.
pub(crate) fn serve<S: Store>(host: &ToolHost<S>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    info!("serving tool calls on stdin");
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_line(host, &line);
        serde_json::to_writer(&mut stdout, &reply)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_line<S: Store>(host: &ToolHost<S>, line: &str) -> Value {
    let request: Value = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => {
            return json!({ "status": "error", "message": format!("invalid request: {err}") })
        }
    };
    let Some(tool) = request.get("tool").and_then(Value::as_str) else {
        return json!({ "status": "error", "message": "request is missing a tool name" });
    };
    let args = request
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));
    host.dispatch(tool, &args)
}

/// One-shot invocation: `expensord <tool> ['<json-args>']`.
pub(crate) fn one_shot<S: Store>(host: &ToolHost<S>, args: &[String]) -> Result<()> {
    let tool = args[1].as_str();
    match tool {
        "--help" | "-h" | "help" => {
            print_usage();
            return Ok(());
        }
        "--version" | "-V" | "version" => {
            println!("expensord {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let parsed = match args.get(2) {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|err| anyhow::anyhow!("arguments must be a JSON object: {err}"))?,
        None => json!({}),
    };
    let reply = host.dispatch(tool, &parsed);
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

fn print_usage() {
    println!("Expensord — local expense tracking service for assistant tool calls");
    println!();
    println!("Usage: expensord [tool] ['{{\"key\": \"value\"}}']");
    println!();
    println!("With no arguments, serves line-delimited JSON tool calls on stdin.");
    println!("Tools:");
    for tool in TOOLS {
        println!("  {tool}");
    }
    println!();
    println!("Example: expensord summarize '{{\"start_date\": \"1-1-25\", \"end_date\": \"31-1-25\"}}'");
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
