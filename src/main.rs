mod categories;
mod dates;
mod errors;
mod filter;
mod models;
mod run;
mod service;
mod store;
mod tools;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    // Stdout is the protocol channel; all diagnostics go to stderr.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    let store = store::SqliteStore::open(&data_dir.join("expenses.db"))?;
    let service = service::ExpenseService::new(store);
    let host = tools::ToolHost::new(service, Some(data_dir.join("categories.json")));

    match args.len() {
        1 => run::serve(&host),
        _ => run::one_shot(&host, &args),
    }
}

fn get_data_dir() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "expensord", "Expensord")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
