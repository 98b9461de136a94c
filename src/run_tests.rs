#![allow(clippy::unwrap_used)]

use serde_json::json;

use super::*;
use crate::service::ExpenseService;
use crate::store::SqliteStore;

fn host() -> ToolHost<SqliteStore> {
    let service = ExpenseService::new(SqliteStore::open_in_memory().unwrap());
    ToolHost::new(service, None)
}

#[test]
fn test_request_line_routes_to_tool() {
    let host = host();
    let line = r#"{"tool": "add_expense", "arguments": {"date": "1-12-25", "amount": 9.99, "category": "Food"}}"#;
    let reply = handle_line(&host, line);
    assert_eq!(reply["status"], "success");

    let reply = handle_line(&host, r#"{"tool": "list_expenses"}"#);
    assert_eq!(reply.as_array().unwrap().len(), 1);
    assert_eq!(reply[0]["date"], "2025-12-01");
}

#[test]
fn test_malformed_json_request() {
    let reply = handle_line(&host(), "{not json");
    assert_eq!(reply["status"], "error");
    assert!(reply["message"].as_str().unwrap().contains("invalid request"));
}

#[test]
fn test_request_without_tool_name() {
    let reply = handle_line(&host(), r#"{"arguments": {}}"#);
    assert_eq!(reply["status"], "error");
    assert!(reply["message"]
        .as_str()
        .unwrap()
        .contains("missing a tool name"));
}

#[test]
fn test_missing_arguments_default_to_empty_object() {
    let reply = handle_line(&host(), r#"{"tool": "list_categories"}"#);
    assert!(reply["categories"].is_array());
}
