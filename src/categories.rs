use serde_json::{json, Value};
use std::path::Path;
use tracing::warn;

/// Built-in category list, served when no override file exists. Pure
/// configuration data for the assistant, not enforced at the storage layer.
const DEFAULT_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Travel",
    "Education",
    "Business",
    "Other",
];

/// The category resource: a `categories.json` next to the database wins
/// when it parses, otherwise the built-in defaults are served.
pub(crate) fn load(override_path: Option<&Path>) -> Value {
    if let Some(path) = override_path {
        if let Ok(raw) = std::fs::read_to_string(path) {
            match serde_json::from_str::<Value>(&raw) {
                Ok(parsed) => return parsed,
                Err(err) => warn!("ignoring malformed {}: {err}", path.display()),
            }
        }
    }
    json!({ "categories": DEFAULT_CATEGORIES })
}

#[cfg(test)]
#[path = "categories_tests.rs"]
mod tests;
