use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

use crate::categories;
use crate::filter::FieldValues;
use crate::models::Expense;
use crate::service::{Candidate, ExpenseService, NewExpense, UpdateOutcome};
use crate::store::Store;

/// Operation names exposed to the assistant runtime.
pub const TOOLS: &[&str] = &[
    "add_expense",
    "list_expenses",
    "list_expenses_by_date",
    "summarize",
    "update_expense",
    "list_categories",
];

/// The tool-call boundary. Every failure below this point is translated
/// into the uniform `{status: "error", message}` payload here and nowhere
/// else; internal helpers always fail loudly to their caller.
pub struct ToolHost<S> {
    service: ExpenseService<S>,
    categories_path: Option<PathBuf>,
}

impl<S: Store> ToolHost<S> {
    pub fn new(service: ExpenseService<S>, categories_path: Option<PathBuf>) -> Self {
        Self {
            service,
            categories_path,
        }
    }

    pub fn dispatch(&self, tool: &str, args: &Value) -> Value {
        debug!(tool, "dispatching tool call");
        let result = match tool {
            "add_expense" => self.add_expense(args),
            "list_expenses" => self.list_expenses(),
            "list_expenses_by_date" => self.list_expenses_by_date(args),
            "summarize" => self.summarize(args),
            "update_expense" => self.update_expense(args),
            "list_categories" => Ok(categories::load(self.categories_path.as_deref())),
            other => Err(anyhow::anyhow!("unknown tool: {other}")),
        };
        match result {
            Ok(payload) => payload,
            Err(err) => json!({ "status": "error", "message": format!("{err:#}") }),
        }
    }

    fn add_expense(&self, args: &Value) -> Result<Value> {
        let input = NewExpense {
            date: required_str(args, "date")?,
            amount: required_amount(args, "amount")?,
            category: required_str(args, "category")?,
            subcategory: optional_str(args, "subcategory").unwrap_or_default(),
            note: optional_str(args, "note").unwrap_or_default(),
            payment_method: optional_str(args, "payment_method")
                .unwrap_or_else(|| "cash".to_string()),
        };
        let id = self.service.add(input)?;
        Ok(json!({
            "status": "success",
            "id": id,
            "message": "Expense added successfully"
        }))
    }

    fn list_expenses(&self) -> Result<Value> {
        expense_rows(&self.service.list_all()?)
    }

    fn list_expenses_by_date(&self, args: &Value) -> Result<Value> {
        let start = required_str(args, "start_date")?;
        let end = required_str(args, "end_date")?;
        expense_rows(&self.service.list_range(&start, &end)?)
    }

    fn summarize(&self, args: &Value) -> Result<Value> {
        let start = required_str(args, "start_date")?;
        let end = required_str(args, "end_date")?;
        let category = optional_str(args, "category");
        let totals = self
            .service
            .summarize(&start, &end, category.as_deref())?;
        Ok(Value::Array(
            totals
                .iter()
                .map(|t| json!({ "category": t.category, "total_amount": t.total }))
                .collect(),
        ))
    }

    fn update_expense(&self, args: &Value) -> Result<Value> {
        let criteria = field_values(args, "")?;
        let changes = field_values(args, "new_")?;
        match self.service.update_matching(&criteria, &changes)? {
            UpdateOutcome::Updated { id } => Ok(json!({
                "status": "success",
                "id": id,
                "message": "Expense updated successfully"
            })),
            UpdateOutcome::Ambiguous(candidates) => {
                let matches = candidates
                    .iter()
                    .map(candidate_row)
                    .collect::<Result<Vec<_>>>()?;
                Ok(json!({
                    "status": "ambiguous",
                    "message": "Multiple matching expenses found; refine the criteria to narrow to one.",
                    "matches": matches,
                }))
            }
        }
    }
}

fn expense_rows(expenses: &[Expense]) -> Result<Value> {
    serde_json::to_value(expenses).context("Failed to serialize expenses")
}

fn candidate_row(candidate: &Candidate) -> Result<Value> {
    let mut row =
        serde_json::to_value(&candidate.expense).context("Failed to serialize expense")?;
    row["index"] = json!(candidate.index);
    Ok(row)
}

/// Pull the criteria or `new_`-prefixed update fields out of one flat
/// argument object. Sentinel filtering is the filter builder's job, not
/// done here.
fn field_values(args: &Value, prefix: &str) -> Result<FieldValues> {
    let key = |name: &str| format!("{prefix}{name}");
    Ok(FieldValues {
        date: optional_str(args, &key("date")),
        amount: optional_amount(args, &key("amount"))?,
        category: optional_str(args, &key("category")),
        subcategory: optional_str(args, &key("subcategory")),
        note: optional_str(args, &key("note")),
        payment_method: optional_str(args, &key("payment_method")),
    })
}

fn optional_str(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(str::to_string)
}

fn required_str(args: &Value, key: &str) -> Result<String> {
    optional_str(args, key).with_context(|| format!("missing required argument: {key}"))
}

/// Accept JSON numbers and numeric strings; assistant runtimes send both.
fn optional_amount(args: &Value, key: &str) -> Result<Option<Decimal>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(
            Decimal::from_str(&n.to_string())
                .with_context(|| format!("invalid amount for {key}: {n}"))?,
        )),
        Some(Value::String(s)) if matches!(s.trim(), "" | "null" | "None") => Ok(None),
        Some(Value::String(s)) => Ok(Some(
            Decimal::from_str(s.trim())
                .with_context(|| format!("invalid amount for {key}: {s}"))?,
        )),
        Some(other) => bail!("invalid amount for {key}: {other}"),
    }
}

fn required_amount(args: &Value, key: &str) -> Result<Decimal> {
    optional_amount(args, key)?.with_context(|| format!("missing required argument: {key}"))
}
