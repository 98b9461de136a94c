use rust_decimal::Decimal;
use serde::Serialize;

/// A single expense entry. `date` always holds the canonical `YYYY-MM-DD`
/// form produced by `dates::normalize`; `created_at` is stamped once at
/// insert and never touched again.
#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    pub id: Option<i64>,
    pub date: String,
    pub amount: Decimal,
    pub category: String,
    pub subcategory: String,
    pub note: String,
    pub payment_method: String,
    pub created_at: String,
}

/// One bucket of a category summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}
