use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::dates;
use crate::errors::OpError;
use crate::filter::{FieldValues, Filter};
use crate::models::{CategoryTotal, Expense};
use crate::store::Store;

/// Input for the add operation. The service normalizes the date and stamps
/// `created_at` itself; the caller never supplies either in final form.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub date: String,
    pub amount: Decimal,
    pub category: String,
    pub subcategory: String,
    pub note: String,
    pub payment_method: String,
}

/// One entry of an ambiguous-match report.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub index: usize,
    pub expense: Expense,
}

/// How an update-without-id call resolved. `Ambiguous` is a first-class
/// outcome, never silently collapsed: the caller adds criteria and retries.
#[derive(Debug)]
pub enum UpdateOutcome {
    Updated { id: i64 },
    Ambiguous(Vec<Candidate>),
}

/// Expense operations over an injected store. Holds no caches or counters;
/// every call re-reads whatever it needs.
pub struct ExpenseService<S> {
    store: S,
}

impl<S: Store> ExpenseService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert a new expense and return its id. No duplicate detection:
    /// repeated identical adds are distinct records.
    pub fn add(&self, input: NewExpense) -> Result<i64, OpError> {
        let expense = Expense {
            id: None,
            date: dates::normalize(&input.date)?,
            amount: input.amount,
            category: input.category,
            subcategory: input.subcategory,
            note: input.note,
            payment_method: input.payment_method,
            created_at: Utc::now().to_rfc3339(),
        };
        let id = self.store.insert(&expense)?;
        debug!(id, "expense inserted");
        Ok(id)
    }

    /// Every expense, date ascending, insertion order breaking ties.
    pub fn list_all(&self) -> Result<Vec<Expense>, OpError> {
        Ok(self.store.find(&Filter::default())?)
    }

    /// Expenses with `date ∈ [start, end]` inclusive. An inverted range
    /// matches nothing.
    pub fn list_range(&self, start: &str, end: &str) -> Result<Vec<Expense>, OpError> {
        Ok(self.store.find(&Filter::date_range(start, end)?)?)
    }

    /// Per-category totals over the inclusive range, ascending by category
    /// name. A sentinel-empty category means no category filter.
    pub fn summarize(
        &self,
        start: &str,
        end: &str,
        category: Option<&str>,
    ) -> Result<Vec<CategoryTotal>, OpError> {
        let filter = Filter::date_range(start, end)?.and_text("category", category);
        let totals = self.store.sum_by_category(&filter)?;
        Ok(totals
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect())
    }

    /// Update a record identified by partial criteria instead of an id.
    ///
    /// Zero matches fail with `NotFound`; several come back as an indexed
    /// `Ambiguous` report for the caller to narrow; exactly one is updated
    /// in place. The lookup and the write are separate statements, so two
    /// concurrent calls against the same match race and the last write wins.
    pub fn update_matching(
        &self,
        criteria: &FieldValues,
        changes: &FieldValues,
    ) -> Result<UpdateOutcome, OpError> {
        let filter = Filter::build(criteria)?;
        if filter.is_empty() {
            return Err(OpError::NoCriteria);
        }

        let matches = self.store.find(&filter)?;
        if matches.is_empty() {
            return Err(OpError::NotFound);
        }
        if matches.len() > 1 {
            info!(count = matches.len(), "criteria matched several expenses");
            let candidates = matches
                .into_iter()
                .enumerate()
                .map(|(index, expense)| Candidate { index, expense })
                .collect();
            return Ok(UpdateOutcome::Ambiguous(candidates));
        }

        let fields = Filter::build(changes)?;
        if fields.is_empty() {
            return Err(OpError::NoUpdateFields);
        }
        let id = matches[0]
            .id
            .ok_or_else(|| OpError::Store("stored expense has no id".into()))?;
        if !self.store.update_by_id(id, &fields)? {
            return Err(OpError::NotFound);
        }
        Ok(UpdateOutcome::Updated { id })
    }
}
