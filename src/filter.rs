use rust_decimal::Decimal;

use crate::dates;
use crate::errors::OpError;

/// Raw, possibly-absent field values exactly as a caller supplied them.
/// `Default` gives the all-absent set.
#[derive(Debug, Default, Clone)]
pub struct FieldValues {
    pub date: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub payment_method: Option<String>,
}

/// A single constraint against a stored column.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    TextEq(&'static str, String),
    AmountEq(Decimal),
    /// Inclusive canonical-date bounds.
    DateBetween(String, String),
}

/// Sparse set of field constraints. Absent fields never participate in
/// matching, so a caller can identify a record by whatever subset of its
/// fields it remembers. The same structure doubles as the field set of a
/// partial update, where values overwrite instead of select.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// Build an equality filter from whatever fields are present. Dates are
    /// normalized before inclusion; sentinel empty forms drop the field.
    pub fn build(values: &FieldValues) -> Result<Self, OpError> {
        let mut filter = Self::default();
        if let Some(date) = supplied(values.date.as_deref()) {
            filter
                .clauses
                .push(Clause::TextEq("date", dates::normalize(date)?));
        }
        if let Some(amount) = values.amount {
            filter.clauses.push(Clause::AmountEq(amount));
        }
        let text_fields = [
            ("category", values.category.as_deref()),
            ("subcategory", values.subcategory.as_deref()),
            ("note", values.note.as_deref()),
            ("payment_method", values.payment_method.as_deref()),
        ];
        for (column, value) in text_fields {
            if let Some(value) = supplied(value) {
                filter
                    .clauses
                    .push(Clause::TextEq(column, value.to_string()));
            }
        }
        Ok(filter)
    }

    /// Filter for `date ∈ [start, end]` inclusive, both ends normalized.
    /// An inverted range is a valid filter that matches nothing.
    pub fn date_range(start: &str, end: &str) -> Result<Self, OpError> {
        let clause = Clause::DateBetween(dates::normalize(start)?, dates::normalize(end)?);
        Ok(Self {
            clauses: vec![clause],
        })
    }

    /// Add a text equality constraint unless the value is a sentinel empty.
    pub fn and_text(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = supplied(value) {
            self.clauses
                .push(Clause::TextEq(column, value.to_string()));
        }
        self
    }

    /// An empty filter is constructible, but callers treating it as an
    /// identity discriminator must reject it (`OpError::NoCriteria`).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

/// `None`, empty or whitespace-only strings, and the literal `"null"` /
/// `"None"` an assistant runtime sometimes passes through all mean
/// "field not supplied".
fn supplied(value: Option<&str>) -> Option<&str> {
    match value.map(str::trim) {
        None | Some("") | Some("null") | Some("None") => None,
        Some(value) => Some(value),
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
