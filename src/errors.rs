use thiserror::Error;

/// Failures an expense operation can surface. An ambiguous match is
/// deliberately not listed here: several records matching the criteria is a
/// structured outcome the caller narrows down, not a failure
/// (see `service::UpdateOutcome`).
#[derive(Debug, Error)]
pub enum OpError {
    #[error("Invalid date format: {0}")]
    InvalidDate(String),
    #[error("No search criteria provided to identify the expense.")]
    NoCriteria,
    #[error("No matching expense found.")]
    NotFound,
    #[error("No update fields provided.")]
    NoUpdateFields,
    #[error("Storage failure: {0}")]
    Store(String),
}

impl From<anyhow::Error> for OpError {
    fn from(err: anyhow::Error) -> Self {
        OpError::Store(format!("{err:#}"))
    }
}
