use thiserror::Error;

/// Reasons an expense is rejected before it reaches the ledger.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Amount required")]
    MissingAmount,
    #[error("Amount must be numeric, got `{0}`")]
    NonNumericAmount(String),
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(f64),
    #[error("Invalid date: `{0}`")]
    InvalidDate(String),
}

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// True when the failure came from input validation rather than storage.
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
