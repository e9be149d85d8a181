//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayoutError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gateway rejected request: {0}")]
    Rejected(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, PayoutError>;

/// Field-level problems found before any network call is made.
///
/// These map onto inline form errors; none of them is fatal and none of
/// them blocks editing other fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Enter a valid amount")]
    AmountInvalid,

    #[error("Minimum withdrawal is {0} kobo")]
    AmountBelowFloor(u64),

    #[error("Amount exceeds your cleared balance")]
    AmountExceedsCleared,

    #[error("Select or add a destination account first")]
    NoBeneficiary,
}
