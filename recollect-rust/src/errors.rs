use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecollectError {
    /// Required input was missing or malformed. Raised before any network
    /// call is attempted.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The upstream page answered with a non-success status.
    #[error("Failed to fetch URL (Status {status})")]
    Fetch { status: reqwest::StatusCode },
    /// The outbound request itself failed (DNS, TLS, connection reset...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type RecollectResult<T> = Result<T, RecollectError>;
