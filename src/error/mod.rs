//! Error types for the Vantage client.

use thiserror::Error;

/// Primary error type for client operations.
///
/// HTTP-level failures (non-2xx statuses) are deliberately *not* errors:
/// the fetch wrapper hands the response back and leaves that judgment to
/// the caller. Only transport-level problems surface here.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ClientError>;
