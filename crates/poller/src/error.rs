//! Error types for poller construction.
//!
//! Poll failures are never errors; they are classified into an `Outcome`.

/// Errors produced while building the poller.
#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}
