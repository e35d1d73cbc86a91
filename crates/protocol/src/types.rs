use std::fmt;

use chrono::{DateTime, Utc};

/// Transport-level failure reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkReason {
    /// The machine has no usable network.
    NoConnectivity,
    /// Name resolution failed or the host refused / could not be reached.
    HostUnreachable,
    /// The request did not complete within the request timeout.
    Timeout,
    /// Any other transport error, with a short machine-readable code.
    Other(String),
}

/// Why a 2xx body could not be turned into a status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// Body is not valid JSON.
    Malformed,
    /// Body is JSON but has no string `status` field at the top level.
    MissingStatus,
}

/// Classified result of one poll cycle.
///
/// Parse-success variants carry the verbatim status text from the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Open(String),
    Closed(String),
    Unknown(String),
    NetworkError(NetworkReason),
    ServerError(u16),
    ParseError(ParseFailure),
}

impl Outcome {
    /// Returns `true` for the failure variants (network, server, parse).
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::NetworkError(_) | Self::ServerError(_) | Self::ParseError(_)
        )
    }

    /// Human-readable text shown after `Market Status: `.
    pub fn display_text(&self) -> String {
        match self {
            Self::Open(text) | Self::Closed(text) | Self::Unknown(text) => text.clone(),
            Self::NetworkError(reason) => reason.to_string(),
            Self::ServerError(code) => format!("Server error: {code}"),
            Self::ParseError(ParseFailure::Malformed) => "Data parsing error".into(),
            Self::ParseError(ParseFailure::MissingStatus) => "Invalid response format".into(),
        }
    }
}

impl fmt::Display for NetworkReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConnectivity => f.write_str("No internet connection"),
            Self::HostUnreachable => f.write_str("Cannot connect to CSE"),
            Self::Timeout => f.write_str("Connection timed out"),
            Self::Other(code) => write!(f, "Network error: {code}"),
        }
    }
}

/// One classified poll, produced once per cycle and superseded by the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResult {
    /// Issue order of the poll; higher is newer.
    pub seq: u64,
    pub outcome: Outcome,
    pub observed_at: DateTime<Utc>,
}

impl StatusResult {
    /// Creates a result stamped with the current time.
    pub fn new(seq: u64, outcome: Outcome) -> Self {
        Self {
            seq,
            outcome,
            observed_at: Utc::now(),
        }
    }
}
