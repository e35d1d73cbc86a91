use std::time::Duration;

use cse_status_protocol::constants::{
    DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT,
};

/// Poller settings, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    /// Status endpoint receiving the POST.
    pub endpoint_url: String,
    /// Time between scheduled polls.
    pub interval: Duration,
    /// Bound on a single request, connect through body.
    pub request_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.into(),
            interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl PollerConfig {
    /// Default settings pointed at another endpoint (mock servers in tests).
    pub fn with_endpoint(url: impl Into<String>) -> Self {
        Self {
            endpoint_url: url.into(),
            ..Self::default()
        }
    }
}
