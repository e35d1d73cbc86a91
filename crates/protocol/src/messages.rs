use serde::{Deserialize, Serialize};

/// Body posted to the status endpoint.
///
/// The endpoint ignores the payload; it is sent only because the service
/// has always received it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStatusRequest {
    pub param1: String,
}

impl Default for MarketStatusRequest {
    fn default() -> Self {
        Self {
            param1: "value1".into(),
        }
    }
}

/// Successful response from the status endpoint.
///
/// Only `status` is read; any other fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStatusResponse {
    pub status: String,
}
