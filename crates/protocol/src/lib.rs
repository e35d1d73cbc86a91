pub mod constants;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use messages::{MarketStatusRequest, MarketStatusResponse};
pub use types::{NetworkReason, Outcome, ParseFailure, StatusResult};
