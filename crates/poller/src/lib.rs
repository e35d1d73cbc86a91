//! Market status poller.
//!
//! Issues one POST to the exchange status endpoint per poll cycle, folds
//! every transport, HTTP, and body failure into a closed
//! [`Outcome`](cse_status_protocol::Outcome), and delivers exactly one
//! [`StatusResult`](cse_status_protocol::StatusResult) per cycle through a
//! callback.
//!
//! Polls run on a fixed schedule (immediately, then every interval) inside a
//! single tokio task. Manual refreshes are funneled into the same task, so
//! two polls never overlap.

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod poller;

pub use client::{SourceFuture, StatusClient, StatusSource};
pub use config::PollerConfig;
pub use error::PollerError;
pub use poller::{Poller, PollerHandle, ResultFn};
