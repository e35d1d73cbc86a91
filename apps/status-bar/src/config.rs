//! Application configuration.
//!
//! Everything is fixed at build time; `RUST_LOG` is the only runtime knob.

use std::time::Duration;

use cse_status_poller::PollerConfig;
use cse_status_tray::TrayConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub poller: PollerConfig,
    pub tray: TrayConfig,
    /// How long shutdown waits for an in-flight poll before abandoning it.
    pub shutdown_grace: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poller: PollerConfig::default(),
            tray: TrayConfig::default(),
            shutdown_grace: Duration::from_secs(2),
        }
    }
}
