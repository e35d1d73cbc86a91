use chrono::{DateTime, Local, Utc};
use chrono_tz::Asia::Colombo;
use cse_status_protocol::constants::EXCHANGE_CLOCK_LABEL;

/// Shown until the first clock refresh.
pub const CLOCK_PLACEHOLDER: &str = "--:--:--";

const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Menu labels for the local and exchange clocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clocks {
    pub local: String,
    pub exchange: String,
}

impl Clocks {
    /// Labels before any time has been rendered.
    pub fn placeholder() -> Self {
        Self {
            local: format!("Local: {CLOCK_PLACEHOLDER}"),
            exchange: format!("{EXCHANGE_CLOCK_LABEL}: {CLOCK_PLACEHOLDER}"),
        }
    }

    /// Labels for the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            local: format!("Local: {}", now.with_timezone(&Local).format(CLOCK_FORMAT)),
            exchange: format!(
                "{EXCHANGE_CLOCK_LABEL}: {}",
                now.with_timezone(&Colombo).format(CLOCK_FORMAT)
            ),
        }
    }
}

impl Default for Clocks {
    fn default() -> Self {
        Self::placeholder()
    }
}
