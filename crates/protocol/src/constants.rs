use std::time::Duration;

/// Market status endpoint of the Colombo Stock Exchange.
pub const DEFAULT_ENDPOINT: &str = "https://www.cse.lk/api/marketStatus";

/// Time between scheduled polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Upper bound on a single status request, connect through body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Short label for the exchange clock line.
pub const EXCHANGE_CLOCK_LABEL: &str = "Colombo";

/// Title shown next to the status icon.
pub const STATUS_ITEM_TITLE: &str = " CSE";

/// Display text used before the first poll completes.
pub const CHECKING_TEXT: &str = "Checking...";
