//! Displayed state, updated from the UI thread only.

use chrono::{DateTime, Utc};
use cse_status_protocol::StatusResult;
use cse_status_protocol::constants::CHECKING_TEXT;
use tracing::debug;

use crate::clock::Clocks;
use crate::menu::MenuState;
use crate::palette::StatusColor;

/// Everything the status item shows.
///
/// [`apply`](Self::apply) is the only way a poll result reaches the
/// display. Results older than the last applied one are ignored, so an
/// out-of-order completion cannot overwrite a newer status.
#[derive(Debug, Clone)]
pub struct PresenterState {
    status_text: String,
    color: StatusColor,
    clocks: Clocks,
    launch_at_login: bool,
    last_seq: u64,
}

impl Default for PresenterState {
    fn default() -> Self {
        Self {
            status_text: CHECKING_TEXT.into(),
            color: StatusColor::Checking,
            clocks: Clocks::placeholder(),
            launch_at_login: false,
            last_seq: 0,
        }
    }
}

impl PresenterState {
    /// Creates the initial "checking" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a poll result. Returns `false` if it was stale and dropped.
    ///
    /// Also refreshes both clocks.
    pub fn apply(&mut self, result: &StatusResult) -> bool {
        if result.seq <= self.last_seq {
            debug!(
                seq = result.seq,
                last_seq = self.last_seq,
                "dropping stale status result"
            );
            return false;
        }

        self.last_seq = result.seq;
        self.status_text = result.outcome.display_text();
        self.color = StatusColor::for_outcome(&result.outcome);
        self.clocks = Clocks::at(Utc::now());
        true
    }

    /// Refreshes the clocks without touching the status.
    pub fn tick_clocks(&mut self, now: DateTime<Utc>) {
        self.clocks = Clocks::at(now);
    }

    /// Records the launch-at-login registration state.
    pub fn set_launch_at_login(&mut self, enabled: bool) {
        self.launch_at_login = enabled;
    }

    /// Status line as shown in the menu.
    pub fn status_line(&self) -> String {
        format!("Market Status: {}", self.status_text)
    }

    pub fn color(&self) -> StatusColor {
        self.color
    }

    pub fn clocks(&self) -> &Clocks {
        &self.clocks
    }

    pub fn launch_at_login(&self) -> bool {
        self.launch_at_login
    }

    /// Sequence number of the last applied result (0 before the first).
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Snapshot for building the menu.
    pub fn menu_state(&self) -> MenuState {
        MenuState {
            status_line: self.status_line(),
            local_clock: self.clocks.local.clone(),
            exchange_clock: self.clocks.exchange.clone(),
            launch_at_login: self.launch_at_login,
        }
    }
}
