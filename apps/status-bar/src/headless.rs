//! Log-only frontend for platforms without a native status item.

use cse_status_tray::{PresenterState, TrayFrontend, TrayUpdate};

/// Applies updates until shutdown and reports each change to the log.
///
/// Blocks the calling thread. Returns the final displayed state.
pub fn run(frontend: TrayFrontend, launch_at_login: bool) -> PresenterState {
    let TrayFrontend {
        config,
        event_tx,
        mut update_rx,
    } = frontend;

    let mut state = PresenterState::new();
    state.set_launch_at_login(launch_at_login);
    tracing::info!(
        title = config.title.trim(),
        status = %state.status_line(),
        "no native status item on this platform, reporting to the log"
    );

    while let Some(update) = update_rx.blocking_recv() {
        match update {
            TrayUpdate::Status(result) => {
                if state.apply(&result) {
                    let clocks = state.clocks();
                    tracing::info!(
                        seq = result.seq,
                        observed_at = %result.observed_at,
                        status = %state.status_line(),
                        color = ?state.color(),
                        local = %clocks.local,
                        exchange = %clocks.exchange,
                        "market status updated"
                    );
                }
            }
            TrayUpdate::LaunchAtLogin(enabled) => {
                state.set_launch_at_login(enabled);
                tracing::info!(enabled, "launch at login changed");
            }
            TrayUpdate::Shutdown => break,
        }
    }

    // Held until here so the core keeps waiting for menu events.
    drop(event_tx);
    state
}
