//! Tray handle, events, and update types.
//!
//! The native status item depends on `tray-icon` and `tao`, which require
//! platform-specific system libraries. This module defines the
//! channel-based interface that the application core uses to communicate
//! with the menu-bar frontend, independent of the GUI backend.

use cse_status_protocol::StatusResult;
use cse_status_protocol::constants::STATUS_ITEM_TITLE;
use tokio::sync::mpsc;

use crate::menu::MenuAction;

/// Configuration for the status item.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Text shown next to the icon.
    pub title: String,
    /// Hover tooltip.
    pub tooltip: String,
    /// Icon edge length in pixels.
    pub icon_size: u32,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            title: STATUS_ITEM_TITLE.into(),
            tooltip: "CSE Market Status".into(),
            icon_size: 16,
        }
    }
}

/// Events emitted by the frontend to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// User clicked "Refresh Now".
    RefreshRequested,
    /// User clicked "Launch at Login".
    ToggleLaunchAtLogin,
    /// User clicked "Quit" in the menu.
    QuitRequested,
}

impl From<MenuAction> for TrayEvent {
    fn from(action: MenuAction) -> Self {
        match action {
            MenuAction::Refresh => Self::RefreshRequested,
            MenuAction::ToggleLaunchAtLogin => Self::ToggleLaunchAtLogin,
            MenuAction::Quit => Self::QuitRequested,
        }
    }
}

/// Updates sent from the core to the frontend.
#[derive(Debug, Clone)]
pub enum TrayUpdate {
    /// A poll completed.
    Status(StatusResult),
    /// Launch-at-login registration state after a toggle.
    LaunchAtLogin(bool),
    /// Request frontend shutdown.
    Shutdown,
}

/// Frontend side of the channel pair, owned by the UI thread.
pub struct TrayFrontend {
    pub config: TrayConfig,
    /// Send menu events to the core.
    pub event_tx: mpsc::UnboundedSender<TrayEvent>,
    /// Receive updates from the core.
    pub update_rx: mpsc::UnboundedReceiver<TrayUpdate>,
}

/// Handle for communicating with the frontend from the core.
///
/// This is the async side of the tray interface. The frontend runs on the
/// UI thread and communicates via channels.
pub struct TrayHandle {
    /// Send updates to the frontend.
    update_tx: mpsc::UnboundedSender<TrayUpdate>,
    /// Receive events from the frontend.
    event_rx: mpsc::UnboundedReceiver<TrayEvent>,
}

impl TrayHandle {
    /// Creates a new tray handle with its frontend counterpart.
    pub fn new(config: TrayConfig) -> (Self, TrayFrontend) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let handle = Self {
            update_tx,
            event_rx,
        };
        let frontend = TrayFrontend {
            config,
            event_tx,
            update_rx,
        };

        (handle, frontend)
    }

    /// Returns a callback that forwards poll results from any thread.
    ///
    /// Results sent after the frontend is gone are discarded.
    pub fn status_sink(&self) -> impl Fn(StatusResult) + Send + Sync + 'static {
        let tx = self.update_tx.clone();
        move |result| {
            let _ = tx.send(TrayUpdate::Status(result));
        }
    }

    /// Notifies the frontend of the launch-at-login state.
    pub fn set_launch_at_login(&self, enabled: bool) {
        let _ = self.update_tx.send(TrayUpdate::LaunchAtLogin(enabled));
    }

    /// Requests the frontend to shut down.
    pub fn shutdown(&self) {
        let _ = self.update_tx.send(TrayUpdate::Shutdown);
    }

    /// Waits for the next frontend event. `None` once the frontend is gone.
    pub async fn recv_event(&mut self) -> Option<TrayEvent> {
        self.event_rx.recv().await
    }
}
