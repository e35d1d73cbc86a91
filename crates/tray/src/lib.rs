//! Menu-bar presenter for the market status poller.
//!
//! Holds the displayed state (status line, icon color, clocks, launch at
//! login) and turns it into a backend-independent menu model and icon
//! bitmap. The native status item lives in the application crate.
//!
//! The presenter communicates with the application core via channels:
//! - [`TrayEvent`]: events from the menu to the core (refresh, toggle, quit)
//! - [`TrayUpdate`]: updates from the core to the menu (status, login state)
//!
//! # Threading
//! [`PresenterState`] is owned by the UI thread and mutated only there.

mod clock;
mod menu;
mod palette;
mod presenter;
mod tray;

pub use clock::{CLOCK_PLACEHOLDER, Clocks};
pub use menu::{MenuAction, MenuItem, MenuState};
pub use palette::{IconImage, StatusColor, circle_icon};
pub use presenter::PresenterState;
pub use tray::{TrayConfig, TrayEvent, TrayFrontend, TrayHandle, TrayUpdate};
