//! Dropdown menu model for the status item.

/// Actions that can be triggered from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Poll immediately.
    Refresh,
    /// Flip the launch-at-login registration.
    ToggleLaunchAtLogin,
    /// User requested to quit the application.
    Quit,
}

/// A single menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Display text. Empty for separators.
    pub label: String,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Optional action triggered on click.
    pub action: Option<MenuAction>,
    /// Checkmark state for toggle items.
    pub checked: Option<bool>,
    /// Single-character shortcut, used with the platform command modifier.
    pub shortcut: Option<char>,
}

impl MenuItem {
    fn info(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: false,
            action: None,
            checked: None,
            shortcut: None,
        }
    }

    fn action(label: &str, action: MenuAction, shortcut: char) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            action: Some(action),
            checked: None,
            shortcut: Some(shortcut),
        }
    }

    /// Separator (represented as disabled empty item).
    fn separator() -> Self {
        Self::info(String::new())
    }

    /// Returns `true` for separator entries.
    pub fn is_separator(&self) -> bool {
        self.label.is_empty() && self.action.is_none()
    }
}

/// Current state used to build the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    /// Full status line, e.g. `Market Status: Market is Open`.
    pub status_line: String,
    /// Local clock label.
    pub local_clock: String,
    /// Exchange clock label.
    pub exchange_clock: String,
    /// Whether launch at login is registered.
    pub launch_at_login: bool,
}

impl MenuState {
    /// Builds the menu items from the current state.
    ///
    /// The layout is fixed; only labels and the checkmark change, so a
    /// backend can build native items once and update them by index.
    pub fn build_menu(&self) -> Vec<MenuItem> {
        let mut login = MenuItem::action("Launch at Login", MenuAction::ToggleLaunchAtLogin, 'l');
        login.checked = Some(self.launch_at_login);

        vec![
            MenuItem::info(self.status_line.clone()),
            MenuItem::separator(),
            MenuItem::action("Refresh Now", MenuAction::Refresh, 'r'),
            MenuItem::separator(),
            MenuItem::info(self.local_clock.clone()),
            MenuItem::info(self.exchange_clock.clone()),
            MenuItem::separator(),
            login,
            MenuItem::separator(),
            MenuItem::action("Quit", MenuAction::Quit, 'q'),
        ]
    }
}
