//! Native status item on macOS and Windows (`tao` event loop + `tray-icon`).
//!
//! Runs on the main thread. Core updates arrive through a bridge thread
//! that forwards the tray update channel into the event loop, so every
//! widget mutation happens on the UI thread.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use chrono::Utc;
use cse_status_tray::{
    MenuAction, MenuItem as MenuEntry, PresenterState, StatusColor, TrayConfig, TrayEvent,
    TrayFrontend, TrayUpdate, circle_icon,
};
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tao::platform::run_return::EventLoopExtRunReturn;
use tray_icon::menu::accelerator::{Accelerator, Code, Modifiers};
use tray_icon::menu::{CheckMenuItem, Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const CLOCK_TICK: Duration = Duration::from_secs(1);

#[cfg(target_os = "macos")]
const SHORTCUT_MODIFIER: Modifiers = Modifiers::SUPER;
#[cfg(not(target_os = "macos"))]
const SHORTCUT_MODIFIER: Modifiers = Modifiers::CONTROL;

#[derive(Debug)]
enum UserEvent {
    Menu(MenuEvent),
    Update(TrayUpdate),
    /// The core dropped its side of the update channel.
    Disconnected,
}

enum NativeItem {
    Plain(MenuItem),
    Check(CheckMenuItem),
    Separator,
}

/// Native menu mirroring [`MenuEntry`] rows by index.
struct NativeMenu {
    menu: Menu,
    items: Vec<NativeItem>,
    actions: HashMap<MenuId, MenuAction>,
}

impl NativeMenu {
    fn build(entries: &[MenuEntry]) -> anyhow::Result<Self> {
        let menu = Menu::new();
        let mut items = Vec::with_capacity(entries.len());
        let mut actions = HashMap::new();

        for entry in entries {
            if entry.is_separator() {
                menu.append(&PredefinedMenuItem::separator())?;
                items.push(NativeItem::Separator);
                continue;
            }

            let accelerator = entry.shortcut.and_then(accelerator);
            let (id, item) = match entry.checked {
                Some(checked) => {
                    let item =
                        CheckMenuItem::new(&entry.label, entry.enabled, checked, accelerator);
                    menu.append(&item)?;
                    (item.id().clone(), NativeItem::Check(item))
                }
                None => {
                    let item = MenuItem::new(&entry.label, entry.enabled, accelerator);
                    menu.append(&item)?;
                    (item.id().clone(), NativeItem::Plain(item))
                }
            };
            if let Some(action) = entry.action {
                actions.insert(id, action);
            }
            items.push(item);
        }

        Ok(Self {
            menu,
            items,
            actions,
        })
    }

    fn update(&self, entries: &[MenuEntry]) {
        for (item, entry) in self.items.iter().zip(entries) {
            match item {
                NativeItem::Plain(item) => item.set_text(&entry.label),
                NativeItem::Check(item) => {
                    item.set_text(&entry.label);
                    item.set_checked(entry.checked.unwrap_or(false));
                }
                NativeItem::Separator => {}
            }
        }
    }

    fn action(&self, id: &MenuId) -> Option<MenuAction> {
        self.actions.get(id).copied()
    }
}

fn accelerator(key: char) -> Option<Accelerator> {
    let code = match key.to_ascii_lowercase() {
        'l' => Code::KeyL,
        'q' => Code::KeyQ,
        'r' => Code::KeyR,
        _ => return None,
    };
    Some(Accelerator::new(Some(SHORTCUT_MODIFIER), code))
}

fn status_icon(color: StatusColor, size: u32) -> anyhow::Result<Icon> {
    let image = circle_icon(color, size);
    Icon::from_rgba(image.rgba, image.width, image.height)
        .map_err(|e| anyhow!("invalid status icon: {e}"))
}

/// UI-thread state: presenter plus the widgets showing it.
struct StatusItem {
    config: TrayConfig,
    state: PresenterState,
    menu: NativeMenu,
    tray: Option<TrayIcon>,
    shown_color: StatusColor,
}

impl StatusItem {
    fn create_tray(&mut self) -> anyhow::Result<()> {
        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(self.menu.menu.clone()))
            .with_tooltip(&self.config.tooltip)
            .with_title(&self.config.title)
            .with_icon(status_icon(self.state.color(), self.config.icon_size)?)
            .build()?;
        self.shown_color = self.state.color();
        self.tray = Some(tray);
        tracing::info!("status item created");
        Ok(())
    }

    /// Pushes the presenter state into the widgets.
    fn render(&mut self) {
        self.menu.update(&self.state.menu_state().build_menu());

        let color = self.state.color();
        if color == self.shown_color {
            return;
        }
        let Some(tray) = &self.tray else {
            return;
        };
        match status_icon(color, self.config.icon_size) {
            Ok(icon) => match tray.set_icon(Some(icon)) {
                Ok(()) => self.shown_color = color,
                Err(e) => tracing::warn!("failed to update status icon: {e}"),
            },
            Err(e) => tracing::warn!("{e}"),
        }
    }

    fn tick(&mut self) {
        self.state.tick_clocks(Utc::now());
        self.render();
    }

    /// Applies a core update. Returns `false` when the frontend should exit.
    fn on_update(&mut self, update: TrayUpdate) -> bool {
        match update {
            TrayUpdate::Status(result) => {
                if self.state.apply(&result) {
                    tracing::debug!(
                        seq = result.seq,
                        observed_at = %result.observed_at,
                        status = %self.state.status_line(),
                        "status shown"
                    );
                    self.render();
                }
                true
            }
            TrayUpdate::LaunchAtLogin(enabled) => {
                self.state.set_launch_at_login(enabled);
                self.render();
                true
            }
            TrayUpdate::Shutdown => false,
        }
    }
}

/// Runs the native status item until the core shuts it down.
pub fn run(frontend: TrayFrontend, launch_at_login: bool) -> anyhow::Result<()> {
    let TrayFrontend {
        config,
        event_tx,
        mut update_rx,
    } = frontend;

    let mut event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();

    #[cfg(target_os = "macos")]
    {
        use tao::platform::macos::{ActivationPolicy, EventLoopExtMacOS};
        // Menu-bar only: no Dock icon, no app menu.
        event_loop.set_activation_policy(ActivationPolicy::Accessory);
    }

    let proxy = event_loop.create_proxy();

    let menu_proxy = proxy.clone();
    MenuEvent::set_event_handler(Some(move |event| {
        let _ = menu_proxy.send_event(UserEvent::Menu(event));
    }));

    std::thread::Builder::new()
        .name("tray-updates".into())
        .spawn(move || {
            while let Some(update) = update_rx.blocking_recv() {
                if proxy.send_event(UserEvent::Update(update)).is_err() {
                    return;
                }
            }
            let _ = proxy.send_event(UserEvent::Disconnected);
        })?;

    let mut state = PresenterState::new();
    state.set_launch_at_login(launch_at_login);
    let menu = NativeMenu::build(&state.menu_state().build_menu())?;
    let mut item = StatusItem {
        config,
        shown_color: state.color(),
        state,
        menu,
        tray: None,
    };
    let mut failure = None;

    event_loop.run_return(|event, _target, control_flow| match event {
        Event::NewEvents(StartCause::Init) => {
            // The status item can only be created once the loop is running.
            if let Err(e) = item.create_tray() {
                failure = Some(e);
                *control_flow = ControlFlow::Exit;
                return;
            }
            *control_flow = ControlFlow::WaitUntil(Instant::now() + CLOCK_TICK);
        }
        Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
            item.tick();
            *control_flow = ControlFlow::WaitUntil(Instant::now() + CLOCK_TICK);
        }
        Event::UserEvent(UserEvent::Menu(event)) => {
            if let Some(action) = item.menu.action(&event.id) {
                tracing::debug!(?action, "menu action");
                if event_tx.send(TrayEvent::from(action)).is_err() {
                    *control_flow = ControlFlow::Exit;
                }
            }
        }
        Event::UserEvent(UserEvent::Update(update)) => {
            if !item.on_update(update) {
                *control_flow = ControlFlow::Exit;
            }
        }
        Event::UserEvent(UserEvent::Disconnected) => *control_flow = ControlFlow::Exit,
        _ => {}
    });

    MenuEvent::set_event_handler(None::<fn(MenuEvent)>);
    drop(item);

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
