//! Launch-at-login registration.
//!
//! The status item exposes a single "Launch at Login" checkbox. The
//! [`AutoLaunchRegistrar`] trait is the seam between that checkbox and the
//! platform mechanism; [`LaunchAgentRegistrar`] is the real implementation
//! backed by the `auto-launch` crate.

use std::path::PathBuf;

use auto_launch::{AutoLaunch, AutoLaunchBuilder};
use tracing::{info, warn};

/// Application name used for the login item.
pub const APP_NAME: &str = "CSE Status";

/// Errors from launch-at-login registration.
#[derive(Debug, thiserror::Error)]
pub enum AutostartError {
    #[error("launch at login is not supported on this platform")]
    Unsupported,

    #[error("cannot resolve executable path: {0}")]
    ExecutablePath(#[from] std::io::Error),

    #[error("auto-launch backend error: {0}")]
    Backend(String),
}

/// Registers the application to start at user login.
pub trait AutoLaunchRegistrar: Send + Sync {
    fn register(&self) -> Result<(), AutostartError>;
    fn unregister(&self) -> Result<(), AutostartError>;
    fn is_registered(&self) -> Result<bool, AutostartError>;
}

/// Login item backed by `auto-launch` (a LaunchAgent on macOS).
pub struct LaunchAgentRegistrar {
    inner: AutoLaunch,
}

impl LaunchAgentRegistrar {
    /// Creates a registrar for the running executable.
    pub fn for_current_exe() -> Result<Self, AutostartError> {
        let exe = std::env::current_exe()?;
        Self::new(APP_NAME, exe)
    }

    /// Creates a registrar for an explicit executable path.
    pub fn new(app_name: &str, exe: PathBuf) -> Result<Self, AutostartError> {
        let path = exe.to_string_lossy();
        let inner = AutoLaunchBuilder::new()
            .set_app_name(app_name)
            .set_app_path(&path)
            .set_use_launch_agent(true)
            .build()
            .map_err(backend)?;
        Ok(Self { inner })
    }
}

impl AutoLaunchRegistrar for LaunchAgentRegistrar {
    fn register(&self) -> Result<(), AutostartError> {
        self.inner.enable().map_err(backend)
    }

    fn unregister(&self) -> Result<(), AutostartError> {
        self.inner.disable().map_err(backend)
    }

    fn is_registered(&self) -> Result<bool, AutostartError> {
        self.inner.is_enabled().map_err(backend)
    }
}

fn backend(e: impl std::fmt::Display) -> AutostartError {
    AutostartError::Backend(e.to_string())
}

/// Registrar for environments without a login-item mechanism.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRegistrar;

impl AutoLaunchRegistrar for UnsupportedRegistrar {
    fn register(&self) -> Result<(), AutostartError> {
        Err(AutostartError::Unsupported)
    }

    fn unregister(&self) -> Result<(), AutostartError> {
        Err(AutostartError::Unsupported)
    }

    fn is_registered(&self) -> Result<bool, AutostartError> {
        Ok(false)
    }
}

/// Builds the platform registrar, falling back to [`UnsupportedRegistrar`].
pub fn platform_registrar() -> Box<dyn AutoLaunchRegistrar> {
    match LaunchAgentRegistrar::for_current_exe() {
        Ok(r) => Box::new(r),
        Err(e) => {
            warn!("launch at login unavailable: {e}");
            Box::new(UnsupportedRegistrar)
        }
    }
}

/// Current registration state; errors read as "not registered".
pub fn is_registered(registrar: &dyn AutoLaunchRegistrar) -> bool {
    match registrar.is_registered() {
        Ok(state) => state,
        Err(e) => {
            warn!("failed to query launch at login: {e}");
            false
        }
    }
}

/// Flips the registration and returns the resulting state.
///
/// Best effort: a failed register or unregister is logged and the previous
/// state is returned.
pub fn toggle(registrar: &dyn AutoLaunchRegistrar) -> bool {
    let current = is_registered(registrar);
    let result = if current {
        registrar.unregister()
    } else {
        registrar.register()
    };

    match result {
        Ok(()) => {
            info!(enabled = !current, "launch at login updated");
            !current
        }
        Err(e) => {
            warn!(enabled = current, "failed to update launch at login: {e}");
            current
        }
    }
}
