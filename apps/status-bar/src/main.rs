//! CSE market status menu-bar entry point.

mod app;
mod config;
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
mod headless;
#[cfg(any(target_os = "macos", target_os = "windows"))]
mod native;

use std::sync::Arc;

use cse_status_autostart::AutoLaunchRegistrar;
use cse_status_tray::{TrayFrontend, TrayHandle};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting CSE status");

    let config = config::Config::default();
    let (tray, frontend) = TrayHandle::new(config.tray.clone());

    let registrar: Arc<dyn AutoLaunchRegistrar> =
        Arc::from(cse_status_autostart::platform_registrar());
    let launch_at_login = cse_status_autostart::is_registered(registrar.as_ref());

    // The UI owns the main thread; the tokio runtime runs beside it.
    let shutdown = CancellationToken::new();
    let core = {
        let shutdown = shutdown.clone();
        let grace = config.shutdown_grace;
        std::thread::Builder::new()
            .name("cse-core".into())
            .spawn(move || -> anyhow::Result<()> {
                let rt = tokio::runtime::Runtime::new()?;
                let result = rt.block_on(app::run(config, tray, registrar, shutdown));
                // A registration stuck in the OS must not hold the process open.
                rt.shutdown_timeout(grace);
                result
            })?
    };

    let frontend_result = run_frontend(frontend, launch_at_login);
    shutdown.cancel();

    match core.join() {
        Ok(result) => result?,
        Err(_) => anyhow::bail!("core thread panicked"),
    }
    frontend_result?;

    tracing::info!("shut down cleanly");
    Ok(())
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn run_frontend(frontend: TrayFrontend, launch_at_login: bool) -> anyhow::Result<()> {
    native::run(frontend, launch_at_login)
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn run_frontend(frontend: TrayFrontend, launch_at_login: bool) -> anyhow::Result<()> {
    let state = headless::run(frontend, launch_at_login);
    tracing::debug!(last_seq = state.last_seq(), "frontend stopped");
    Ok(())
}
