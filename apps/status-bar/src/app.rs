//! Application orchestrator: wires the poller, the tray, and launch at login.

use std::sync::Arc;

use cse_status_autostart::AutoLaunchRegistrar;
use cse_status_poller::Poller;
use cse_status_tray::{TrayEvent, TrayHandle};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Runs the core until quit, ctrl-c, `shutdown`, or the frontend goes away.
pub async fn run(
    config: Config,
    mut tray: TrayHandle,
    registrar: Arc<dyn AutoLaunchRegistrar>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    // -- Poller --
    let poller = Poller::start(config.poller.clone(), Box::new(tray.status_sink()))?;

    tracing::info!("status item ready");

    // At most one registration runs at a time, off the runtime threads.
    let mut toggle: Option<JoinHandle<bool>> = None;

    // -- Main loop --
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("shutdown signal received");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("SIGINT received, shutting down");
                break;
            }
            result = toggle_finished(&mut toggle) => {
                toggle = None;
                match result {
                    Ok(enabled) => tray.set_launch_at_login(enabled),
                    Err(e) => tracing::warn!("launch at login toggle failed: {e}"),
                }
            }
            event = tray.recv_event() => match event {
                Some(TrayEvent::RefreshRequested) => {
                    tracing::debug!("manual refresh requested");
                    poller.refresh();
                }
                Some(TrayEvent::ToggleLaunchAtLogin) => {
                    if toggle.is_some() {
                        tracing::debug!("launch at login toggle already running");
                    } else {
                        let registrar = Arc::clone(&registrar);
                        toggle = Some(tokio::task::spawn_blocking(move || {
                            cse_status_autostart::toggle(registrar.as_ref())
                        }));
                    }
                }
                Some(TrayEvent::QuitRequested) => {
                    tracing::info!("quit requested via menu");
                    break;
                }
                None => {
                    tracing::info!("frontend closed");
                    break;
                }
            },
        }
    }

    // -- Graceful shutdown --
    poller.stop();
    if tokio::time::timeout(config.shutdown_grace, poller.join())
        .await
        .is_err()
    {
        tracing::warn!("in-flight poll abandoned at shutdown");
    }
    tray.shutdown();

    Ok(())
}

/// Resolves when the running toggle task ends; pending while none runs.
async fn toggle_finished(task: &mut Option<JoinHandle<bool>>) -> Result<bool, JoinError> {
    match task {
        Some(task) => task.await,
        None => std::future::pending().await,
    }
}
