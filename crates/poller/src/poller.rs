//! Scheduled poller with manual refresh and cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use cse_status_protocol::StatusResult;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::client::{StatusClient, StatusSource};
use crate::config::PollerConfig;
use crate::error::PollerError;

/// Callback invoked with each classified result.
pub type ResultFn = Box<dyn Fn(StatusResult) + Send + Sync + 'static>;

/// Shortest accepted schedule interval.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Runs poll cycles against a [`StatusSource`].
///
/// Each [`poll_once`](Self::poll_once) call emits exactly one
/// [`StatusResult`]. Concurrent calls are serialized.
#[derive(Clone)]
pub struct Poller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    source: Box<dyn StatusSource>,
    on_result: ResultFn,
    next_seq: AtomicU64,
    in_flight: Mutex<()>,
}

impl Poller {
    /// Creates a poller over the given source.
    pub fn new(source: impl StatusSource, on_result: ResultFn) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                source: Box::new(source),
                on_result,
                next_seq: AtomicU64::new(0),
                in_flight: Mutex::new(()),
            }),
        }
    }

    /// Builds the HTTP client and starts the schedule.
    ///
    /// Polls immediately, then every `config.interval`. Only client
    /// construction can fail.
    pub fn start(config: PollerConfig, on_result: ResultFn) -> Result<PollerHandle, PollerError> {
        let client = StatusClient::new(&config)?;
        info!(
            endpoint = %client.endpoint(),
            interval_secs = config.interval.as_secs(),
            timeout_secs = config.request_timeout.as_secs(),
            "market status poller starting"
        );
        Ok(Self::new(client, on_result).spawn(config.interval))
    }

    /// Spawns the schedule task for this poller.
    pub fn spawn(self, interval: Duration) -> PollerHandle {
        let interval = interval.max(MIN_INTERVAL);
        let cancel = CancellationToken::new();
        // Capacity 1: a pending refresh absorbs any further requests.
        let (refresh_tx, refresh_rx) = mpsc::channel(1);

        let task = tokio::spawn(schedule_loop(self, interval, refresh_rx, cancel.clone()));

        PollerHandle {
            cancel,
            refresh_tx,
            task,
        }
    }

    /// Performs one request → classify cycle and emits its result.
    ///
    /// Returns the sequence number of the emitted result.
    pub async fn poll_once(&self) -> u64 {
        let _guard = self.inner.in_flight.lock().await;

        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let outcome = self.inner.source.check().await;
        debug!(seq, ?outcome, "poll complete");

        (self.inner.on_result)(StatusResult::new(seq, outcome));
        seq
    }
}

/// Handle to a running schedule.
pub struct PollerHandle {
    cancel: CancellationToken,
    refresh_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Requests an immediate poll without moving the schedule.
    ///
    /// Returns `false` if a refresh is already pending (the request is
    /// coalesced into it) or the schedule has stopped.
    pub fn refresh(&self) -> bool {
        match self.refresh_tx.try_send(()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(())) => {
                debug!("refresh already pending, coalescing");
                false
            }
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }

    /// Cancels future ticks. An in-flight poll still completes.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            info!("market status poller stopped");
        }
    }

    /// Returns `true` while the schedule task is alive and not cancelled.
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.task.is_finished()
    }

    /// Waits for the schedule task to exit.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Main schedule loop: one poll per tick or refresh, never overlapping.
async fn schedule_loop(
    poller: Poller,
    interval: Duration,
    mut refresh_rx: mpsc::Receiver<()>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    // Skip keeps ticks on the start + n * interval grid after a slow poll.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => trace!("scheduled poll"),
            Some(()) = refresh_rx.recv() => debug!("manual refresh"),
        }

        poller.poll_once().await;
    }
}
