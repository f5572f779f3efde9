//! Network fee tracker service
//!
//! Ties the aggregator, scheduler and preference store into the host-facing
//! `run_cycle` entry point, plus an optional background loop that drives the
//! cycles itself and broadcasts every snapshot.

use crate::{
    aggregator::Aggregator,
    error::TransportError,
    metrics::SourceMetrics,
    preferences::{PreferenceStore, Preferences},
    scheduler::RefreshScheduler,
    snapshot::Snapshot,
    transport::{HttpTransport, ReqwestTransport},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Capacity of the snapshot broadcast channel
const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// Network fee tracker
///
/// # Example
/// ```no_run
/// use network_fee_sdk::{FeeTracker, StaticPreferences};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tracker = FeeTracker::from_env(Arc::new(StaticPreferences::default()))?;
/// let snapshot = tracker.run_cycle(chrono::Utc::now()).await;
/// println!("{}", snapshot);
/// # Ok(())
/// # }
/// ```
pub struct FeeTracker {
    aggregator: Aggregator,
    scheduler: RefreshScheduler,
    preferences: Arc<dyn PreferenceStore>,
}

impl FeeTracker {
    pub fn new(aggregator: Aggregator, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self {
            aggregator,
            scheduler: RefreshScheduler::new(),
            preferences,
        }
    }

    /// Creates a tracker over the default sources and a reqwest transport
    pub fn from_env(preferences: Arc<dyn PreferenceStore>) -> Result<Self, TransportError> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new()?);
        Ok(Self::new(Aggregator::from_env(transport), preferences))
    }

    /// Interim snapshot for a cycle starting at `now`
    pub fn loading(&self, now: DateTime<Utc>) -> Snapshot {
        let preferences = Preferences::read(self.preferences.as_ref());
        self.scheduler.loading(now, preferences.unit)
    }

    /// Runs one fetch → aggregate → schedule cycle
    ///
    /// Always resolves to a renderable snapshot. The host should not call this
    /// again before the returned `next_run_at`.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> Snapshot {
        let preferences = Preferences::read(self.preferences.as_ref());
        self.cycle(preferences, now).await
    }

    async fn cycle(&self, preferences: Preferences, now: DateTime<Utc>) -> Snapshot {
        let outcome = self.aggregator.fetch_all().await;
        let snapshot =
            self.scheduler
                .next_cycle(outcome, preferences.interval, preferences.unit, now);

        match snapshot.error_message() {
            Some(message) => tracing::warn!(
                error = message,
                next_run_at = %snapshot.next_run_at,
                "Fee cycle failed"
            ),
            None => tracing::info!(
                interval_minutes = preferences.interval.minutes(),
                next_run_at = %snapshot.next_run_at,
                "Fee cycle succeeded"
            ),
        }

        snapshot
    }

    /// Latency and success metrics for each source
    pub async fn source_metrics(&self) -> Vec<SourceMetrics> {
        self.aggregator.metrics().await
    }

    /// Starts a background task that runs cycles back to back
    ///
    /// Each iteration reads preferences once, broadcasts a `Loading` snapshot,
    /// runs a cycle, broadcasts the result and sleeps until its `next_run_at`.
    pub fn spawn(self: Arc<Self>) -> TrackerHandle {
        let (tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        let sender = tx.clone();

        let task = tokio::spawn(async move {
            tracing::info!("Starting network fee tracker background task");

            loop {
                let preferences = Preferences::read(self.preferences.as_ref());
                let _ = sender.send(self.scheduler.loading(Utc::now(), preferences.unit));
                let snapshot = self.cycle(preferences, Utc::now()).await;
                let wait = (snapshot.next_run_at - Utc::now())
                    .to_std()
                    .unwrap_or(Duration::ZERO);
                let _ = sender.send(snapshot);

                tokio::time::sleep(wait).await;
            }
        });

        TrackerHandle { tx, task }
    }
}

/// Handle to a running background tracker
pub struct TrackerHandle {
    tx: broadcast::Sender<Snapshot>,
    task: JoinHandle<()>,
}

impl TrackerHandle {
    /// Receives every snapshot broadcast after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Stops the loop, cancelling any fetches in flight
    pub async fn shutdown(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
        tracing::info!("Network fee tracker stopped");
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
