//! Refresh scheduling
//!
//! Each cycle starts in `Loading` and ends in either `Success` or `Error`.
//! Successful cycles wait for the user's interval; failed ones come back
//! after a fixed short delay no matter what interval is configured.

use crate::{
    constants::FAILURE_RETRY_MINUTES,
    snapshot::{failure_message, Snapshot, SnapshotState},
    types::{DisplayUnit, Outcome, RefreshInterval},
};
use chrono::{DateTime, Duration, Utc};

/// Turns aggregation outcomes into snapshots with a next-run time
#[derive(Debug, Clone, Copy)]
pub struct RefreshScheduler {
    failure_retry: Duration,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self {
            failure_retry: Duration::minutes(FAILURE_RETRY_MINUTES),
        }
    }

    pub fn failure_retry(&self) -> Duration {
        self.failure_retry
    }

    /// Interim snapshot emitted when a cycle starts
    ///
    /// Its `next_run_at` uses the failure delay, so a host that never sees the
    /// cycle resolve still retries soon.
    pub fn loading(&self, now: DateTime<Utc>, unit: DisplayUnit) -> Snapshot {
        Snapshot {
            captured_at: now,
            state: SnapshotState::Loading,
            next_run_at: now + self.failure_retry,
            unit,
        }
    }

    /// Terminal snapshot for a resolved cycle, rendered in `unit`
    pub fn next_cycle(
        &self,
        outcome: Outcome,
        interval: RefreshInterval,
        unit: DisplayUnit,
        now: DateTime<Utc>,
    ) -> Snapshot {
        let (state, next_run_at) = match outcome {
            Outcome::Success(sample) => (
                SnapshotState::Success { sample },
                now + interval.as_duration(),
            ),
            Outcome::Failure { source, error } => (
                SnapshotState::Error {
                    message: failure_message(source, &error),
                },
                now + self.failure_retry,
            ),
        };

        Snapshot {
            captured_at: now,
            state,
            next_run_at,
            unit,
        }
    }
}
