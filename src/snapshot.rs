//! Snapshot handed to the rendering layer once per cycle

use crate::{
    formatter,
    types::{AggregateSample, CryptoKind, DisplayUnit},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Render state of a snapshot; exactly one holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SnapshotState {
    /// A cycle has started and not resolved yet
    Loading,
    /// All sources answered
    Success { sample: AggregateSample },
    /// A source failed; message is user-facing
    Error { message: String },
}

/// Externally visible result of one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub captured_at: DateTime<Utc>,
    pub state: SnapshotState,
    /// Earliest time the host should start the next cycle
    pub next_run_at: DateTime<Utc>,
    /// Display unit read at the start of the cycle
    pub unit: DisplayUnit,
}

impl Snapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, SnapshotState::Loading)
    }

    pub fn sample(&self) -> Option<&AggregateSample> {
        match &self.state {
            SnapshotState::Success { sample } => Some(sample),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SnapshotState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// One-line summary in the snapshot's display unit
    pub fn headline(&self) -> String {
        match &self.state {
            SnapshotState::Loading => "Loading...".to_string(),
            SnapshotState::Success { sample } => sample
                .samples()
                .iter()
                .map(|raw| {
                    format!(
                        "{} {}",
                        raw.kind(),
                        formatter::format(raw.headline(), raw.kind(), self.unit)
                    )
                })
                .collect::<Vec<_>>()
                .join(" | "),
            SnapshotState::Error { message } => format!("Unavailable: {}", message),
        }
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (next refresh {})",
            self.headline(),
            self.next_run_at.format("%H:%M:%S UTC")
        )
    }
}

/// User-facing message for a failed source
pub(crate) fn failure_message(source: CryptoKind, error: &crate::error::FetchError) -> String {
    format!("{}: {}", source, error)
}
