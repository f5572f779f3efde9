//! # Network Fee Snapshot SDK
//!
//! Produces a consolidated snapshot of network fee data from three
//! independent sources and tells the host when to refresh it:
//!
//! - Ethereum gas prices from the Etherscan gas oracle
//! - Bitcoin fee rates from mempool.space
//! - Solana throughput from `getRecentPerformanceSamples`
//!
//! ## Usage
//!
//! ```no_run
//! use network_fee_sdk::{FeeTracker, JsonFilePreferences};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let preferences = Arc::new(JsonFilePreferences::new("fee-widget.json"));
//! let tracker = FeeTracker::from_env(preferences)?;
//!
//! let snapshot = tracker.run_cycle(chrono::Utc::now()).await;
//! println!("{}", snapshot.headline());
//! // call run_cycle again no earlier than snapshot.next_run_at
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! FeeTracker::run_cycle(now)
//!     ↓
//! Preferences (unit, interval; defaults on read failure)
//!     ↓
//! Aggregator::fetch_all()  ── 3 SourceClients concurrently, first failure wins
//!     ↓
//! RefreshScheduler::next_cycle()
//!     ↓
//! Snapshot { state, next_run_at }
//! ```
//!
//! ## Configuration
//!
//! Defaults live in the `constants` module. Endpoints can be overridden with
//! `NETWORK_FEE_ETHERSCAN_URL`, `NETWORK_FEE_MEMPOOL_URL` and
//! `NETWORK_FEE_SOLANA_RPC_URL`; `ETHERSCAN_API_KEY` is appended to Etherscan
//! requests when set.

pub mod aggregator;
pub mod constants;
pub mod error;
pub mod formatter;
pub mod metrics;
pub mod preferences;
pub mod scheduler;
pub mod snapshot;
pub mod source;
pub mod sources;
pub mod tracker;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use error::{FetchError, PreferenceError, TransportError};
pub use metrics::SourceMetrics;
pub use preferences::{JsonFilePreferences, PreferenceStore, Preferences, StaticPreferences};
pub use scheduler::RefreshScheduler;
pub use snapshot::{Snapshot, SnapshotState};
pub use source::{SourceClient, SourceConfig};
pub use tracker::{FeeTracker, TrackerHandle};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{
    AggregateSample, BitcoinFeeSample, CryptoKind, DisplayUnit, EvmGasSample, Outcome, RawSample,
    RefreshInterval, SolanaPerfSample,
};
