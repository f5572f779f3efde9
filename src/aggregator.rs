//! Concurrent fan-out over the three fee sources
//!
//! ```text
//! Aggregator::fetch_all()
//!     ├── Etherscan gas oracle   ─┐
//!     ├── mempool.space fees     ─┼─ try_join (first failure wins)
//!     └── Solana performance     ─┘
//!                                  ↓
//!                   Outcome::Success | Outcome::Failure
//! ```

use crate::{
    error::FetchError,
    metrics::{MetricsCollector, SourceMetrics},
    source::SourceClient,
    sources::{EtherscanGasSource, MempoolFeeSource, SolanaPerfSource},
    transport::HttpTransport,
    types::{AggregateSample, CryptoKind, Outcome, RawSample},
};
use std::sync::Arc;
use std::time::Instant;

/// One source client with its metrics
struct SourceSlot {
    kind: CryptoKind,
    client: Arc<dyn SourceClient>,
    metrics: MetricsCollector,
}

impl SourceSlot {
    fn new(kind: CryptoKind, client: Arc<dyn SourceClient>) -> Self {
        Self {
            kind,
            client,
            metrics: MetricsCollector::new(kind),
        }
    }

    /// Fetches and narrows the sample to this slot's type; a sample of
    /// another kind fails this slot
    async fn fetch_as<T>(
        &self,
        extract: fn(RawSample) -> Option<T>,
    ) -> Result<T, (CryptoKind, FetchError)> {
        let start = Instant::now();
        let result = self.client.fetch().await.and_then(|sample| {
            let kind = sample.kind();
            extract(sample).ok_or_else(|| {
                FetchError::decode(format!(
                    "{} returned a {} sample",
                    self.client.source_name(),
                    kind
                ))
            })
        });
        let latency = start.elapsed();
        self.metrics.record_request(latency, result.is_ok()).await;

        match result {
            Ok(sample) => {
                tracing::debug!(
                    source = self.client.source_name(),
                    latency_ms = latency.as_millis() as u64,
                    "Fetched fee sample"
                );
                Ok(sample)
            }
            Err(error) => {
                tracing::warn!(
                    source = self.client.source_name(),
                    latency_ms = latency.as_millis() as u64,
                    error = %error,
                    "Fee source failed"
                );
                Err((self.kind, error))
            }
        }
    }
}

/// Runs the three source clients concurrently and joins them all-or-nothing
pub struct Aggregator {
    evm: SourceSlot,
    bitcoin: SourceSlot,
    solana: SourceSlot,
}

impl Aggregator {
    /// Creates an aggregator over explicit source clients
    pub fn new(
        evm: Arc<dyn SourceClient>,
        bitcoin: Arc<dyn SourceClient>,
        solana: Arc<dyn SourceClient>,
    ) -> Self {
        Self {
            evm: SourceSlot::new(CryptoKind::Evm, evm),
            bitcoin: SourceSlot::new(CryptoKind::Bitcoin, bitcoin),
            solana: SourceSlot::new(CryptoKind::Solana, solana),
        }
    }

    /// Creates the default Etherscan / mempool.space / Solana RPC sources,
    /// honouring the endpoint overrides in the environment
    pub fn from_env(transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(
            Arc::new(EtherscanGasSource::from_env(transport.clone())),
            Arc::new(MempoolFeeSource::from_env(transport.clone())),
            Arc::new(SolanaPerfSource::from_env(transport)),
        )
    }

    /// Fetches all three sources concurrently
    ///
    /// The first failure, in completion order, becomes the outcome and the
    /// fetches still in flight are dropped, cancelling their requests. A
    /// sample is only produced when all three succeed.
    pub async fn fetch_all(&self) -> Outcome {
        let joined = tokio::try_join!(
            self.evm.fetch_as(RawSample::into_evm),
            self.bitcoin.fetch_as(RawSample::into_bitcoin),
            self.solana.fetch_as(RawSample::into_solana),
        );

        match joined {
            Ok((evm, bitcoin, solana)) => Outcome::Success(AggregateSample::new(evm, bitcoin, solana)),
            Err((source, error)) => Outcome::Failure { source, error },
        }
    }

    /// Latency and success metrics for each source, in fixed order
    pub async fn metrics(&self) -> Vec<SourceMetrics> {
        vec![
            self.evm.metrics.get_metrics().await,
            self.bitcoin.metrics.get_metrics().await,
            self.solana.metrics.get_metrics().await,
        ]
    }
}
