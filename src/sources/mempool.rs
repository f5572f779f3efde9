//! mempool.space recommended fee source

use crate::{
    constants::{MEMPOOL_FEES_URL, MEMPOOL_URL_ENV},
    error::FetchError,
    source::{fetch_json, SourceClient, SourceConfig},
    transport::{HttpRequest, HttpTransport},
    types::{BitcoinFeeSample, CryptoKind, RawSample},
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// mempool.space `/api/v1/fees/recommended` response
///
/// `economyFee` and `minimumFee` are also returned but not tracked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendedFees {
    fastest_fee: f64,
    half_hour_fee: f64,
    hour_fee: f64,
}

/// Bitcoin fee rate source backed by mempool.space
pub struct MempoolFeeSource {
    transport: Arc<dyn HttpTransport>,
    config: SourceConfig,
}

impl MempoolFeeSource {
    pub fn new(transport: Arc<dyn HttpTransport>, config: SourceConfig) -> Self {
        Self { transport, config }
    }

    /// Reads the endpoint override from the environment
    pub fn from_env(transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(transport, SourceConfig::from_env(MEMPOOL_URL_ENV, MEMPOOL_FEES_URL))
    }
}

#[async_trait]
impl SourceClient for MempoolFeeSource {
    async fn fetch(&self) -> Result<RawSample, FetchError> {
        let url = self.config.url()?;
        tracing::debug!(url = %url, "Fetching recommended fees from mempool.space");

        let request = HttpRequest::get(url, self.config.request_timeout);
        let fees: RecommendedFees =
            fetch_json(self.transport.as_ref(), request, self.config.resource_timeout).await?;

        let sample = BitcoinFeeSample::new(fees.fastest_fee, fees.half_hour_fee, fees.hour_fee)?;
        Ok(RawSample::Bitcoin(sample))
    }

    fn kind(&self) -> CryptoKind {
        CryptoKind::Bitcoin
    }

    fn source_name(&self) -> &'static str {
        "mempool.space"
    }
}
