//! Solana JSON-RPC performance source

use crate::{
    constants::{SOLANA_RPC_URL, SOLANA_RPC_URL_ENV},
    error::FetchError,
    source::{fetch_json, SourceClient, SourceConfig},
    transport::{HttpRequest, HttpTransport},
    types::{CryptoKind, RawSample, SolanaPerfSample},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// JSON-RPC body asking for the most recent performance sample
fn recent_performance_request() -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getRecentPerformanceSamples",
        "params": [1]
    })
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Vec<PerformanceSample>>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceSample {
    num_transactions: u64,
    sample_period_secs: u64,
}

/// Solana throughput source backed by `getRecentPerformanceSamples`
pub struct SolanaPerfSource {
    transport: Arc<dyn HttpTransport>,
    config: SourceConfig,
}

impl SolanaPerfSource {
    pub fn new(transport: Arc<dyn HttpTransport>, config: SourceConfig) -> Self {
        Self { transport, config }
    }

    /// Reads the endpoint override from the environment
    pub fn from_env(transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(transport, SourceConfig::from_env(SOLANA_RPC_URL_ENV, SOLANA_RPC_URL))
    }

    fn parse_response(response: RpcResponse) -> Result<SolanaPerfSample, FetchError> {
        if let Some(err) = response.error {
            return Err(FetchError::upstream(format!(
                "RPC error {}: {}",
                err.code, err.message
            )));
        }

        let latest = response
            .result
            .ok_or_else(|| FetchError::decode("missing field `result`"))?
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::decode("no performance samples returned"))?;

        if latest.sample_period_secs == 0 {
            return Err(FetchError::decode("samplePeriodSecs is zero"));
        }

        SolanaPerfSample::new(latest.num_transactions as f64 / latest.sample_period_secs as f64)
    }
}

#[async_trait]
impl SourceClient for SolanaPerfSource {
    async fn fetch(&self) -> Result<RawSample, FetchError> {
        let url = self.config.url()?;
        tracing::debug!(url = %url, "Fetching performance samples from Solana RPC");

        let request = HttpRequest::post_json(
            url,
            recent_performance_request(),
            self.config.request_timeout,
        );

        let response: RpcResponse =
            fetch_json(self.transport.as_ref(), request, self.config.resource_timeout).await?;

        Ok(RawSample::Solana(Self::parse_response(response)?))
    }

    fn kind(&self) -> CryptoKind {
        CryptoKind::Solana
    }

    fn source_name(&self) -> &'static str {
        "solana-rpc"
    }
}
