//! Etherscan gas oracle source

use crate::{
    constants::{ETHERSCAN_API_KEY_ENV, ETHERSCAN_GAS_ORACLE_URL, ETHERSCAN_URL_ENV},
    error::FetchError,
    source::{fetch_json, parse_decimal, SourceClient, SourceConfig},
    transport::{HttpRequest, HttpTransport},
    types::{CryptoKind, EvmGasSample, RawSample},
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Etherscan API envelope
///
/// `result` is an object on success and an error string when `status` is "0".
#[derive(Debug, Deserialize)]
struct EtherscanEnvelope {
    status: String,
    message: String,
    result: serde_json::Value,
}

/// Gas oracle payload; Etherscan encodes every number as a string
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GasOracleResult {
    safe_gas_price: String,
    propose_gas_price: String,
    fast_gas_price: String,
    #[serde(rename = "suggestBaseFee", default)]
    suggest_base_fee: Option<String>,
}

/// Ethereum gas price source backed by the Etherscan gas oracle
pub struct EtherscanGasSource {
    transport: Arc<dyn HttpTransport>,
    config: SourceConfig,
    api_key: Option<String>,
}

impl EtherscanGasSource {
    pub fn new(transport: Arc<dyn HttpTransport>, config: SourceConfig) -> Self {
        Self {
            transport,
            config,
            api_key: None,
        }
    }

    /// Reads the endpoint override and API key from the environment
    pub fn from_env(transport: Arc<dyn HttpTransport>) -> Self {
        let config = SourceConfig::from_env(ETHERSCAN_URL_ENV, ETHERSCAN_GAS_ORACLE_URL);
        let source = Self::new(transport, config);
        match std::env::var(ETHERSCAN_API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => source.with_api_key(key),
            _ => source,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn build_request(&self) -> Result<HttpRequest, FetchError> {
        let mut url = self.config.url()?;
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("apikey", key);
        }
        Ok(HttpRequest::get(url, self.config.request_timeout))
    }

    fn parse_response(envelope: EtherscanEnvelope) -> Result<EvmGasSample, FetchError> {
        if envelope.status != "1" {
            let detail = match envelope.result {
                serde_json::Value::String(reason) => format!("{}: {}", envelope.message, reason),
                _ => envelope.message,
            };
            return Err(FetchError::upstream(detail));
        }

        let oracle: GasOracleResult = serde_json::from_value(envelope.result)
            .map_err(|e| FetchError::decode(format!("gas oracle result: {}", e)))?;

        let sample = EvmGasSample::new(
            parse_decimal("SafeGasPrice", &oracle.safe_gas_price)?,
            parse_decimal("ProposeGasPrice", &oracle.propose_gas_price)?,
            parse_decimal("FastGasPrice", &oracle.fast_gas_price)?,
        )?;

        match oracle.suggest_base_fee.as_deref() {
            Some(raw) => sample.with_base_fee(parse_decimal("suggestBaseFee", raw)?),
            None => Ok(sample),
        }
    }
}

#[async_trait]
impl SourceClient for EtherscanGasSource {
    async fn fetch(&self) -> Result<RawSample, FetchError> {
        let request = self.build_request()?;
        tracing::debug!(url = %self.config.endpoint, "Fetching gas oracle from Etherscan");

        let envelope: EtherscanEnvelope =
            fetch_json(self.transport.as_ref(), request, self.config.resource_timeout).await?;
        let sample = Self::parse_response(envelope)?;

        Ok(RawSample::Evm(sample))
    }

    fn kind(&self) -> CryptoKind {
        CryptoKind::Evm
    }

    fn source_name(&self) -> &'static str {
        "etherscan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::ScriptedTransport;
    use crate::transport::ReqwestTransport;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn oracle_body() -> serde_json::Value {
        json!({
            "status": "1",
            "message": "OK",
            "result": {
                "LastBlock": "21000000",
                "SafeGasPrice": "12",
                "ProposeGasPrice": "13.5",
                "FastGasPrice": "15",
                "suggestBaseFee": "11.84",
                "gasUsedRatio": "0.41,0.55,0.38"
            }
        })
    }

    fn source(transport: ScriptedTransport) -> EtherscanGasSource {
        EtherscanGasSource::new(Arc::new(transport), SourceConfig::new("https://etherscan.test/api"))
    }

    #[tokio::test]
    async fn test_decodes_gas_oracle() {
        let sample = source(ScriptedTransport::json(oracle_body())).fetch().await.unwrap();
        let expected = EvmGasSample::new(12.0, 13.5, 15.0)
            .unwrap()
            .with_base_fee(11.84)
            .unwrap();
        assert_eq!(sample, RawSample::Evm(expected));
    }

    #[tokio::test]
    async fn test_missing_field_is_decode_error() {
        let mut body = oracle_body();
        body["result"].as_object_mut().unwrap().remove("FastGasPrice");

        let err = source(ScriptedTransport::json(body)).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::DecodeError(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_non_numeric_tier_is_decode_error() {
        let mut body = oracle_body();
        body["result"]["SafeGasPrice"] = json!("fast");

        let err = source(ScriptedTransport::json(body)).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::DecodeError(_)));
    }

    #[tokio::test]
    async fn test_error_envelope_is_upstream_error() {
        let body = json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"});

        let err = source(ScriptedTransport::json(body)).fetch().await.unwrap_err();
        assert_eq!(err, FetchError::upstream("NOTOK: Invalid API Key"));
    }

    #[tokio::test]
    async fn test_invalid_endpoint_issues_no_request() {
        let transport = Arc::new(ScriptedTransport::json(oracle_body()));
        let source = EtherscanGasSource::new(transport.clone(), SourceConfig::new("::nope::"));

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidEndpoint(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_api_key_and_timeout_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/api"))
            .and(query_param("action", "gasoracle"))
            .and(query_param("apikey", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(oracle_body()))
            .mount(&server)
            .await;

        let transport = Arc::new(ReqwestTransport::new().unwrap());
        let endpoint = format!("{}/v2/api?chainid=1&module=gastracker&action=gasoracle", server.uri());
        let sample = EtherscanGasSource::new(transport.clone(), SourceConfig::new(endpoint))
            .with_api_key("secret")
            .fetch()
            .await
            .unwrap();
        assert_eq!(sample.kind(), CryptoKind::Evm);

        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(oracle_body())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&slow)
            .await;

        let config = SourceConfig::new(slow.uri())
            .with_timeouts(Duration::from_millis(100), Duration::from_millis(200));
        let err = EtherscanGasSource::new(transport, config).fetch().await.unwrap_err();
        assert_eq!(err, FetchError::Timeout);
    }
}
