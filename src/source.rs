//! Source client abstraction for fetching fee samples from external APIs

use crate::{
    constants::{REQUEST_TIMEOUT_SECS, RESOURCE_TIMEOUT_SECS},
    error::FetchError,
    transport::{HttpRequest, HttpTransport},
    types::{CryptoKind, RawSample},
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Trait for fee sample sources
///
/// Implementations are stateless between calls and perform exactly one
/// network round trip per `fetch`.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetches and decodes one sample
    ///
    /// # Returns
    /// A fully validated sample, or the error describing why none could be built
    async fn fetch(&self) -> Result<RawSample, FetchError>;

    /// Which network this client reports on
    fn kind(&self) -> CryptoKind;

    /// Returns the name of this source
    fn source_name(&self) -> &'static str;
}

/// Endpoint and timeout budget for one source client
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub endpoint: String,
    /// Timeout handed to the transport for the request itself
    pub request_timeout: Duration,
    /// Budget for the whole fetch, body included
    pub resource_timeout: Duration,
}

impl SourceConfig {
    /// Creates a config with the default timeout budget
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            resource_timeout: Duration::from_secs(RESOURCE_TIMEOUT_SECS),
        }
    }

    /// Uses `default_endpoint` unless the environment variable `var` is set
    pub fn from_env(var: &str, default_endpoint: &str) -> Self {
        let endpoint = std::env::var(var)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_endpoint.to_string());
        Self::new(endpoint)
    }

    pub fn with_timeouts(mut self, request_timeout: Duration, resource_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self.resource_timeout = resource_timeout;
        self
    }

    /// Parses the endpoint into a URL
    pub fn url(&self) -> Result<reqwest::Url, FetchError> {
        reqwest::Url::parse(&self.endpoint).map_err(|e| {
            FetchError::invalid_endpoint(format!("{}: {}", self.endpoint, e))
        })
    }
}

/// Sends `request` under the resource budget and decodes a 2xx JSON body.
///
/// Non-2xx statuses become `InvalidResponse`, schema mismatches `DecodeError`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    request: HttpRequest,
    resource_timeout: Duration,
) -> Result<T, FetchError> {
    let response = tokio::time::timeout(resource_timeout, transport.execute(request))
        .await
        .map_err(|_| FetchError::Timeout)??;

    if !response.is_success() {
        return Err(FetchError::InvalidResponse(response.status));
    }

    serde_json::from_str(&response.body).map_err(|e| FetchError::decode(e.to_string()))
}

/// Parses a decimal carried as a JSON string (Etherscan style)
pub(crate) fn parse_decimal(field: &str, raw: &str) -> Result<f64, FetchError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| FetchError::decode(format!("{} is not a number: {:?}", field, raw)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::ScriptedTransport;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[allow(dead_code)]
        value: u32,
    }

    fn request() -> HttpRequest {
        HttpRequest::get(
            reqwest::Url::parse("http://localhost/fees").unwrap(),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = SourceConfig::new("not a url");
        assert!(matches!(config.url(), Err(FetchError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_default_budget() {
        let config = SourceConfig::new("https://example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(8));
        assert_eq!(config.resource_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let transport = ScriptedTransport::ok(429, "slow down");
        let err = fetch_json::<Probe>(&transport, request(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::InvalidResponse(429));
    }

    #[tokio::test]
    async fn test_resource_timeout_when_transport_stalls() {
        let transport = ScriptedTransport::ok(200, "{\"value\":1}").with_delay(Duration::from_secs(5));
        let err = fetch_json::<Probe>(&transport, request(), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Timeout);
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_decode_error() {
        let transport = ScriptedTransport::ok(200, "{\"value\":\"one\"}");
        let err = fetch_json::<Probe>(&transport, request(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::DecodeError(_)));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("SafeGasPrice", " 12.5 ").unwrap(), 12.5);
        assert!(matches!(
            parse_decimal("SafeGasPrice", "abc"),
            Err(FetchError::DecodeError(_))
        ));
    }
}
