//! HTTP transport capability used by the source clients
//!
//! Source clients never talk to `reqwest` directly; they hand an [`HttpRequest`]
//! to an injected [`HttpTransport`]. TLS, redirects and pooling stay inside the
//! transport implementation.

use crate::{constants::USER_AGENT, error::TransportError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HTTP method set needed by the source clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: reqwest::Url,
    /// JSON body, only sent with POST
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: reqwest::Url, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            body: None,
            timeout,
        }
    }

    pub fn post_json(url: reqwest::Url, body: serde_json::Value, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Post,
            url,
            body: Some(body),
            timeout,
        }
    }
}

/// Response with the body fully read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Trait for HTTP transports
///
/// One call is exactly one network round trip; implementations must not retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues the request, honouring `request.timeout`
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a new reqwest-backed transport
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::new(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    // DNS and connect failures mean no response arrived, same as a stall
    if err.is_timeout() || err.is_connect() {
        TransportError::timeout(err.to_string())
    } else {
        TransportError::new(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
        };
        builder = builder.timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Transport that answers every request with a canned result
    pub struct ScriptedTransport {
        response: Result<HttpResponse, TransportError>,
        delay: Duration,
        requests: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl ScriptedTransport {
        pub fn ok(status: u16, body: impl Into<String>) -> Self {
            Self {
                response: Ok(HttpResponse {
                    status,
                    body: body.into(),
                }),
                delay: Duration::ZERO,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn json(body: serde_json::Value) -> Self {
            Self::ok(200, body.to_string())
        }

        pub fn failing(error: TransportError) -> Self {
            Self {
                response: Err(error),
                delay: Duration::ZERO,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Sleeps before answering, ignoring the request timeout
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.response.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reqwest_transport_get_and_post() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fees"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .and(body_json(serde_json::json!({"method": "ping"})))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let base = reqwest::Url::parse(&server.uri()).unwrap();

        let get = transport
            .execute(HttpRequest::get(base.join("/fees").unwrap(), Duration::from_secs(2)))
            .await
            .unwrap();
        assert!(get.is_success());
        assert_eq!(get.body, "{\"ok\":true}");

        let post = transport
            .execute(HttpRequest::post_json(
                base.join("/rpc").unwrap(),
                serde_json::json!({"method": "ping"}),
                Duration::from_secs(2),
            ))
            .await
            .unwrap();
        assert_eq!(post.status, 503);
        assert!(!post.is_success());
    }

    #[tokio::test]
    async fn test_reqwest_transport_reports_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let url = reqwest::Url::parse(&server.uri()).unwrap();
        let err = transport
            .execute(HttpRequest::get(url, Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(err.timed_out());
    }
}
