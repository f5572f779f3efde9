//! Error types for the network fee tracker

use thiserror::Error;

/// Errors a source client can report for a single fetch
///
/// These are surfaced at the source client boundary and carried through the
/// aggregator unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request target could not be constructed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport succeeded but the status was not 2xx
    #[error("Invalid response: HTTP {0}")]
    InvalidResponse(u16),

    /// Body did not match the expected schema
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Well-formed response carrying an explicit API error
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    /// No response within the request or resource budget
    #[error("Request timeout")]
    Timeout,

    /// Transport failure that is not a timeout
    #[error("Transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Creates a DecodeError
    pub fn decode(detail: impl Into<String>) -> Self {
        Self::DecodeError(detail.into())
    }

    /// Creates an UpstreamError
    pub fn upstream(detail: impl Into<String>) -> Self {
        Self::UpstreamError(detail.into())
    }

    /// Creates an InvalidEndpoint error
    pub fn invalid_endpoint(detail: impl Into<String>) -> Self {
        Self::InvalidEndpoint(detail.into())
    }
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        if err.timed_out() {
            Self::Timeout
        } else {
            Self::Transport(err.message().to_string())
        }
    }
}

/// Failure reported by an [`HttpTransport`](crate::transport::HttpTransport)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    timed_out: bool,
}

impl TransportError {
    /// Creates a transport error that is not a timeout
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    /// Creates a transport error for a request that got no response in time
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }
}

/// Errors that can occur when reading user preferences
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Underlying storage could not be read
    #[error("Preference storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Stored document is not valid JSON
    #[error("Malformed preferences: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Key is absent from the store
    #[error("Preference not set: {0}")]
    Missing(&'static str),

    /// Stored value is outside the allowed set
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

impl PreferenceError {
    /// Creates an InvalidValue error
    pub fn invalid_value(key: &'static str, value: impl ToString) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_timeout_maps_to_timeout() {
        let err: FetchError = TransportError::timeout("operation timed out").into();
        assert_eq!(err, FetchError::Timeout);
    }

    #[test]
    fn test_transport_failure_keeps_detail() {
        let err: FetchError = TransportError::new("body stream aborted").into();
        assert_eq!(err, FetchError::Transport("body stream aborted".to_string()));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(FetchError::InvalidResponse(503).to_string(), "Invalid response: HTTP 503");
        assert_eq!(
            FetchError::upstream("Invalid API Key").to_string(),
            "Upstream error: Invalid API Key"
        );
    }
}
