//! HTTP transport abstraction.
//!
//! The client talks to the store through the `HttpTransport` trait so
//! that tests can script responses (429 sequences, outages, partial
//! batches) without a network. The production transport is `reqwest`.

use crate::error::{RemoteError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// HTTP method subset used by the contact store API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET request
    Get,
    /// POST request
    Post,
}

/// A request as handed to the transport.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Fully resolved URL
    pub url: String,
    /// Header name/value pairs
    pub headers: Vec<(String, String)>,
    /// JSON body, if any
    pub body: Option<Value>,
}

/// A response as seen by the client.
///
/// Non-2xx statuses are returned as responses, not transport errors, so
/// the client's retry policy can inspect them. Transport errors are
/// reserved for network-class failures.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body (`Null` when the body is empty or not JSON)
    pub body: Value,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for executing HTTP requests against the contact store.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a request.
    ///
    /// # Errors
    /// Returns `RemoteError::Network` for network-class failures only;
    /// HTTP error statuses come back as an `ApiResponse`.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the given request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_success_range() {
        let ok = ApiResponse {
            status: 201,
            body: Value::Null,
        };
        assert!(ok.is_success());

        let rate_limited = ApiResponse {
            status: 429,
            body: Value::Null,
        };
        assert!(!rate_limited.is_success());
    }

    #[test]
    fn test_build_reqwest_transport() {
        let transport = ReqwestTransport::new(Duration::from_secs(30));
        assert!(transport.is_ok());
    }
}
