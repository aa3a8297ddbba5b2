//! One round trip to the product service, with no policy attached.
//!
//! [`ProductTransport::fetch`] reports what came back (a status and a body) or
//! that nothing came back. Interpreting the reply belongs to the retry loop.

use crate::model::SkuId;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Per-attempt HTTP timeout used when none is configured.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw answer of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// No reply was received (connection refused, timeout, reset, ...).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait ProductTransport: Send + Sync {
    async fn fetch(&self, sku_id: SkuId) -> Result<RawReply, TransportError>;
}

#[derive(Debug, Serialize)]
struct GetProductRequest<'a> {
    token: &'a str,
    sku: u64,
}

/// `POST {base_url}/get_product` with `{"token": .., "sku": ..}`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: String,
    token: String,
    http: Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built (e.g. no TLS backend).
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(Self {
            url: format!("{}/get_product", base_url.trim_end_matches('/')),
            token: token.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ProductTransport for HttpTransport {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self, sku_id: SkuId) -> Result<RawReply, TransportError> {
        let response = self
            .http
            .post(&self.url)
            .json(&GetProductRequest {
                token: &self.token,
                sku: sku_id.0,
            })
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        debug!(status, len = body.len(), "Reply received");
        Ok(RawReply::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_is_joined_once() {
        let transport = HttpTransport::new("http://localhost:8081/", "dev-token", DEFAULT_HTTP_TIMEOUT).unwrap();
        assert_eq!(transport.url(), "http://localhost:8081/get_product");
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GetProductRequest {
            token: "dev-token",
            sku: 1001,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"token": "dev-token", "sku": 1001}));
    }
}
