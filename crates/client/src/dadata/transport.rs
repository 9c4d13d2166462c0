//! Transport seam between the client and the suggestion service.
//!
//! [`HttpTransport`] is the production implementation; tests substitute
//! in-process fakes.

use std::time::Duration;

use async_trait::async_trait;
use banksuggest_core::Error;
use bytes::Bytes;
use reqwest::header;

use super::SuggestRequest;

/// Status and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }
}

/// Sends one suggestion request and returns the raw exchange.
///
/// Implementations report non-2xx statuses as a `RawResponse`, not an error;
/// errors are reserved for failures to complete the exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &SuggestRequest) -> Result<RawResponse, Error>;
}

/// reqwest-based transport for the `suggest/bank` endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for `<base_url>/suggest/bank`.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {}", e)))?;

        let endpoint = format!("{}/suggest/bank", base_url.trim_end_matches('/'));

        Ok(Self { http, endpoint, api_key: api_key.trim().to_string(), timeout })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout)
        } else if err.is_connect() {
            Error::Network(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &SuggestRequest) -> Result<RawResponse, Error> {
        tracing::debug!("POST {} query={}", self.endpoint, request.query);

        let response = self
            .http
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("Token {}", self.api_key))
            .header(header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        Ok(RawResponse { status, body })
    }
}
