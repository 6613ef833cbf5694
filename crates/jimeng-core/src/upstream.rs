//! Outbound transport to the Volcengine visual API.
//!
//! The [`Upstream`] trait is the seam between the relay provider and the
//! network. [`HttpUpstream`] is the production implementation on `reqwest`;
//! tests substitute recording fakes.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use jimeng_model::error::RelayError;
use tracing::debug;

/// Longest upstream error body kept in an [`UpstreamError::Status`].
const MAX_ERROR_BODY_LEN: usize = 512;

/// A signed, ready-to-send outbound call.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    /// Full URL including the `Action` / `Version` query.
    pub url: String,
    /// Headers, including `Authorization` and `X-Date`.
    pub headers: HeaderMap,
    /// The exact bytes that were signed.
    pub body: Bytes,
}

/// A successful (2xx) upstream reply.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Raw response body.
    pub body: Bytes,
}

/// Classified failure of an outbound call.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The upstream answered with a non-2xx status.
    #[error("{status} for url {url}: {body}")]
    Status {
        /// The status code received.
        status: StatusCode,
        /// The requested URL.
        url: String,
        /// Leading part of the response body.
        body: String,
    },

    /// No connection could be established.
    #[error("{0}")]
    Connection(String),

    /// The call did not complete within the configured bound.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

impl From<UpstreamError> for RelayError {
    fn from(err: UpstreamError) -> Self {
        let detail = err.to_string();
        match err {
            UpstreamError::Status { .. } => Self::upstream_http(detail),
            UpstreamError::Connection(_) => Self::upstream_connection(detail),
            UpstreamError::Timeout(_) => Self::upstream_timeout(detail),
            UpstreamError::Other(_) => Self::upstream_other(detail),
        }
    }
}

/// Future returned by [`Upstream::post`].
pub type UpstreamFuture =
    Pin<Box<dyn Future<Output = Result<UpstreamResponse, UpstreamError>> + Send>>;

/// Sends signed requests to the provider.
pub trait Upstream: Send + Sync + 'static {
    /// `POST` the request and return the 2xx reply, or a classified error.
    fn post(&self, request: UpstreamRequest) -> UpstreamFuture;
}

/// [`Upstream`] implementation backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpUpstream {
    /// Build a client whose calls are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::from_client(client, timeout))
    }

    /// Wrap a preconfigured client. `timeout` should match the client's own.
    #[must_use]
    pub fn from_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl Upstream for HttpUpstream {
    fn post(&self, request: UpstreamRequest) -> UpstreamFuture {
        let client = self.client.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            let UpstreamRequest { url, headers, body } = request;
            debug!(%url, body_len = body.len(), "sending upstream request");

            let response = client
                .post(&url)
                .headers(headers)
                .body(body)
                .send()
                .await
                .map_err(|e| classify(&e, timeout))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(UpstreamError::Status {
                    status,
                    url,
                    body: truncate(&text, MAX_ERROR_BODY_LEN),
                });
            }

            let body = response.bytes().await.map_err(|e| classify(&e, timeout))?;
            debug!(status = status.as_u16(), body_len = body.len(), "upstream replied");

            Ok(UpstreamResponse { status, body })
        })
    }
}

fn classify(err: &reqwest::Error, timeout: Duration) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout(timeout)
    } else if err.is_connect() {
        UpstreamError::Connection(err.to_string())
    } else {
        UpstreamError::Other(err.to_string())
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_owned();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
