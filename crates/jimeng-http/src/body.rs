//! Relay HTTP response body type.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::Full;

/// Response body for relay HTTP responses.
///
/// Every relay response, success or error, is a single buffered JSON
/// document, so this is a thin wrapper over [`Full`].
#[derive(Debug, Default)]
pub struct RelayResponseBody(Full<Bytes>);

impl RelayResponseBody {
    /// Create a response body from raw bytes.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self(Full::new(data.into()))
    }

    /// Create a response body from a JSON-serialized value.
    #[must_use]
    pub fn from_json(json: Vec<u8>) -> Self {
        Self::from_bytes(json)
    }
}

impl http_body::Body for RelayResponseBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        Pin::new(&mut self.get_mut().0).poll_frame(cx)
    }

    fn is_end_stream(&self) -> bool {
        self.0.is_end_stream()
    }

    fn size_hint(&self) -> http_body::SizeHint {
        self.0.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use http_body::Body;
    use http_body_util::BodyExt;

    use super::*;

    #[test]
    fn test_should_report_exact_size() {
        let body = RelayResponseBody::from_json(br#"{"error":"x"}"#.to_vec());
        assert_eq!(body.size_hint().exact(), Some(13));
    }

    #[tokio::test]
    async fn test_should_yield_buffered_bytes() {
        let body = RelayResponseBody::from_bytes("{}");
        let bytes = body.collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"{}");
    }

    #[test]
    fn test_should_be_empty_by_default() {
        assert!(RelayResponseBody::default().is_end_stream());
    }
}
