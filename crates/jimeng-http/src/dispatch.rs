//! Relay handler trait and operation dispatch.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use jimeng_model::error::RelayError;
use jimeng_model::operations::RelayOperation;

use crate::body::RelayResponseBody;

/// Future returned by [`RelayHandler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<RelayResponseBody>, RelayError>> + Send>>;

/// Trait that the relay business logic must implement.
///
/// The handler receives the resolved operation, the raw JSON body bytes and
/// the request identifier, and returns a complete HTTP response. This trait
/// is the boundary between the HTTP transport layer and the relay provider.
pub trait RelayHandler: Send + Sync + 'static {
    /// Handle a relay operation and produce an HTTP response.
    fn handle_operation(
        &self,
        op: RelayOperation,
        body: Bytes,
        request_id: String,
    ) -> HandlerFuture;
}

/// Dispatch a relay operation to the handler.
pub async fn dispatch_operation<H: RelayHandler>(
    handler: &H,
    op: RelayOperation,
    body: Bytes,
    request_id: &str,
) -> Result<http::Response<RelayResponseBody>, RelayError> {
    tracing::debug!(
        operation = %op,
        body_len = body.len(),
        request_id,
        "dispatching relay operation"
    );
    handler
        .handle_operation(op, body, request_id.to_owned())
        .await
}
