//! Relay HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use tracing::{error, info, warn};

use jimeng_model::error::{RelayError, RelayErrorCode};

use crate::body::RelayResponseBody;
use crate::dispatch::{RelayHandler, dispatch_operation};
use crate::response::{CONTENT_TYPE, REQUEST_ID_HEADER, error_to_response, health_response};
use crate::router::{Route, allowed_method, resolve_route};

/// Default cap on inbound request bodies (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Configuration for the relay HTTP service.
#[derive(Debug, Clone)]
pub struct RelayHttpConfig {
    /// Maximum accepted request body size in bytes.
    pub max_body_size: usize,
    /// Version string reported by the health probe.
    pub version: String,
}

impl Default for RelayHttpConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Hyper `Service` implementation for the relay.
///
/// Wraps a [`RelayHandler`] implementation and routes incoming HTTP
/// requests to the matching relay operation.
#[derive(Debug)]
pub struct RelayHttpService<H: RelayHandler> {
    handler: Arc<H>,
    config: Arc<RelayHttpConfig>,
}

impl<H: RelayHandler> RelayHttpService<H> {
    /// Create a new `RelayHttpService`.
    pub fn new(handler: Arc<H>, config: RelayHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }
}

impl<H: RelayHandler> Clone for RelayHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H, B> hyper::service::Service<http::Request<B>> for RelayHttpService<H>
where
    H: RelayHandler,
    B: http_body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = http::Response<RelayResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = Arc::clone(&self.config);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_owned();

            let response = process_request(req, handler.as_ref(), &config, &request_id).await;

            info!(
                %method,
                %path,
                status = response.status().as_u16(),
                request_id = %request_id,
                "handled request"
            );

            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process a single relay HTTP request through the full pipeline.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    config: &RelayHttpConfig,
    request_id: &str,
) -> http::Response<RelayResponseBody>
where
    H: RelayHandler,
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, incoming) = req.into_parts();

    // 1. Route on method + path.
    let op = match resolve_route(&parts.method, parts.uri.path()) {
        Ok(Route::Operation(op)) => op,
        Ok(Route::Health) => return health_response(&config.version, request_id),
        Err(err) => return route_error_response(&err, parts.uri.path(), request_id),
    };

    // 2. Collect body.
    let body = match collect_body(incoming, config.max_body_size).await {
        Ok(body) => body,
        Err(err) => return error_to_response(&err, request_id),
    };

    // 3. Dispatch to handler.
    match dispatch_operation(handler, op, body, request_id).await {
        Ok(response) => response,
        Err(err) => {
            if err.code == RelayErrorCode::UpstreamConnectionError {
                error!(operation = %op, request_id, error = %err.message, "cannot reach upstream");
            } else if err.code.is_upstream() {
                warn!(operation = %op, request_id, error = %err.message, "upstream call failed");
            }
            error_to_response(&err, request_id)
        }
    }
}

/// Render a routing error, advertising the accepted method on a 405.
fn route_error_response(
    err: &RelayError,
    path: &str,
    request_id: &str,
) -> http::Response<RelayResponseBody> {
    let mut response = error_to_response(err, request_id);
    if err.code == RelayErrorCode::MethodNotAllowed {
        if let Some(allowed) = allowed_method(path) {
            if let Ok(hv) = http::HeaderValue::from_str(allowed.as_str()) {
                response.headers_mut().insert(http::header::ALLOW, hv);
            }
        }
    }
    response
}

/// Collect the incoming body into a single `Bytes` buffer, bounded by `limit`.
async fn collect_body<B>(incoming: B, limit: usize) -> Result<Bytes, RelayError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(incoming, limit)
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| RelayError::invalid_body(format!("failed to read request body: {e}")))
}

/// Add common response headers to every relay response.
fn add_common_headers(
    mut response: http::Response<RelayResponseBody>,
    request_id: &str,
) -> http::Response<RelayResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry(REQUEST_ID_HEADER).or_insert(hv);
    }

    headers
        .entry("content-type")
        .or_insert(http::HeaderValue::from_static(CONTENT_TYPE));

    headers.insert("server", http::HeaderValue::from_static("jimeng-relay"));

    response
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use http_body_util::Full;
    use hyper::service::Service;
    use jimeng_model::operations::RelayOperation;

    use super::*;
    use crate::dispatch::HandlerFuture;
    use crate::response::json_response;

    /// Echoes the operation and body back, recording each call.
    #[derive(Debug, Default)]
    struct EchoHandler {
        calls: Mutex<Vec<(RelayOperation, Bytes)>>,
    }

    impl RelayHandler for EchoHandler {
        fn handle_operation(
            &self,
            op: RelayOperation,
            body: Bytes,
            request_id: String,
        ) -> HandlerFuture {
            self.calls.lock().unwrap().push((op, body.clone()));
            Box::pin(async move {
                let json = serde_json::to_vec(&serde_json::json!({
                    "operation": op.as_str(),
                    "body": String::from_utf8_lossy(&body),
                }))
                .unwrap();
                Ok(json_response(json, &request_id))
            })
        }
    }

    /// Always fails with an upstream timeout.
    #[derive(Debug)]
    struct TimeoutHandler;

    impl RelayHandler for TimeoutHandler {
        fn handle_operation(
            &self,
            _op: RelayOperation,
            _body: Bytes,
            _request_id: String,
        ) -> HandlerFuture {
            Box::pin(async { Err(RelayError::upstream_timeout("after 30s")) })
        }
    }

    fn request(method: http::Method, path: &str, body: &str) -> http::Request<Full<Bytes>> {
        http::Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from(body.to_owned())))
            .unwrap()
    }

    async fn body_json(resp: http::Response<RelayResponseBody>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_should_dispatch_generate_video_with_raw_body() {
        let handler = Arc::new(EchoHandler::default());
        let service = RelayHttpService::new(Arc::clone(&handler), RelayHttpConfig::default());

        let resp = service
            .call(request(
                http::Method::POST,
                "/generate-video",
                r#"{"prompt":"a cat"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), http::StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["operation"], "SubmitTask");
        assert_eq!(body["body"], r#"{"prompt":"a cat"}"#);

        let calls = handler.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, RelayOperation::SubmitTask);
    }

    #[tokio::test]
    async fn test_should_add_common_headers() {
        let service =
            RelayHttpService::new(Arc::new(EchoHandler::default()), RelayHttpConfig::default());

        let resp = service
            .call(request(http::Method::POST, "/get-video", "{}"))
            .await
            .unwrap();

        assert_eq!(resp.headers().get("server").unwrap(), "jimeng-relay");
        assert_eq!(resp.headers().get("content-type").unwrap(), CONTENT_TYPE);
        assert!(resp.headers().get(REQUEST_ID_HEADER).is_some());
    }

    #[tokio::test]
    async fn test_should_answer_health_without_calling_handler() {
        let handler = Arc::new(EchoHandler::default());
        let config = RelayHttpConfig {
            version: "9.9.9".to_owned(),
            ..RelayHttpConfig::default()
        };
        let service = RelayHttpService::new(Arc::clone(&handler), config);

        let resp = service
            .call(request(http::Method::GET, "/health", ""))
            .await
            .unwrap();

        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(body_json(resp).await["version"], "9.9.9");
        assert!(handler.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_should_return_404_json_for_unknown_path() {
        let handler = Arc::new(EchoHandler::default());
        let service = RelayHttpService::new(Arc::clone(&handler), RelayHttpConfig::default());

        let resp = service
            .call(request(http::Method::POST, "/nope", "{}"))
            .await
            .unwrap();

        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "Not found: /nope");
        assert!(handler.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_should_reject_oversized_body() {
        let handler = Arc::new(EchoHandler::default());
        let config = RelayHttpConfig {
            max_body_size: 8,
            ..RelayHttpConfig::default()
        };
        let service = RelayHttpService::new(Arc::clone(&handler), config);

        let resp = service
            .call(request(
                http::Method::POST,
                "/generate-video",
                r#"{"prompt":"much too long"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
        assert!(handler.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_should_render_handler_errors_as_json() {
        let service = RelayHttpService::new(Arc::new(TimeoutHandler), RelayHttpConfig::default());

        let resp = service
            .call(request(http::Method::POST, "/get-video", r#"{"task_id":"t"}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "Timeout Error: after 30s");
    }

    #[tokio::test]
    async fn test_should_advertise_allowed_method_on_405() {
        let handler = Arc::new(EchoHandler::default());
        let service = RelayHttpService::new(Arc::clone(&handler), RelayHttpConfig::default());

        let resp = service
            .call(request(http::Method::GET, "/get-video", ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get(http::header::ALLOW).unwrap(), "POST");

        let resp = service
            .call(request(http::Method::POST, "/health", ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get(http::header::ALLOW).unwrap(), "GET");

        assert!(handler.calls.lock().unwrap().is_empty());
    }
}
