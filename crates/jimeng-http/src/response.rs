//! Relay response serialization and error formatting.

use jimeng_model::error::RelayError;

use crate::body::RelayResponseBody;

/// Content type for relay JSON responses.
pub const CONTENT_TYPE: &str = "application/json";

/// Header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Serialize a relay error into a JSON response body.
///
/// ```json
/// { "error": "Missing task_id" }
/// ```
#[must_use]
pub fn error_to_json(error: &RelayError) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({ "error": error.message }))
        .expect("JSON serialization of error cannot fail")
}

/// Convert a `RelayError` into a complete HTTP error response.
#[must_use]
pub fn error_to_response(error: &RelayError, request_id: &str) -> http::Response<RelayResponseBody> {
    http::Response::builder()
        .status(error.status_code)
        .header("content-type", CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id)
        .body(RelayResponseBody::from_json(error_to_json(error)))
        .expect("valid error response")
}

/// Build a `200 OK` response from JSON bytes.
#[must_use]
pub fn json_response(json: Vec<u8>, request_id: &str) -> http::Response<RelayResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("content-type", CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id)
        .body(RelayResponseBody::from_json(json))
        .expect("valid JSON response")
}

/// Build the health probe response.
#[must_use]
pub fn health_response(version: &str, request_id: &str) -> http::Response<RelayResponseBody> {
    let body = serde_json::json!({ "status": "running", "version": version }).to_string();
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("content-type", CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id)
        .body(RelayResponseBody::from_bytes(body))
        .expect("valid health response")
}
