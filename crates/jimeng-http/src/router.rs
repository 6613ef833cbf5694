//! Relay request router.
//!
//! The relay exposes a flat set of `POST` endpoints, one per upstream
//! operation, plus a `GET` health probe:
//!
//! ```text
//! POST /generate-video  -> SubmitTask
//! POST /get-video       -> GetTaskResult
//! GET  /health          -> health check
//! ```

use jimeng_model::error::RelayError;
use jimeng_model::operations::RelayOperation;

/// Paths answered by the health probe.
const HEALTH_PATHS: [&str; 2] = ["/health", "/_health"];

/// The destination of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Forward to an upstream operation.
    Operation(RelayOperation),
    /// Answer the health probe locally.
    Health,
}

/// Resolve the route for a request method and path.
///
/// Known paths with the wrong method yield a 405 error; unknown paths a 404.
pub fn resolve_route(method: &http::Method, path: &str) -> Result<Route, RelayError> {
    let Some(allowed) = allowed_method(path) else {
        return Err(RelayError::not_found(path));
    };

    if *method != allowed {
        return Err(RelayError::method_not_allowed(method, path));
    }

    Ok(RelayOperation::from_path(path).map_or(Route::Health, Route::Operation))
}

/// The single method a known path accepts, used for the `Allow` header.
#[must_use]
pub fn allowed_method(path: &str) -> Option<http::Method> {
    if RelayOperation::from_path(path).is_some() {
        Some(http::Method::POST)
    } else if HEALTH_PATHS.contains(&path) {
        Some(http::Method::GET)
    } else {
        None
    }
}
