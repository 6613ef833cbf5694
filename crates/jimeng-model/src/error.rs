//! Relay error types.
//!
//! Every failure surfaced to a client is a [`RelayError`]: a code from the
//! taxonomy below, a human-readable message, and the HTTP status to return.
//! On the wire it is rendered as `{"error": "<message>"}`.

use std::fmt;

/// Well-known relay error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum RelayErrorCode {
    /// A required request field is absent or empty.
    MissingField,
    /// The inbound body is not valid JSON for the operation.
    #[default]
    InvalidRequestBody,
    /// No route matches the request path.
    NotFound,
    /// The path exists but does not accept the request method.
    MethodNotAllowed,
    /// The provider answered with a 4xx/5xx status.
    UpstreamHttpError,
    /// The provider could not be reached.
    UpstreamConnectionError,
    /// The provider did not answer within the configured timeout.
    UpstreamTimeout,
    /// Any other outbound failure, including unparsable provider responses.
    UpstreamOtherError,
    /// A failure inside the relay itself.
    InternalError,
}

impl RelayErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "MissingField",
            Self::InvalidRequestBody => "InvalidRequestBody",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::UpstreamHttpError => "UpstreamHttpError",
            Self::UpstreamConnectionError => "UpstreamConnectionError",
            Self::UpstreamTimeout => "UpstreamTimeout",
            Self::UpstreamOtherError => "UpstreamOtherError",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Every upstream failure maps to 500 on both endpoints.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::MissingField | Self::InvalidRequestBody => http::StatusCode::BAD_REQUEST,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::UpstreamHttpError
            | Self::UpstreamConnectionError
            | Self::UpstreamTimeout
            | Self::UpstreamOtherError
            | Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for errors caused by the provider call.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamHttpError
                | Self::UpstreamConnectionError
                | Self::UpstreamTimeout
                | Self::UpstreamOtherError
        )
    }
}

impl fmt::Display for RelayErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relay error response.
#[derive(Debug)]
pub struct RelayError {
    /// The error code.
    pub code: RelayErrorCode,
    /// A human-readable error message, sent to the client as `error`.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelayError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl RelayError {
    /// Create a new `RelayError` from an error code.
    #[must_use]
    pub fn new(code: RelayErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.as_str().to_owned(),
            code,
            source: None,
        }
    }

    /// Create a new `RelayError` with a custom message.
    #[must_use]
    pub fn with_message(code: RelayErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// A required field is missing, e.g. `Missing task_id`.
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::with_message(RelayErrorCode::MissingField, format!("Missing {field}"))
    }

    /// The inbound body could not be parsed.
    #[must_use]
    pub fn invalid_body(message: impl fmt::Display) -> Self {
        Self::with_message(
            RelayErrorCode::InvalidRequestBody,
            format!("Invalid request body: {message}"),
        )
    }

    /// No route for the path.
    #[must_use]
    pub fn not_found(path: &str) -> Self {
        Self::with_message(RelayErrorCode::NotFound, format!("Not found: {path}"))
    }

    /// Wrong method for a known path.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method, path: &str) -> Self {
        Self::with_message(
            RelayErrorCode::MethodNotAllowed,
            format!("Method {method} not allowed for {path}"),
        )
    }

    /// The provider answered with a non-success status.
    #[must_use]
    pub fn upstream_http(detail: impl fmt::Display) -> Self {
        Self::with_message(
            RelayErrorCode::UpstreamHttpError,
            format!("Http Error: {detail}"),
        )
    }

    /// The provider could not be reached.
    #[must_use]
    pub fn upstream_connection(detail: impl fmt::Display) -> Self {
        Self::with_message(
            RelayErrorCode::UpstreamConnectionError,
            format!("Error Connecting: {detail}"),
        )
    }

    /// The provider call timed out.
    #[must_use]
    pub fn upstream_timeout(detail: impl fmt::Display) -> Self {
        Self::with_message(
            RelayErrorCode::UpstreamTimeout,
            format!("Timeout Error: {detail}"),
        )
    }

    /// Any other provider call failure.
    #[must_use]
    pub fn upstream_other(detail: impl fmt::Display) -> Self {
        Self::with_message(
            RelayErrorCode::UpstreamOtherError,
            format!("Request Error: {detail}"),
        )
    }

    /// Internal failure.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(RelayErrorCode::InternalError, message)
    }
}
