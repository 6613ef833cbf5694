//! Error types for request signing.

/// Errors that can occur while preparing or inspecting Volcengine signatures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The access key is missing or empty.
    #[error("missing access key")]
    MissingAccessKey,

    /// The secret key is missing or empty.
    #[error("missing secret key")]
    MissingSecretKey,

    /// The `Authorization` header could not be parsed.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The signing algorithm is not `HMAC-SHA256`.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The `Credential` component does not match
    /// `AK/date/region/service/request`.
    #[error("Invalid credential format")]
    InvalidCredential,
}
