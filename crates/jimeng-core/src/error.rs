//! Startup configuration errors.

use jimeng_auth::AuthError;

/// Errors raised while loading [`RelayConfig`](crate::RelayConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable holds an unparsable value.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// The variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The credential pair was rejected.
    #[error("invalid credentials: {0}")]
    Credentials(#[from] AuthError),
}
