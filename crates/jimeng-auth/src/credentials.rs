//! The Volcengine access key / secret key pair.

use std::fmt;

use crate::error::AuthError;

/// A validated access key / secret key pair.
///
/// Constructed once at startup and shared read-only for the lifetime of the
/// process. The secret key is redacted from `Debug` output.
///
/// # Examples
///
/// ```
/// use jimeng_auth::Credentials;
///
/// let credentials = Credentials::new("AKLTexample", "hunter2").unwrap();
/// assert_eq!(credentials.access_key(), "AKLTexample");
/// assert!(!format!("{credentials:?}").contains("hunter2"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    /// Create a credential pair, rejecting empty keys.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();

        if access_key.trim().is_empty() {
            return Err(AuthError::MissingAccessKey);
        }
        if secret_key.trim().is_empty() {
            return Err(AuthError::MissingSecretKey);
        }

        Ok(Self {
            access_key,
            secret_key,
        })
    }

    /// The access key identifying the account.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The secret key used to derive signing keys.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}
