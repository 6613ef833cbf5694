//! Volcengine request signing for the Jimeng relay.
//!
//! Volcengine's OpenAPI uses a V4-style signature: a canonical request is
//! hashed, wrapped into a string to sign bound to a credential scope, and
//! signed with a key derived from the secret through a chain of HMAC-SHA256
//! steps. This crate implements the signing side for the fixed request shape
//! the relay sends (`POST /` with `Action` and `Version` query parameters and
//! `content-type;host` as the signed headers).
//!
//! # Usage
//!
//! ```rust
//! use jimeng_auth::{Credentials, SigningParams, sign};
//!
//! let credentials = Credentials::new("AKLTexample", "secret").unwrap();
//! let params = SigningParams::new(
//!     "CVSync2AsyncSubmitTask",
//!     "2022-08-31",
//!     "application/json",
//!     "visual.volcengineapi.com",
//!     "cn-north-1",
//!     "cv",
//! );
//!
//! let signed = sign(&credentials, &params, br#"{"req_key":"k"}"#);
//! assert!(signed.authorization.starts_with("HMAC-SHA256 Credential=AKLTexample/"));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction
//! - [`credentials`] - Access key / secret key pair
//! - [`error`] - Authentication error types
//! - [`signer`] - String to sign, key derivation and the signing entry points

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod signer;

pub use credentials::Credentials;
pub use error::AuthError;
pub use signer::{
    ParsedAuthorization, SignedRequest, SigningParams, hash_payload, parse_authorization_header,
    sign, sign_at,
};
