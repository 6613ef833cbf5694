//! Volcengine HMAC-SHA256 request signing.
//!
//! The signing flow mirrors AWS SigV4 with Volcengine's constants:
//!
//! 1. Hash the raw request body and build the canonical request.
//! 2. Build the string to sign from the timestamp, credential scope, and
//!    canonical request hash.
//! 3. Derive the signing key with an HMAC-SHA256 chain seeded by
//!    `"VOLC" + secret_key`.
//! 4. Hex-encode the HMAC of the string to sign and assemble the
//!    `Authorization` header.
//!
//! The entry points are [`sign`] (current time) and [`sign_at`] (explicit
//! instant). Date and timestamp are always derived from the same instant.

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::canonical::{
    CANONICAL_URI, METHOD, SIGNED_HEADERS, build_canonical_headers, build_canonical_query_string,
    build_canonical_request,
};
use crate::credentials::Credentials;
use crate::error::AuthError;

/// The signing algorithm name used in the string to sign and the header.
pub const ALGORITHM: &str = "HMAC-SHA256";

/// Prefix prepended to the secret key to seed the key derivation chain.
const KEY_PREFIX: &str = "VOLC";

/// Terminal component of the credential scope.
const SCOPE_TERMINATOR: &str = "request";

type HmacSha256 = Hmac<Sha256>;

/// The request attributes that enter the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningParams<'a> {
    /// API action, e.g. `CVSync2AsyncSubmitTask`.
    pub action: &'a str,
    /// API version, e.g. `2022-08-31`.
    pub version: &'a str,
    /// Value of the `Content-Type` header.
    pub content_type: &'a str,
    /// Value of the `Host` header.
    pub host: &'a str,
    /// Region in the credential scope, e.g. `cn-north-1`.
    pub region: &'a str,
    /// Service in the credential scope, e.g. `cv`.
    pub service: &'a str,
}

impl<'a> SigningParams<'a> {
    /// Bundle the signing attributes.
    #[must_use]
    pub fn new(
        action: &'a str,
        version: &'a str,
        content_type: &'a str,
        host: &'a str,
        region: &'a str,
        service: &'a str,
    ) -> Self {
        Self {
            action,
            version,
            content_type,
            host,
            region,
            service,
        }
    }
}

/// The per-call signing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// `YYYYMMDDTHHMMSSZ`, sent as `X-Date`.
    pub timestamp: String,
    /// Hex SHA-256 of the canonical request.
    pub canonical_request_hash: String,
    /// Full `Authorization` header value.
    pub authorization: String,
}

/// Sign a request body using the current UTC time.
#[must_use]
pub fn sign(credentials: &Credentials, params: &SigningParams<'_>, body: &[u8]) -> SignedRequest {
    sign_at(credentials, params, body, Utc::now())
}

/// Sign a request body at a fixed instant.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use jimeng_auth::{Credentials, SigningParams, sign_at};
///
/// let credentials = Credentials::new("AK", "SK").unwrap();
/// let params = SigningParams::new(
///     "CVSync2AsyncGetResult",
///     "2022-08-31",
///     "application/json",
///     "visual.volcengineapi.com",
///     "cn-north-1",
///     "cv",
/// );
/// let now = Utc.with_ymd_and_hms(2024, 5, 20, 8, 30, 15).unwrap();
///
/// let signed = sign_at(&credentials, &params, b"{}", now);
/// assert_eq!(signed.timestamp, "20240520T083015Z");
/// ```
#[must_use]
pub fn sign_at(
    credentials: &Credentials,
    params: &SigningParams<'_>,
    body: &[u8],
    now: DateTime<Utc>,
) -> SignedRequest {
    let date = now.format("%Y%m%d").to_string();
    let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();

    let canonical_request = build_canonical_request(
        METHOD,
        CANONICAL_URI,
        &build_canonical_query_string(params.action, params.version),
        &build_canonical_headers(params.content_type, params.host),
        SIGNED_HEADERS,
        &hash_payload(body),
    );

    debug!(canonical_request, "Built canonical request");

    let canonical_request_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    let credential_scope = build_credential_scope(&date, params.region, params.service);
    let string_to_sign = build_string_to_sign(&timestamp, &credential_scope, &canonical_request_hash);

    debug!(string_to_sign, "Built string to sign");

    let signing_key = derive_signing_key(
        credentials.secret_key(),
        &date,
        params.region,
        params.service,
    );
    let signature = compute_signature(&signing_key, &string_to_sign);

    let authorization = format!(
        "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credentials.access_key(),
    );

    SignedRequest {
        timestamp,
        canonical_request_hash,
        authorization,
    }
}

/// Build the credential scope `date/region/service/request`.
#[must_use]
pub fn build_credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{date}/{region}/{service}/{SCOPE_TERMINATOR}")
}

/// Build the string to sign.
///
/// Format:
/// ```text
/// HMAC-SHA256\n
/// <timestamp>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the signing key using the HMAC-SHA256 chain.
///
/// ```text
/// DateKey    = HMAC-SHA256("VOLC" + secret_key, date)
/// RegionKey  = HMAC-SHA256(DateKey, region)
/// ServiceKey = HMAC-SHA256(RegionKey, service)
/// SigningKey = HMAC-SHA256(ServiceKey, "request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("{KEY_PREFIX}{secret_key}").as_bytes(), date.as_bytes());
    let region_key = hmac_sha256(&date_key, region.as_bytes());
    let service_key = hmac_sha256(&region_key, service.as_bytes());
    hmac_sha256(&service_key, SCOPE_TERMINATOR.as_bytes())
}

/// Compute the hex-encoded HMAC-SHA256 of `data` under `signing_key`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Compute the hex-encoded SHA-256 of a request body.
///
/// # Examples
///
/// ```
/// use jimeng_auth::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Compute HMAC-SHA256 and return the raw bytes.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Parsed components of a Volcengine `Authorization` header.
///
/// Format:
/// ```text
/// HMAC-SHA256 Credential=AK/20240520/cn-north-1/cv/request,
///   SignedHeaders=content-type;host, Signature=<hex-signature>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAuthorization {
    /// The access key.
    pub access_key: String,
    /// The date component of the credential scope (`YYYYMMDD`).
    pub date: String,
    /// The region from the credential scope.
    pub region: String,
    /// The service from the credential scope.
    pub service: String,
    /// The signed header names.
    pub signed_headers: Vec<String>,
    /// The hex-encoded signature.
    pub signature: String,
}

/// Parse an `Authorization` header value produced by [`sign`].
///
/// # Errors
///
/// Returns [`AuthError::InvalidAuthHeader`] for malformed headers or
/// signatures that are not 64 hex digits, [`AuthError::UnsupportedAlgorithm`]
/// for anything other than `HMAC-SHA256`, and [`AuthError::InvalidCredential`]
/// when the credential is not `AK/date/region/service/request`.
pub fn parse_authorization_header(header: &str) -> Result<ParsedAuthorization, AuthError> {
    let (algorithm, rest) = header.split_once(' ').ok_or(AuthError::InvalidAuthHeader)?;

    if algorithm != ALGORITHM {
        return Err(AuthError::UnsupportedAlgorithm(algorithm.to_owned()));
    }

    let mut credential = None;
    let mut signed_headers = None;
    let mut signature = None;

    for part in rest.split(',') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("Credential=") {
            credential = Some(value);
        } else if let Some(value) = part.strip_prefix("SignedHeaders=") {
            signed_headers = Some(value);
        } else if let Some(value) = part.strip_prefix("Signature=") {
            signature = Some(value);
        }
    }

    let credential = credential.ok_or(AuthError::InvalidAuthHeader)?;
    let signed_headers = signed_headers.ok_or(AuthError::InvalidAuthHeader)?;
    let signature = signature.ok_or(AuthError::InvalidAuthHeader)?;

    let cred_parts: Vec<&str> = credential.splitn(5, '/').collect();
    if cred_parts.len() != 5 || cred_parts[4] != SCOPE_TERMINATOR {
        return Err(AuthError::InvalidCredential);
    }

    if signature.len() != 64 || !signature.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(ParsedAuthorization {
        access_key: cred_parts[0].to_owned(),
        date: cred_parts[1].to_owned(),
        region: cred_parts[2].to_owned(),
        service: cred_parts[3].to_owned(),
        signed_headers: signed_headers.split(';').map(ToOwned::to_owned).collect(),
        signature: signature.to_owned(),
    })
}
