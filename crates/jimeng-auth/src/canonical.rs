//! Canonical request construction for Volcengine request signing.
//!
//! The canonical request has the same layout as AWS SigV4:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Volcengine's visual API is always called with `Action` and `Version` query
//! parameters and signs exactly `content-type` and `host`, so the pieces here
//! are fixed-shape rather than generic over arbitrary header sets.

/// The HTTP method used for every relayed call.
pub const METHOD: &str = "POST";

/// The canonical URI used for every relayed call.
pub const CANONICAL_URI: &str = "/";

/// The signed headers list, in canonical (sorted, lowercase) order.
pub const SIGNED_HEADERS: &str = "content-type;host";

/// Build the canonical query string for an API action.
///
/// Parameters appear in the fixed order `Action`, `Version`, which is also
/// their sorted order. Values are used literally.
///
/// # Examples
///
/// ```
/// use jimeng_auth::canonical::build_canonical_query_string;
///
/// assert_eq!(
///     build_canonical_query_string("CVSync2AsyncGetResult", "2022-08-31"),
///     "Action=CVSync2AsyncGetResult&Version=2022-08-31",
/// );
/// ```
#[must_use]
pub fn build_canonical_query_string(action: &str, version: &str) -> String {
    format!("Action={action}&Version={version}")
}

/// Build the canonical headers block.
///
/// Each header line is terminated by `\n`, including the last one. That
/// trailing newline produces the blank line between the headers block and the
/// signed headers list once the canonical request is joined.
///
/// # Examples
///
/// ```
/// use jimeng_auth::canonical::build_canonical_headers;
///
/// assert_eq!(
///     build_canonical_headers("application/json", "visual.volcengineapi.com"),
///     "content-type:application/json\nhost:visual.volcengineapi.com\n",
/// );
/// ```
#[must_use]
pub fn build_canonical_headers(content_type: &str, host: &str) -> String {
    format!("content-type:{content_type}\nhost:{host}\n")
}

/// Build the full canonical request string from its components.
///
/// `canonical_headers` must already carry its trailing newline (see
/// [`build_canonical_headers`]).
#[must_use]
pub fn build_canonical_request(
    method: &str,
    uri: &str,
    query_string: &str,
    canonical_headers: &str,
    signed_headers: &str,
    payload_hash: &str,
) -> String {
    format!("{method}\n{uri}\n{query_string}\n{canonical_headers}\n{signed_headers}\n{payload_hash}")
}
