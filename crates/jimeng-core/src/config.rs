//! Relay configuration.
//!
//! All configuration is driven by environment variables and loaded once at
//! startup. The resulting [`RelayConfig`] is shared read-only behind an `Arc`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use jimeng_auth::Credentials;

use crate::error::ConfigError;

/// Host of the Volcengine visual API, signed into every request.
pub const DEFAULT_HOST: &str = "visual.volcengineapi.com";

/// Base URL outbound calls are sent to.
pub const DEFAULT_ENDPOINT: &str = "https://visual.volcengineapi.com";

/// API version of the async task actions.
pub const API_VERSION: &str = "2022-08-31";

/// Region in the credential scope.
pub const REGION: &str = "cn-north-1";

/// Service in the credential scope.
pub const SERVICE: &str = "cv";

/// Content type of every outbound body.
pub const CONTENT_TYPE: &str = "application/json";

const DEFAULT_LISTEN_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for the relay process.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Volcengine access key / secret key.
    pub credentials: Credentials,
    /// Interface the listener binds to.
    pub listen_host: IpAddr,
    /// Port the listener binds to.
    pub port: u16,
    /// Base URL outbound calls are sent to.
    pub endpoint: String,
    /// `Host` header value signed into requests.
    pub host: String,
    /// Region in the credential scope.
    pub region: String,
    /// Service in the credential scope.
    pub service: String,
    /// API version query parameter.
    pub api_version: String,
    /// Bound on each outbound call.
    pub upstream_timeout: Duration,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl RelayConfig {
    /// Create a configuration with default settings for the given credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            listen_host: DEFAULT_LISTEN_HOST,
            port: DEFAULT_PORT,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            host: DEFAULT_HOST.to_owned(),
            region: REGION.to_owned(),
            service: SERVICE.to_owned(),
            api_version: API_VERSION.to_owned(),
            upstream_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `ACCESS_KEY` | *(required)* |
    /// | `SECRET_KEY` | *(required)* |
    /// | `LISTEN_HOST` | `0.0.0.0` |
    /// | `PORT` | `5000` |
    /// | `UPSTREAM_ENDPOINT` | `https://visual.volcengineapi.com` |
    /// | `UPSTREAM_TIMEOUT_SECS` | `30` |
    /// | `LOG_LEVEL` | `info` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let access_key = lookup("ACCESS_KEY").ok_or(ConfigError::MissingVar("ACCESS_KEY"))?;
        let secret_key = lookup("SECRET_KEY").ok_or(ConfigError::MissingVar("SECRET_KEY"))?;
        let mut config = Self::new(Credentials::new(access_key, secret_key)?);

        if let Some(v) = lookup("LISTEN_HOST") {
            config.listen_host = parse_var("LISTEN_HOST", &v)?;
        }
        if let Some(v) = lookup("PORT") {
            config.port = parse_var("PORT", &v)?;
        }
        if let Some(v) = lookup("UPSTREAM_ENDPOINT") {
            config.endpoint = parse_endpoint(&v)?;
        }
        if let Some(v) = lookup("UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = parse_var("UPSTREAM_TIMEOUT_SECS", &v)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "UPSTREAM_TIMEOUT_SECS",
                    value: v,
                });
            }
            config.upstream_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }

    /// The socket address the listener binds to.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_host, self.port)
    }

    /// The outbound URL for an API action.
    #[must_use]
    pub fn action_url(&self, action: &str) -> String {
        format!(
            "{}/?Action={action}&Version={}",
            self.endpoint, self.api_version
        )
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_owned(),
        })
}

/// Accept only absolute `http`/`https` URLs; the trailing slash is dropped.
fn parse_endpoint(value: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: "UPSTREAM_ENDPOINT",
        value: value.to_owned(),
    };

    let url = reqwest::Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url.as_str().trim_end_matches('/').to_owned())
}
