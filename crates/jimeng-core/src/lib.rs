//! Relay logic for the Jimeng video-generation relay.
//!
//! This crate wires the signer to the provider's task API:
//!
//! - [`config`] - Environment-driven configuration, loaded once at startup
//! - [`upstream`] - The outbound transport and its error classification
//! - [`provider`] - `SubmitTask` / `GetTaskResult`
//! - [`handler`] - Bridges the HTTP layer to the provider

pub mod config;
pub mod error;
pub mod handler;
pub mod provider;
pub mod upstream;

pub use config::RelayConfig;
pub use error::ConfigError;
pub use handler::JimengRelayHandler;
pub use provider::JimengRelay;
pub use upstream::{HttpUpstream, Upstream, UpstreamError, UpstreamRequest, UpstreamResponse};
