//! HTTP service layer for the Jimeng relay.
//!
//! - **Router**: Maps method + path to a relay operation or the health probe
//! - **Handler trait**: Defines the boundary between HTTP and business logic
//! - **Service**: Hyper `Service` implementation
//! - **Response helpers**: JSON success/error response formatting
#![allow(missing_docs)]

pub mod body;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;

pub use body::RelayResponseBody;
pub use dispatch::RelayHandler;
pub use service::{RelayHttpConfig, RelayHttpService};
