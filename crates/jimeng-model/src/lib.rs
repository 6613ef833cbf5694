//! Model types for the Jimeng video-generation relay.
//!
//! - [`types`] - Upstream task bodies and inbound/outbound JSON shapes
//! - [`operations`] - The relayed operations and their upstream actions
//! - [`error`] - The relay error taxonomy

pub mod error;
pub mod operations;
pub mod types;

pub use error::{RelayError, RelayErrorCode};
pub use operations::RelayOperation;
pub use types::{
    GenerateVideoInput, GenerateVideoOutput, GetVideoInput, REQ_KEY, TaskQuery, TaskSubmission,
};
