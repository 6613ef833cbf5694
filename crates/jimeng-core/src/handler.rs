//! Relay handler bridging HTTP to business logic.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use jimeng_http::dispatch::{HandlerFuture, RelayHandler};
use jimeng_http::response::json_response;
use jimeng_model::error::RelayError;
use jimeng_model::operations::RelayOperation;
use jimeng_model::types::{GenerateVideoInput, GetVideoInput};

use crate::provider::JimengRelay;
use crate::upstream::Upstream;

/// Handler that bridges the HTTP layer to the relay provider.
#[derive(Debug)]
pub struct JimengRelayHandler<U: Upstream> {
    relay: Arc<JimengRelay<U>>,
}

impl<U: Upstream> JimengRelayHandler<U> {
    /// Create a new handler wrapping the given provider.
    #[must_use]
    pub fn new(relay: Arc<JimengRelay<U>>) -> Self {
        Self { relay }
    }
}

impl<U: Upstream> RelayHandler for JimengRelayHandler<U> {
    fn handle_operation(
        &self,
        op: RelayOperation,
        body: Bytes,
        request_id: String,
    ) -> HandlerFuture {
        let relay = Arc::clone(&self.relay);
        Box::pin(async move {
            let json = match op {
                RelayOperation::SubmitTask => {
                    let input: GenerateVideoInput = deserialize(&body)?;
                    serialize(&relay.submit_task(input).await?)?
                }
                RelayOperation::GetTaskResult => {
                    let input: GetVideoInput = deserialize(&body)?;
                    relay.get_task_result(input).await?.to_vec()
                }
            };
            Ok(json_response(json, &request_id))
        })
    }
}

fn deserialize<T: DeserializeOwned>(body: &[u8]) -> Result<T, RelayError> {
    serde_json::from_slice(body).map_err(RelayError::invalid_body)
}

fn serialize<T: Serialize>(output: &T) -> Result<Vec<u8>, RelayError> {
    serde_json::to_vec(output)
        .map_err(|e| RelayError::internal_error(format!("failed to serialize response: {e}")))
}
