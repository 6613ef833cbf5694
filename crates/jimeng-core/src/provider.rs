//! Relay provider implementing `SubmitTask` and `GetTaskResult`.
//!
//! Each operation builds the upstream body, serializes it once, signs those
//! exact bytes and forwards them through an [`Upstream`].

use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, HeaderValue};
use serde::de::IgnoredAny;
use jimeng_auth::{SigningParams, sign};
use jimeng_model::error::RelayError;
use jimeng_model::operations::RelayOperation;
use jimeng_model::types::{
    GenerateVideoInput, GenerateVideoOutput, GetVideoInput, TaskQuery, TaskSubmission,
};
use tracing::{debug, info};

use crate::config::{CONTENT_TYPE, RelayConfig};
use crate::upstream::{Upstream, UpstreamRequest, UpstreamResponse};

/// The relay provider.
#[derive(Debug)]
pub struct JimengRelay<U: Upstream> {
    config: Arc<RelayConfig>,
    upstream: U,
}

impl<U: Upstream> JimengRelay<U> {
    /// Create a provider sending through `upstream`.
    #[must_use]
    pub fn new(config: Arc<RelayConfig>, upstream: U) -> Self {
        Self { config, upstream }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Submit an image-to-video task.
    ///
    /// Returns the body that was sent alongside the upstream status and payload.
    pub async fn submit_task(
        &self,
        input: GenerateVideoInput,
    ) -> Result<GenerateVideoOutput, RelayError> {
        let submission = TaskSubmission::from(input);
        let body = serde_json::to_vec(&submission)
            .map_err(|e| RelayError::internal_error(format!("failed to encode submission: {e}")))?;

        let response = self.call(RelayOperation::SubmitTask, body).await?;
        let response_data = parse_payload(&response)?;

        info!(
            images = submission.image_urls.len(),
            status = response.status.as_u16(),
            "submitted video task"
        );

        Ok(GenerateVideoOutput {
            request_body: submission,
            response_status: response.status.as_u16(),
            response_data,
        })
    }

    /// Fetch the status or result of a previously submitted task.
    ///
    /// A missing or empty `task_id` is rejected before any upstream call.
    /// On success the upstream body is returned byte for byte, once it is
    /// known to be valid JSON.
    pub async fn get_task_result(&self, input: GetVideoInput) -> Result<Bytes, RelayError> {
        let task_id = input
            .task_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RelayError::missing_field("task_id"))?;

        let query = TaskQuery::new(task_id);
        let body = serde_json::to_vec(&query)
            .map_err(|e| RelayError::internal_error(format!("failed to encode query: {e}")))?;

        let response = self.call(RelayOperation::GetTaskResult, body).await?;
        serde_json::from_slice::<IgnoredAny>(&response.body)
            .map_err(|e| non_json(&response, &e))?;
        info!(task_id = %query.task_id, "fetched task result");

        Ok(response.body)
    }

    /// Sign `body` for `op` and send it.
    async fn call(
        &self,
        op: RelayOperation,
        body: Vec<u8>,
    ) -> Result<UpstreamResponse, RelayError> {
        let request = self.build_request(op, body)?;
        Ok(self.upstream.post(request).await?)
    }

    /// Build the signed outbound request for `op` carrying `body`.
    pub fn build_request(
        &self,
        op: RelayOperation,
        body: Vec<u8>,
    ) -> Result<UpstreamRequest, RelayError> {
        let config = &self.config;
        let params = SigningParams::new(
            op.action(),
            &config.api_version,
            CONTENT_TYPE,
            &config.host,
            &config.region,
            &config.service,
        );
        let signed = sign(&config.credentials, &params, &body);
        debug!(
            operation = %op,
            timestamp = %signed.timestamp,
            canonical_request_hash = %signed.canonical_request_hash,
            "signed upstream request"
        );

        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE),
        );
        headers.insert(http::header::HOST, header_value(&config.host)?);
        headers.insert(
            http::header::AUTHORIZATION,
            header_value(&signed.authorization)?,
        );
        headers.insert("x-date", header_value(&signed.timestamp)?);

        Ok(UpstreamRequest {
            url: config.action_url(op.action()),
            headers,
            body: Bytes::from(body),
        })
    }
}

fn header_value(value: &str) -> Result<HeaderValue, RelayError> {
    HeaderValue::from_str(value)
        .map_err(|e| RelayError::internal_error(format!("invalid header value: {e}")))
}

fn parse_payload(response: &UpstreamResponse) -> Result<serde_json::Value, RelayError> {
    serde_json::from_slice(&response.body).map_err(|e| non_json(response, &e))
}

fn non_json(response: &UpstreamResponse, err: &serde_json::Error) -> RelayError {
    RelayError::upstream_other(format!(
        "upstream returned {} with a non-JSON body: {err}",
        response.status
    ))
}
