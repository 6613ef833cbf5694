//! Upstream task bodies and the relay's inbound/outbound JSON shapes.

use serde::{Deserialize, Serialize};

/// The model identifier sent as `req_key` on every upstream call.
pub const REQ_KEY: &str = "jimeng_vgfm_i2v_l20";

/// Aspect ratio used when the client does not supply one.
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Body of a `CVSync2AsyncSubmitTask` call.
///
/// Field declaration order is the serialized key order; the signed bytes
/// depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSubmission {
    /// Model identifier, always [`REQ_KEY`] for bodies built by the relay.
    pub req_key: String,
    /// Source image URLs, order preserved.
    pub image_urls: Vec<String>,
    /// Text prompt.
    pub prompt: String,
    /// Output aspect ratio, e.g. `16:9`.
    pub aspect_ratio: String,
}

impl TaskSubmission {
    /// Build a submission for the relay's model.
    #[must_use]
    pub fn new(
        image_urls: Vec<String>,
        prompt: impl Into<String>,
        aspect_ratio: impl Into<String>,
    ) -> Self {
        Self {
            req_key: REQ_KEY.to_owned(),
            image_urls,
            prompt: prompt.into(),
            aspect_ratio: aspect_ratio.into(),
        }
    }
}

impl From<GenerateVideoInput> for TaskSubmission {
    fn from(input: GenerateVideoInput) -> Self {
        Self::new(
            input.image_urls.unwrap_or_default(),
            input.prompt.unwrap_or_default(),
            input
                .aspect_ratio
                .unwrap_or_else(|| DEFAULT_ASPECT_RATIO.to_owned()),
        )
    }
}

/// Body of a `CVSync2AsyncGetResult` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Model identifier.
    pub req_key: String,
    /// Provider-issued task identifier.
    pub task_id: String,
}

impl TaskQuery {
    /// Build a query for the relay's model.
    #[must_use]
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            req_key: REQ_KEY.to_owned(),
            task_id: task_id.into(),
        }
    }
}

/// Inbound body of `POST /generate-video`.
///
/// Every field is optional; absent or `null` values fall back to an empty
/// list, an empty prompt, and [`DEFAULT_ASPECT_RATIO`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateVideoInput {
    /// Source image URLs.
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
    /// Text prompt.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Output aspect ratio.
    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

/// Inbound body of `POST /get-video`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GetVideoInput {
    /// Task to look up; validated by the relay.
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Success body of `POST /generate-video`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateVideoOutput {
    /// The submission exactly as it was sent upstream.
    pub request_body: TaskSubmission,
    /// Upstream HTTP status code.
    pub response_status: u16,
    /// Upstream JSON payload, verbatim.
    pub response_data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_submission_in_declared_key_order() {
        let submission =
            TaskSubmission::new(vec!["https://x/img.png".to_owned()], "a cat", "16:9");
        let json = serde_json::to_string(&submission).unwrap();
        assert_eq!(
            json,
            r#"{"req_key":"jimeng_vgfm_i2v_l20","image_urls":["https://x/img.png"],"prompt":"a cat","aspect_ratio":"16:9"}"#
        );
    }

    #[test]
    fn test_should_round_trip_submission_preserving_url_order() {
        let submission = TaskSubmission::new(
            vec![
                "https://x/3.png".to_owned(),
                "https://x/1.png".to_owned(),
                "https://x/2.png".to_owned(),
            ],
            "waves",
            "9:16",
        );
        let json = serde_json::to_vec(&submission).unwrap();
        let parsed: TaskSubmission = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed, submission);
    }

    #[test]
    fn test_should_serialize_query() {
        let query = TaskQuery::new("7392616336519610409");
        let json = serde_json::to_string(&query).unwrap();
        assert_eq!(
            json,
            r#"{"req_key":"jimeng_vgfm_i2v_l20","task_id":"7392616336519610409"}"#
        );
    }

    #[test]
    fn test_should_apply_defaults_for_empty_generate_input() {
        let input: GenerateVideoInput = serde_json::from_str("{}").unwrap();
        let submission = TaskSubmission::from(input);
        assert!(submission.image_urls.is_empty());
        assert_eq!(submission.prompt, "");
        assert_eq!(submission.aspect_ratio, DEFAULT_ASPECT_RATIO);
        assert_eq!(submission.req_key, REQ_KEY);
    }

    #[test]
    fn test_should_treat_null_aspect_ratio_as_default() {
        let input: GenerateVideoInput =
            serde_json::from_str(r#"{"prompt":"p","aspect_ratio":null}"#).unwrap();
        let submission = TaskSubmission::from(input);
        assert_eq!(submission.aspect_ratio, "16:9");
        assert_eq!(submission.prompt, "p");
    }

    #[test]
    fn test_should_ignore_unknown_input_fields() {
        let input: GenerateVideoInput =
            serde_json::from_str(r#"{"prompt":"p","req_key":"other"}"#).unwrap();
        assert_eq!(TaskSubmission::from(input).req_key, REQ_KEY);
    }

    #[test]
    fn test_should_parse_missing_task_id_as_none() {
        let input: GetVideoInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.task_id, None);
    }
}
