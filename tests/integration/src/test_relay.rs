//! Relay round-trip integration tests.
//!
//! These reach the configured upstream. With valid credentials the provider
//! answers 2xx; otherwise the relay reports a classified 500.

#[cfg(test)]
mod tests {
    use crate::{post_json, relay_client};

    const UPSTREAM_PREFIXES: [&str; 4] = [
        "Http Error: ",
        "Error Connecting: ",
        "Timeout Error: ",
        "Request Error: ",
    ];

    fn assert_classified(body: &serde_json::Value) {
        let error = body["error"].as_str().unwrap_or_default();
        assert!(
            UPSTREAM_PREFIXES.iter().any(|p| error.starts_with(p)),
            "unclassified error: {body}"
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_echo_submitted_body_with_defaults() {
        let client = relay_client();

        let (status, body) = post_json(
            &client,
            "/generate-video",
            &serde_json::json!({
                "image_urls": ["https://example.com/a.png", "https://example.com/b.png"],
                "prompt": "a cat surfing",
            }),
        )
        .await;

        if status == reqwest::StatusCode::OK {
            let sent = &body["request_body"];
            assert_eq!(sent["req_key"], "jimeng_vgfm_i2v_l20");
            assert_eq!(sent["aspect_ratio"], "16:9");
            assert_eq!(sent["image_urls"][1], "https://example.com/b.png");
            assert!(body["response_status"].is_u64());
            assert!(body.get("response_data").is_some());
        } else {
            assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
            assert_classified(&body);
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_relay_task_lookup() {
        let client = relay_client();

        let (status, body) = post_json(
            &client,
            "/get-video",
            &serde_json::json!({ "task_id": "0000000000000000000" }),
        )
        .await;

        if status == reqwest::StatusCode::OK {
            assert!(body.is_object());
        } else {
            assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
            assert_classified(&body);
        }
    }
}
