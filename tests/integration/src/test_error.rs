//! Error handling integration tests.
//!
//! None of these requests should reach the upstream provider.

#[cfg(test)]
mod tests {
    use crate::{endpoint_url, post_json, post_raw, relay_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_400_when_task_id_is_missing() {
        let client = relay_client();

        let (status, body) = post_json(&client, "/get-video", &serde_json::json!({})).await;

        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing task_id");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_400_when_task_id_is_empty() {
        let client = relay_client();

        let (status, body) =
            post_json(&client, "/get-video", &serde_json::json!({ "task_id": "" })).await;

        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing task_id");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_400_for_malformed_json() {
        let client = relay_client();

        let (status, body) = post_raw(&client, "/generate-video", "{oops").await;

        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|e| e.starts_with("Invalid request body")),
            "unexpected body: {body}"
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_404_for_unknown_path() {
        let client = relay_client();

        let (status, body) = post_raw(&client, "/generate-image", "{}").await;

        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found: /generate-image");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_405_for_get_on_operation_path() {
        let client = relay_client();

        let resp = client
            .get(format!("{}/generate-video", endpoint_url()))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }
}
