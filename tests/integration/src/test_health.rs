//! Health probe integration tests.

#[cfg(test)]
mod tests {
    use crate::{endpoint_url, relay_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_running_on_health() {
        let client = relay_client();

        for path in ["/health", "/_health"] {
            let resp = client
                .get(format!("{}{path}", endpoint_url()))
                .send()
                .await
                .unwrap();

            assert_eq!(resp.status(), reqwest::StatusCode::OK, "path: {path}");
            assert!(resp.headers().contains_key("x-request-id"));

            let body: serde_json::Value = resp.json().await.unwrap();
            assert_eq!(body["status"], "running");
            assert!(body["version"].is_string());
        }
    }
}
