//! Integration tests for the Jimeng relay server.
//!
//! These tests require a running relay at `localhost:5000`.
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p jimeng-integration -- --ignored
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the relay under test.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("RELAY_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:5000".to_owned())
}

/// Create an HTTP client for talking to the relay.
#[must_use]
pub fn relay_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("failed to build HTTP client")
}

/// `POST` a raw body to `path` and return the status with the parsed JSON reply.
pub async fn post_raw(
    client: &reqwest::Client,
    path: &str,
    body: &str,
) -> (reqwest::StatusCode, serde_json::Value) {
    let resp = client
        .post(format!("{}{path}", endpoint_url()))
        .header("content-type", "application/json")
        .body(body.to_owned())
        .send()
        .await
        .unwrap_or_else(|e| panic!("POST {path} failed: {e}"));

    let status = resp.status();
    let json = resp
        .json()
        .await
        .unwrap_or_else(|e| panic!("POST {path} returned non-JSON body: {e}"));
    (status, json)
}

/// `POST` a JSON value to `path`.
pub async fn post_json(
    client: &reqwest::Client,
    path: &str,
    body: &serde_json::Value,
) -> (reqwest::StatusCode, serde_json::Value) {
    post_raw(client, path, &body.to_string()).await
}

mod test_error;
mod test_health;
mod test_relay;
