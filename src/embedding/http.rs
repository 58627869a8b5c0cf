//! Shared JSON-over-HTTPS plumbing for the Voyage endpoints.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Failure of a single service round-trip.
#[derive(Debug)]
pub(crate) enum ServiceCallError {
    /// Connection, TLS or timeout failure.
    Transport(String),
    /// Non-2xx response.
    Status { status: u16, body: String },
    /// Body was not the expected JSON shape.
    Decode(String),
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| e.to_string())
}

/// POSTs `body` as JSON with bearer auth and decodes a JSON response.
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: &B,
) -> Result<R, ServiceCallError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| ServiceCallError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ServiceCallError::Status { status, body });
    }

    response
        .json::<R>()
        .await
        .map_err(|e| ServiceCallError::Decode(e.to_string()))
}

/// Joins a base URL and an endpoint path with exactly one slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
