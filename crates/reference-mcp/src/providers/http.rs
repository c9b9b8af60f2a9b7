//! HTTP plumbing shared by the providers.
//!
//! One pooled reqwest client per provider with gzip. Each request carries
//! the provider's timeout. No retry layer: a failed call is final for that
//! fanout.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};

use crate::config::{Config, api};
use crate::error::{ProviderError, ProviderResult};

/// Build a provider HTTP client.
pub fn build_client(config: &Config, headers: HeaderMap) -> ProviderResult<Client> {
    let client = Client::builder()
        .default_headers(headers)
        .user_agent(api::USER_AGENT)
        .connect_timeout(config.connect_timeout)
        .gzip(true)
        .build()?;
    Ok(client)
}

/// GET `url` with query parameters and return the decoded JSON body.
pub async fn get_json(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    timeout: Duration,
) -> ProviderResult<serde_json::Value> {
    let response = send(client, url, params, timeout).await?;
    response.json().await.map_err(|e| transport_error(e, timeout))
}

/// GET `url` with query parameters and return the body as text.
pub async fn get_text(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    timeout: Duration,
) -> ProviderResult<String> {
    let response = send(client, url, params, timeout).await?;
    response.text().await.map_err(|e| transport_error(e, timeout))
}

async fn send(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    timeout: Duration,
) -> ProviderResult<reqwest::Response> {
    let response = client
        .get(url)
        .query(params)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| transport_error(e, timeout))?;
    handle_response(response).await
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> ProviderError {
    if err.is_timeout() { ProviderError::Timeout(timeout) } else { ProviderError::Http(err) }
}

/// Map non-success status codes to [`ProviderError`].
async fn handle_response(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        return Err(ProviderError::rate_limited(retry_after));
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::from_status(status.as_u16(), body))
}
