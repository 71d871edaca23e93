use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("request to pulse api failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid pulse api url: {0}")]
    Url(#[from] url::ParseError),
    #[error("pulse api url {0} cannot be used as a base url")]
    BaseUrl(String),
    #[error("pulse api returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("rate limited by pulse api")]
    RateLimited { retry_after: Option<Duration> },
    #[error("unable to decode pulse api response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("malformed pulse api response: {0}")]
    Malformed(String),
    #[error("no device enrollment code in response")]
    MissingCode,
}

pub async fn get_auth<T: DeserializeOwned>(
    client: &Client,
    api_key: &str,
    url: Url,
) -> Result<T, PulseError> {
    return send_auth(client.get(url), api_key).await;
}

pub async fn post_auth<T: DeserializeOwned>(
    client: &Client,
    api_key: &str,
    url: Url,
) -> Result<T, PulseError> {
    return send_auth(client.post(url), api_key).await;
}

async fn send_auth<T: DeserializeOwned>(
    request: RequestBuilder,
    api_key: &str,
) -> Result<T, PulseError> {
    let response = request
        .header(AUTHORIZATION, format!("Bearer {}", api_key))
        .header(ACCEPT, "application/json")
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(PulseError::RateLimited {
            retry_after: retry_after(response.headers()),
        });
    }

    let body = response.text().await?;
    if !status.is_success() {
        return Err(PulseError::Status { status, body });
    }

    Ok(serde_json::from_str::<T>(&body)?)
}

// only the delay-seconds form is supported, http dates are ignored
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    let seconds = value.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(seconds))
}
