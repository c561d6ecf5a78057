// src/liveness/mod.rs
//! One-shot probe against a healthcheck endpoint, for container liveness
//! and readiness commands.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

pub const DEFAULT_URL: &str = "http://localhost:8000/healthcheck";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unhealthy response: HTTP {0}")]
    Status(StatusCode),
}

/// Performs a single GET and succeeds only on a 2xx answer.
pub async fn probe(url: &str, timeout: Duration) -> Result<StatusCode, ProbeError> {
    let parsed = Url::parse(url).map_err(|source| ProbeError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let client = Client::builder().timeout(timeout).build()?;
    let status = client.get(parsed).send().await?.status();

    if status.is_success() {
        tracing::debug!("Liveness probe {} answered {}", url, status);
        Ok(status)
    } else {
        Err(ProbeError::Status(status))
    }
}
