// src/probes/http.rs
use crate::health::HealthProbe;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

/// GETs a URL and passes on a 2xx response, or on exactly
/// `expect_status` when one is configured.
pub struct HttpProbe {
    client: Client,
    url: Url,
    expect_status: Option<StatusCode>,
}

impl HttpProbe {
    pub fn new(client: Client, url: Url, expect_status: Option<StatusCode>) -> Self {
        Self {
            client,
            url,
            expect_status,
        }
    }

    fn accepts(&self, status: StatusCode) -> bool {
        match self.expect_status {
            Some(expected) => status == expected,
            None => status.is_success(),
        }
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn check(&self) -> bool {
        match self.client.get(self.url.as_str()).send().await {
            Ok(response) => {
                let status = response.status();
                let passed = self.accepts(status);
                if !passed {
                    debug!("HTTP probe {} answered {}", self.url, status);
                }
                passed
            }
            Err(e) => {
                debug!("HTTP probe {} failed: {}", self.url, e);
                false
            }
        }
    }
}
