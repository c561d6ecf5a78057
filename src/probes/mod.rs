// src/probes/mod.rs
mod http;
mod tcp;

pub use http::HttpProbe;
pub use tcp::TcpProbe;

use crate::config::CheckDefinition;
use crate::health::{Check, CheckError};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Turns a configured check into a registrable [`Check`].
///
/// `request_timeout` bounds each HTTP request; the coordinator deadline
/// still applies on top of it.
pub fn build_check(definition: &CheckDefinition, request_timeout: Duration) -> Result<Check, CheckError> {
    let invalid = |reason: String| CheckError::InvalidCheckType {
        name: definition.name().to_string(),
        reason,
    };

    match definition {
        CheckDefinition::Http {
            url, expect_status, ..
        } => {
            let url = Url::parse(url).map_err(|e| invalid(format!("invalid url {:?}: {}", url, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(invalid(format!("unsupported url scheme {:?}", url.scheme())));
            }

            let expect_status = expect_status
                .map(|code| {
                    StatusCode::from_u16(code)
                        .map_err(|_| invalid(format!("invalid expect_status {}", code)))
                })
                .transpose()?;

            let client = Client::builder()
                .timeout(request_timeout)
                .build()
                .map_err(|e| invalid(format!("failed to create HTTP client: {}", e)))?;

            Ok(Check::probe(HttpProbe::new(client, url, expect_status)))
        }
        CheckDefinition::Tcp {
            address,
            connect_timeout_ms,
            ..
        } => {
            let has_port = address
                .rsplit_once(':')
                .map(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
                .unwrap_or(false);
            if !has_port {
                return Err(invalid(format!("address {:?} must be host:port", address)));
            }

            let probe = TcpProbe::new(address.clone(), Duration::from_millis(*connect_timeout_ms));
            Ok(Check::sync(move || probe.check()))
        }
    }
}
