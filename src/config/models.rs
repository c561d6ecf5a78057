// src/config/models.rs
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub checker: CheckerConfig,
    pub server: ServerConfig,
    pub checks: Vec<CheckDefinition>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.checker.validate()?;
        self.server.validate()?;

        let mut seen = HashSet::new();
        for check in &self.checks {
            if check.name().trim().is_empty() {
                bail!("Check names must not be empty");
            }
            if !seen.insert(check.name()) {
                bail!("Duplicate check name in config: {:?}", check.name());
            }
        }

        Ok(())
    }
}

/// Upper bound for `timeout_secs`: one day.
pub const MAX_TIMEOUT_SECS: f64 = 86_400.0;

const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub success_code: u16,
    pub fail_code: u16,
    pub timeout_secs: f64,
    pub max_blocking_workers: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            success_code: 200,
            fail_code: 500,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_blocking_workers: 16,
        }
    }
}

impl CheckerConfig {
    /// The aggregation deadline.
    ///
    /// Values `validate` would reject are clamped: NaN, zero and negative
    /// timeouts fall back to the 10 s default, anything above
    /// [`MAX_TIMEOUT_SECS`] (infinity included) is capped to it.
    pub fn timeout(&self) -> Duration {
        let secs = if self.timeout_secs.is_nan() || self.timeout_secs <= 0.0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            self.timeout_secs.min(MAX_TIMEOUT_SECS)
        };
        Duration::from_secs_f64(secs)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, code) in [("success_code", self.success_code), ("fail_code", self.fail_code)] {
            if !(100..=999).contains(&code) {
                bail!("{} must be between 100 and 999, got {}", field, code);
            }
        }
        if !self.timeout_secs.is_finite() || self.timeout_secs <= 0.0 {
            bail!("timeout_secs must be a positive number, got {}", self.timeout_secs);
        }
        if self.timeout_secs > MAX_TIMEOUT_SECS {
            bail!(
                "timeout_secs must be at most {}, got {}",
                MAX_TIMEOUT_SECS,
                self.timeout_secs
            );
        }
        if self.max_blocking_workers == 0 {
            bail!("max_blocking_workers must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            path: "/healthcheck".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        if !self.path.starts_with('/') {
            bail!("server.path must start with '/', got {:?}", self.path);
        }
        Ok(())
    }
}

/// A check declared in the configuration file instead of in code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckDefinition {
    Http {
        name: String,
        url: String,
        #[serde(default)]
        expect_status: Option<u16>,
    },
    Tcp {
        name: String,
        address: String,
        #[serde(default = "default_connect_timeout_ms")]
        connect_timeout_ms: u64,
    },
}

fn default_connect_timeout_ms() -> u64 {
    1000
}

impl CheckDefinition {
    pub fn name(&self) -> &str {
        match self {
            CheckDefinition::Http { name, .. } | CheckDefinition::Tcp { name, .. } => name,
        }
    }
}
