// src/health/response.rs
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-check outcomes of one aggregation run, keyed by check name.
pub type CheckResult = BTreeMap<String, bool>;

/// Picks the status code for a run: `success_code` only when every check
/// passed. An empty result counts as success.
pub fn derive_code(results: &CheckResult, success_code: u16, fail_code: u16) -> u16 {
    if results.values().all(|passed| *passed) {
        success_code
    } else {
        fail_code
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthcheckResponse {
    body: CheckResult,
    code: u16,
}

impl HealthcheckResponse {
    pub fn new(body: CheckResult, code: u16) -> Self {
        Self { body, code }
    }

    pub fn from_results(body: CheckResult, success_code: u16, fail_code: u16) -> Self {
        let code = derive_code(&body, success_code, fail_code);
        Self { body, code }
    }

    pub fn body(&self) -> &CheckResult {
        &self.body
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is_success(&self) -> bool {
        self.body.values().all(|passed| *passed)
    }

    pub fn into_parts(self) -> (CheckResult, u16) {
        (self.body, self.code)
    }
}
