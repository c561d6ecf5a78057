// src/health/error.rs

/// Errors surfaced by the check registry and the coordinator.
///
/// Timeouts are not represented here: a check that misses the deadline is
/// recorded as `false` and the run still produces a response.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("Check name must be unique: {0:?} is already registered")]
    RegistrationConflict(String),

    #[error("Check {name:?} has an invalid definition: {reason}")]
    InvalidCheckType { name: String, reason: String },

    #[error("Healthcheck {name:?} returned a value of type {observed}, required bool")]
    ResultTypeViolation { name: String, observed: String },
}
