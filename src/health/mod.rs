// src/health/mod.rs
mod check;
mod checker;
mod error;
mod registry;
mod response;

pub use check::{AsyncCheckFn, Check, CheckKind, CheckOutput, HealthProbe, SyncCheckFn};
pub use checker::Checker;
pub use error::CheckError;
pub use registry::CheckRegistry;
pub use response::{derive_code, CheckResult, HealthcheckResponse};
