// src/lib.rs
pub mod config;
pub mod health;
pub mod liveness;
pub mod probes;
pub mod server;

pub use health::{Check, CheckError, CheckOutput, Checker, HealthProbe, HealthcheckResponse};
pub use server::{HealthcheckServer, ServerError};
