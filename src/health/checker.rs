// src/health/checker.rs
use super::check::{Check, CheckOutput};
use super::error::CheckError;
use super::registry::CheckRegistry;
use super::response::{CheckResult, HealthcheckResponse};
use crate::config::{CheckDefinition, CheckerConfig};
use crate::probes;
use futures::FutureExt;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};

/// Outcome of one launched check; `None` means the check panicked.
type Finished = (String, Option<CheckOutput>);

/// Runs every registered check concurrently under one shared deadline and
/// folds the outcomes into a [`HealthcheckResponse`].
pub struct Checker {
    config: CheckerConfig,
    registry: CheckRegistry,
    // Bounds how many sync checks occupy blocking threads at once.
    workers: Arc<Semaphore>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(CheckerConfig::default())
    }
}

impl Checker {
    /// Creates a coordinator. An invalid config is logged and used with
    /// its timeout clamped as described on [`CheckerConfig::timeout`].
    pub fn new(config: CheckerConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!("Invalid checker config, using {:?} as timeout: {}", config.timeout(), e);
        }
        let workers = Arc::new(Semaphore::new(config.max_blocking_workers.max(1)));

        Self {
            config,
            registry: CheckRegistry::new(),
            workers,
        }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn add_check(&mut self, name: impl Into<String>, check: Check) -> Result<(), CheckError> {
        self.registry.add(name, check)
    }

    pub fn add_sync<F, R>(&mut self, name: impl Into<String>, check: F) -> Result<(), CheckError>
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Into<CheckOutput> + 'static,
    {
        self.add_check(name, Check::sync(check))
    }

    pub fn add_async<F, Fut, R>(&mut self, name: impl Into<String>, check: F) -> Result<(), CheckError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Into<CheckOutput> + 'static,
    {
        self.add_check(name, Check::async_fn(check))
    }

    /// Registers a check declared in configuration. Nothing is registered
    /// when the definition is invalid.
    pub fn add_definition(&mut self, definition: &CheckDefinition) -> Result<(), CheckError> {
        if self.registry.contains(definition.name()) {
            return Err(CheckError::RegistrationConflict(definition.name().to_string()));
        }
        let check = probes::build_check(definition, self.config.timeout())?;
        self.add_check(definition.name(), check)
    }

    pub fn sync_checks(&self) -> Vec<&str> {
        self.registry.sync_names()
    }

    pub fn async_checks(&self) -> Vec<&str> {
        self.registry.async_names()
    }

    pub fn checks(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Executes one aggregation run.
    ///
    /// Checks still running when the deadline passes are aborted (best
    /// effort, a blocking check keeps its thread until it returns) and
    /// recorded as `false`. A check returning anything but a bool fails the
    /// whole run with [`CheckError::ResultTypeViolation`].
    pub async fn check_handler(&self) -> Result<HealthcheckResponse, CheckError> {
        if self.registry.is_empty() {
            return Ok(HealthcheckResponse::new(
                CheckResult::new(),
                self.config.success_code,
            ));
        }

        let started = Instant::now();
        let mut tasks = self.launch();

        let mut finished: BTreeMap<String, Option<CheckOutput>> = BTreeMap::new();
        let collect = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((name, output)) => {
                        finished.insert(name, output);
                    }
                    Err(e) => error!("Check task failed without reporting its name: {}", e),
                }
            }
        };

        // No representable deadline means no deadline at all.
        let timed_out = match started.checked_add(self.config.timeout()) {
            Some(deadline) => timeout_at(deadline, collect).await.is_err(),
            None => {
                collect.await;
                false
            }
        };

        if timed_out {
            tasks.abort_all();
        }
        drop(tasks);

        let mut results = CheckResult::new();
        for (name, output) in finished {
            match output {
                Some(CheckOutput::Bool(passed)) => {
                    results.insert(name, passed);
                }
                Some(CheckOutput::Other(observed)) => {
                    return Err(CheckError::ResultTypeViolation {
                        name,
                        observed: observed.to_string(),
                    });
                }
                None => {
                    error!("Healthcheck {:?} panicked, marking it failed", name);
                    results.insert(name, false);
                }
            }
        }

        for name in self.registry.names() {
            if results.contains_key(name) {
                continue;
            }
            if timed_out {
                warn!(
                    "Healthcheck {:?} did not finish within {:?}, marking it failed",
                    name,
                    self.config.timeout()
                );
            } else {
                error!("Healthcheck {:?} ended without a result, marking it failed", name);
            }
            results.insert(name.to_string(), false);
        }

        let response = HealthcheckResponse::from_results(
            results,
            self.config.success_code,
            self.config.fail_code,
        );

        let failed = response.body().values().filter(|passed| !**passed).count();
        if failed == 0 {
            debug!(
                "Healthcheck complete: {} passed in {:?}",
                response.body().len(),
                started.elapsed()
            );
        } else {
            info!(
                "Healthcheck complete: {} passed, {} failed in {:?}",
                response.body().len() - failed,
                failed,
                started.elapsed()
            );
        }

        Ok(response)
    }

    fn launch(&self) -> JoinSet<Finished> {
        let mut tasks = JoinSet::new();

        for (name, check) in self.registry.sync_entries() {
            let name = name.to_string();
            let check = check.clone();
            let workers = self.workers.clone();

            tasks.spawn(async move {
                // Never closed.
                let permit = workers.acquire_owned().await.ok();
                let output = tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    check()
                })
                .await
                .ok();
                (name, output)
            });
        }

        for (name, check) in self.registry.async_entries() {
            let name = name.to_string();
            let future = check();

            tasks.spawn(async move {
                let output = AssertUnwindSafe(future).catch_unwind().await.ok();
                (name, output)
            });
        }

        tasks
    }
}
