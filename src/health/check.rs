// src/health/check.rs
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// What a single check invocation produced.
///
/// Only `Bool` is a valid outcome. `Other` carries the name of the type
/// that was observed instead, so the coordinator can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutput {
    Bool(bool),
    Other(&'static str),
}

impl From<bool> for CheckOutput {
    fn from(value: bool) -> Self {
        CheckOutput::Bool(value)
    }
}

impl From<Option<bool>> for CheckOutput {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(value) => CheckOutput::Bool(value),
            None => CheckOutput::Other("null"),
        }
    }
}

impl From<()> for CheckOutput {
    fn from(_: ()) -> Self {
        CheckOutput::Other("unit")
    }
}

impl From<serde_json::Value> for CheckOutput {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Bool(value) => CheckOutput::Bool(value),
            Value::Null => CheckOutput::Other("null"),
            Value::Number(_) => CheckOutput::Other("number"),
            Value::String(_) => CheckOutput::Other("string"),
            Value::Array(_) => CheckOutput::Other("array"),
            Value::Object(_) => CheckOutput::Other("object"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Sync,
    Async,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Sync => write!(f, "sync"),
            CheckKind::Async => write!(f, "async"),
        }
    }
}

/// A structured async probe, for checks that carry their own state
/// (clients, connection pools, addresses).
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> bool;
}

pub type SyncCheckFn = Arc<dyn Fn() -> CheckOutput + Send + Sync>;
pub type AsyncCheckFn = Arc<dyn Fn() -> BoxFuture<'static, CheckOutput> + Send + Sync>;

/// A registered unit of work, tagged with how it has to be executed.
///
/// Sync checks run on the coordinator's blocking worker pool; async checks
/// run as tokio tasks.
#[derive(Clone)]
pub enum Check {
    Sync(SyncCheckFn),
    Async(AsyncCheckFn),
}

impl Check {
    pub fn sync<F, R>(check: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Into<CheckOutput> + 'static,
    {
        Check::Sync(Arc::new(move || -> CheckOutput { check().into() }))
    }

    pub fn async_fn<F, Fut, R>(check: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Into<CheckOutput> + 'static,
    {
        Check::Async(Arc::new(move || {
            check()
                .map(|output| -> CheckOutput { output.into() })
                .boxed()
        }))
    }

    pub fn probe<P>(probe: P) -> Self
    where
        P: HealthProbe + 'static,
    {
        let probe = Arc::new(probe);
        Check::Async(Arc::new(move || {
            let probe = probe.clone();
            async move { CheckOutput::Bool(probe.check().await) }.boxed()
        }))
    }

    pub fn kind(&self) -> CheckKind {
        match self {
            Check::Sync(_) => CheckKind::Sync,
            Check::Async(_) => CheckKind::Async,
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Check").field(&self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysUp;

    #[async_trait]
    impl HealthProbe for AlwaysUp {
        async fn check(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_output_conversions() {
        assert_eq!(CheckOutput::from(true), CheckOutput::Bool(true));
        assert_eq!(CheckOutput::from(Some(false)), CheckOutput::Bool(false));
        assert_eq!(CheckOutput::from(None::<bool>), CheckOutput::Other("null"));
        assert_eq!(CheckOutput::from(()), CheckOutput::Other("unit"));
        assert_eq!(
            CheckOutput::from(serde_json::json!("ok")),
            CheckOutput::Other("string")
        );
        assert_eq!(
            CheckOutput::from(serde_json::json!(true)),
            CheckOutput::Bool(true)
        );
    }

    #[tokio::test]
    async fn test_constructors_tag_kind() {
        let sync = Check::sync(|| true);
        let async_check = Check::async_fn(|| async { false });
        let probe = Check::probe(AlwaysUp);

        assert_eq!(sync.kind(), CheckKind::Sync);
        assert_eq!(async_check.kind(), CheckKind::Async);
        assert_eq!(probe.kind(), CheckKind::Async);

        match probe {
            Check::Async(f) => assert_eq!(f().await, CheckOutput::Bool(true)),
            Check::Sync(_) => panic!("probe must be async"),
        }
        match async_check {
            Check::Async(f) => assert_eq!(f().await, CheckOutput::Bool(false)),
            Check::Sync(_) => panic!("async_fn must be async"),
        }
    }
}
