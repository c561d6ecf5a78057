// src/health/registry.rs
use super::check::{AsyncCheckFn, Check, SyncCheckFn};
use super::error::CheckError;

/// Named checks, partitioned by execution kind.
///
/// Names are unique across both partitions. There is no removal: a check
/// lives as long as the registry does.
#[derive(Default)]
pub struct CheckRegistry {
    sync_checks: Vec<(String, SyncCheckFn)>,
    async_checks: Vec<(String, AsyncCheckFn)>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, check: Check) -> Result<(), CheckError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(CheckError::RegistrationConflict(name));
        }

        tracing::debug!("Registered {} check {:?}", check.kind(), name);

        match check {
            Check::Sync(f) => self.sync_checks.push((name, f)),
            Check::Async(f) => self.async_checks.push((name, f)),
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sync_checks.iter().any(|(n, _)| n == name)
            || self.async_checks.iter().any(|(n, _)| n == name)
    }

    pub fn sync_names(&self) -> Vec<&str> {
        self.sync_checks.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn async_names(&self) -> Vec<&str> {
        self.async_checks.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// All names, sync first, each partition in registration order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.sync_names();
        names.extend(self.async_names());
        names
    }

    pub fn len(&self) -> usize {
        self.sync_checks.len() + self.async_checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn sync_entries(&self) -> impl Iterator<Item = (&str, &SyncCheckFn)> {
        self.sync_checks.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub(crate) fn async_entries(&self) -> impl Iterator<Item = (&str, &AsyncCheckFn)> {
        self.async_checks.iter().map(|(n, f)| (n.as_str(), f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions_by_kind() {
        let mut registry = CheckRegistry::new();
        registry.add("disk", Check::sync(|| true)).unwrap();
        registry.add("upstream", Check::async_fn(|| async { true })).unwrap();

        assert_eq!(registry.sync_names(), vec!["disk"]);
        assert_eq!(registry.async_names(), vec!["upstream"]);
        assert_eq!(registry.names(), vec!["disk", "upstream"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_name_across_kinds() {
        let mut registry = CheckRegistry::new();
        registry.add("db", Check::sync(|| true)).unwrap();

        let same_kind = registry.add("db", Check::sync(|| false));
        let other_kind = registry.add("db", Check::async_fn(|| async { false }));

        assert_eq!(same_kind, Err(CheckError::RegistrationConflict("db".into())));
        assert_eq!(other_kind, Err(CheckError::RegistrationConflict("db".into())));
        assert_eq!(registry.sync_names(), vec!["db"]);
        assert!(registry.async_names().is_empty());
    }
}
