//! Service name to source mapping.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::sources::{CompatSource, FilesSource, GroupSource};

/// Maps service names from nsswitch.conf to source implementations.
#[derive(Default, Clone)]
pub struct ServiceRegistry {
    sources: HashMap<String, Arc<dyn GroupSource>>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ServiceRegistry {
            sources: HashMap::new(),
        }
    }

    /// Registry with the built-in `files` and `compat` services.
    pub fn with_defaults(group_file: &Path) -> Self {
        let mut registry = Self::new();
        registry.register("files", Arc::new(FilesSource::new(group_file)));
        registry.register("compat", Arc::new(CompatSource::new(group_file)));
        registry
    }

    /// Register (or replace) the source for a service name.
    pub fn register(&mut self, name: impl Into<String>, source: Arc<dyn GroupSource>) {
        self.sources.insert(name.into(), source);
    }

    /// Look up the source for a service name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn GroupSource>> {
        self.sources.get(name).cloned()
    }

    /// Registered service names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NssStatus;
    use crate::test_support::ScriptedSource;

    #[test]
    fn test_defaults() {
        let registry = ServiceRegistry::with_defaults(Path::new("/etc/group"));

        assert_eq!(registry.names(), vec!["compat", "files"]);
        assert_eq!(registry.get("files").unwrap().name(), "files");
        assert!(registry.get("ldap").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ServiceRegistry::with_defaults(Path::new("/etc/group"));
        registry.register(
            "files",
            Arc::new(ScriptedSource::native("stub", NssStatus::NotFound, &[])),
        );

        assert_eq!(registry.get("files").unwrap().name(), "stub");
    }
}
