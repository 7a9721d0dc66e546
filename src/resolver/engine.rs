//! The service chain walk.
//!
//! Each service appends candidate groups after the current end of the
//! buffer. New entries that repeat a group found by an earlier service are
//! swap-removed, then the service's action table decides whether to go on.

use std::sync::Arc;

use crate::core::{Action, GroupBuffer, NssStatus};
use crate::nsswitch::{NsswitchConfig, ServiceSpec};
use crate::resolver::invoker;
use crate::sources::{GroupRequest, GroupSource, ServiceRegistry};

/// One configured service paired with its implementation.
#[derive(Clone)]
pub struct ChainEntry {
    pub spec: ServiceSpec,
    /// `None` when no source is registered under the service name.
    pub source: Option<Arc<dyn GroupSource>>,
}

impl ChainEntry {
    pub fn new(spec: ServiceSpec, source: Option<Arc<dyn GroupSource>>) -> Self {
        ChainEntry { spec, source }
    }
}

impl std::fmt::Debug for ChainEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainEntry")
            .field("spec", &self.spec)
            .field("source", &self.source.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}

/// The ordered services a group-list walk consults.
#[derive(Debug, Clone)]
pub struct ServiceChain {
    /// Name of the database the services came from.
    pub database: String,
    /// Whether the database is a dedicated `initgroups` entry.
    pub dedicated: bool,
    pub entries: Vec<ChainEntry>,
}

impl ServiceChain {
    /// Resolve the configured database against the registered sources.
    pub fn build(config: &NsswitchConfig, registry: &ServiceRegistry, legacy_default: bool) -> Self {
        let (database, dedicated) = config.group_list_database(legacy_default);

        let entries = database
            .services
            .into_iter()
            .map(|spec| {
                let source = registry.get(&spec.name);
                if source.is_none() {
                    tracing::debug!("no source registered for service `{}`", spec.name);
                }
                ChainEntry::new(spec, source)
            })
            .collect();

        ServiceChain {
            database: database.name,
            dedicated,
            entries,
        }
    }

    /// Whether the walk stops after a service reported `status`.
    ///
    /// Without a dedicated database a successful service never stops the
    /// walk, so every configured service is consulted.
    pub fn stops_after(&self, entry: &ChainEntry, status: NssStatus) -> bool {
        (self.dedicated || status != NssStatus::Success)
            && entry.spec.next_action(status) == Action::Return
    }
}

/// Walk `chain` and leave the merged group list in `groups`.
///
/// Slot 0 is always `request.group`. Returns the final number of entries.
pub fn resolve_into(chain: &ServiceChain, request: &GroupRequest<'_>, groups: &mut GroupBuffer) -> usize {
    groups.seed(request.group);

    for entry in &chain.entries {
        let prev_len = groups.len();
        let status = invoker::invoke(entry, request, groups);

        let removed = if status == NssStatus::Unavail {
            groups.truncate(prev_len);
            0
        } else {
            groups.dedup_since(prev_len)
        };

        tracing::debug!(
            "{}: service `{}` returned {} ({} new, {} duplicate)",
            chain.database,
            entry.spec.name,
            status,
            groups.len() - prev_len,
            removed
        );

        if chain.stops_after(entry, status) {
            break;
        }
    }

    groups.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::core::Gid;
    use crate::test_support::ScriptedSource;

    fn chain(dedicated: bool, entries: Vec<(ServiceSpec, ScriptedSource)>) -> (ServiceChain, Vec<Arc<ScriptedSource>>) {
        let mut sources = Vec::new();
        let mut chain_entries = Vec::new();
        for (spec, source) in entries {
            let source = Arc::new(source);
            sources.push(source.clone());
            let source: Arc<dyn GroupSource> = source;
            chain_entries.push(ChainEntry::new(spec, Some(source)));
        }

        let chain = ServiceChain {
            database: if dedicated { "initgroups" } else { "group" }.to_string(),
            dedicated,
            entries: chain_entries,
        };
        (chain, sources)
    }

    fn run(chain: &ServiceChain, limit: Option<usize>) -> Vec<u32> {
        let mut buffer = GroupBuffer::with_size(1).unwrap();
        let request = GroupRequest {
            user: "alice",
            group: Gid::new(100),
            limit,
        };
        let n = resolve_into(chain, &request, &mut buffer);
        assert_eq!(n, buffer.len());
        buffer.as_slice().iter().map(|g| g.as_raw()).collect()
    }

    fn continue_on_success(name: &str) -> ServiceSpec {
        ServiceSpec::new(name).with_action(NssStatus::Success, Action::Continue)
    }

    #[test]
    fn test_merges_two_backends() {
        let (chain, _) = chain(
            false,
            vec![
                (
                    continue_on_success("a"),
                    ScriptedSource::native("a", NssStatus::Success, &[100, 200]),
                ),
                (
                    continue_on_success("b"),
                    ScriptedSource::native("b", NssStatus::Success, &[200, 300]),
                ),
            ],
        );

        let result = run(&chain, None);

        assert_eq!(result[0], 100);
        assert_eq!(result.len(), 3);
        let set: HashSet<_> = result.into_iter().collect();
        assert_eq!(set, HashSet::from([100, 200, 300]));
    }

    #[test]
    fn test_seed_stays_first_when_backend_reports_it() {
        let (chain, _) = chain(
            false,
            vec![(
                ServiceSpec::new("a"),
                ScriptedSource::native("a", NssStatus::Success, &[100, 5, 100]),
            )],
        );

        let result = run(&chain, None);
        assert_eq!(result[0], 100);
        assert_eq!(result.iter().filter(|g| **g == 100).count(), 1);
    }

    #[test]
    fn test_success_does_not_stop_without_dedicated_database() {
        // Default action for SUCCESS is return.
        let (chain, sources) = chain(
            false,
            vec![
                (
                    ServiceSpec::new("a"),
                    ScriptedSource::native("a", NssStatus::Success, &[1]),
                ),
                (
                    ServiceSpec::new("b"),
                    ScriptedSource::native("b", NssStatus::Success, &[2]),
                ),
            ],
        );

        let result = run(&chain, None);

        assert_eq!(result.len(), 3);
        assert_eq!(sources[1].calls(), 1);
    }

    #[test]
    fn test_success_stops_with_dedicated_database() {
        let (chain, sources) = chain(
            true,
            vec![
                (
                    ServiceSpec::new("a"),
                    ScriptedSource::native("a", NssStatus::Success, &[1]),
                ),
                (
                    ServiceSpec::new("b"),
                    ScriptedSource::native("b", NssStatus::Success, &[2]),
                ),
            ],
        );

        let result = run(&chain, None);

        assert_eq!(result, vec![100, 1]);
        assert_eq!(sources[1].calls(), 0);
    }

    #[test]
    fn test_dedicated_database_continues_when_configured() {
        let (chain, sources) = chain(
            true,
            vec![
                (
                    continue_on_success("a"),
                    ScriptedSource::native("a", NssStatus::Success, &[1]),
                ),
                (
                    ServiceSpec::new("b"),
                    ScriptedSource::native("b", NssStatus::Success, &[2]),
                ),
            ],
        );

        assert_eq!(run(&chain, None).len(), 3);
        assert_eq!(sources[1].calls(), 1);
    }

    #[test]
    fn test_failure_status_follows_action_table() {
        let (chain, sources) = chain(
            false,
            vec![
                (
                    ServiceSpec::new("a").with_action(NssStatus::NotFound, Action::Return),
                    ScriptedSource::native("a", NssStatus::NotFound, &[]),
                ),
                (
                    ServiceSpec::new("b"),
                    ScriptedSource::native("b", NssStatus::Success, &[2]),
                ),
            ],
        );

        assert_eq!(run(&chain, None), vec![100]);
        assert_eq!(sources[1].calls(), 0);
    }

    #[test]
    fn test_return_status_stops_by_default() {
        let (chain, sources) = chain(
            false,
            vec![
                (
                    ServiceSpec::new("a"),
                    ScriptedSource::native("a", NssStatus::Return, &[3]),
                ),
                (
                    ServiceSpec::new("b"),
                    ScriptedSource::native("b", NssStatus::Success, &[2]),
                ),
            ],
        );

        assert_eq!(run(&chain, None), vec![100, 3]);
        assert_eq!(sources[1].calls(), 0);
    }

    #[test]
    fn test_merge_action_never_stops() {
        let (chain, sources) = chain(
            true,
            vec![
                (
                    ServiceSpec::new("a").with_action(NssStatus::Success, Action::Merge),
                    ScriptedSource::native("a", NssStatus::Success, &[1]),
                ),
                (
                    ServiceSpec::new("b"),
                    ScriptedSource::native("b", NssStatus::Success, &[2]),
                ),
            ],
        );

        run(&chain, None);
        assert_eq!(sources[1].calls(), 1);
    }

    #[test]
    fn test_unavailable_backend_contributes_nothing() {
        let (chain, _) = chain(
            false,
            vec![
                (
                    ServiceSpec::new("a"),
                    ScriptedSource::native("a", NssStatus::Unavail, &[9, 10]),
                ),
                (
                    ServiceSpec::new("b"),
                    ScriptedSource::native("b", NssStatus::Success, &[2]),
                ),
            ],
        );

        assert_eq!(run(&chain, None), vec![100, 2]);
    }

    #[test]
    fn test_tryagain_continues_by_default() {
        let (chain, sources) = chain(
            false,
            vec![
                (
                    ServiceSpec::new("a"),
                    ScriptedSource::native("a", NssStatus::TryAgain, &[]),
                ),
                (
                    ServiceSpec::new("b"),
                    ScriptedSource::native("b", NssStatus::Success, &[2]),
                ),
            ],
        );

        assert_eq!(run(&chain, None), vec![100, 2]);
        assert_eq!(sources[1].calls(), 1);
    }

    #[test]
    fn test_limit_caps_total() {
        let (chain, _) = chain(
            false,
            vec![
                (
                    ServiceSpec::new("a"),
                    ScriptedSource::native("a", NssStatus::Success, &[1, 2, 3]),
                ),
                (
                    ServiceSpec::new("b"),
                    ScriptedSource::native("b", NssStatus::Success, &[4, 5]),
                ),
            ],
        );

        assert_eq!(run(&chain, Some(3)), vec![100, 1, 2]);
    }

    #[test]
    fn test_empty_chain_returns_seed() {
        let (chain, _) = chain(false, vec![]);
        assert_eq!(run(&chain, None), vec![100]);
    }

    #[test]
    fn test_build_from_config() {
        let config = NsswitchConfig::parse("test", "initgroups: files ldap\n").unwrap();
        let registry = ServiceRegistry::with_defaults(std::path::Path::new("/nonexistent"));

        let chain = ServiceChain::build(&config, &registry, false);

        assert!(chain.dedicated);
        assert_eq!(chain.database, "initgroups");
        assert!(chain.entries[0].source.is_some());
        assert!(chain.entries[1].source.is_none());
    }
}
