//! Group-list resolution.
//!
//! A [`Resolver`] owns an nsswitch configuration and the registered
//! sources. On first use it builds the [`ServiceChain`] it will walk for
//! every request and keeps it for its whole life.
//!
//! Two entry points are offered:
//! - [`Resolver::getgrouplist`] copies the result into caller storage and
//!   reports the true count even when it did not fit.
//! - [`Resolver::initgroups`] resolves without a caller cap and installs
//!   the result, dropping trailing groups until the installer accepts it.

pub mod accelerator;
pub mod engine;
pub mod errors;
pub mod install;
pub mod invoker;

pub use accelerator::{Accelerator, AcceleratorGate, DEFAULT_RETRY_INTERVAL};
pub use engine::{resolve_into, ChainEntry, ServiceChain};
pub use errors::ResolveError;
pub use install::{system_max_groups, CredentialInstaller, DryRunInstaller, SystemInstaller};

use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::Result;

use crate::core::{Gid, GroupBuffer};
use crate::nsswitch::{NsswitchConfig, GROUP_DB, NSSWITCH_PATH};
use crate::sources::{GroupRequest, ServiceRegistry, GROUP_FILE};
use crate::util::Config;

/// Initial buffer size when the platform reports no group limit.
pub const DEFAULT_INITIAL_GUESS: usize = 16;

/// Upper bound on the initial buffer size when a limit is known.
pub const DEFAULT_MAX_INITIAL: usize = 64;

/// Result of a fixed-capacity query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupListing {
    /// Every group fit; this many slots were filled.
    Fits(usize),
    /// The caller's buffer was too small. It holds the first entries only.
    TooSmall { total: usize },
}

impl GroupListing {
    /// The true number of groups found.
    pub fn total(&self) -> usize {
        match self {
            GroupListing::Fits(total) | GroupListing::TooSmall { total } => *total,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, GroupListing::Fits(_))
    }
}

/// Resolves group memberships over a configured service chain.
pub struct Resolver {
    config: NsswitchConfig,
    registry: ServiceRegistry,
    legacy_default: bool,
    chain: OnceLock<ServiceChain>,
    accelerator: Option<Arc<dyn Accelerator>>,
    gate: AcceleratorGate,
    initial_guess: usize,
    max_initial: usize,
}

impl Resolver {
    /// Create a resolver with default sizing and no accelerator.
    pub fn new(config: NsswitchConfig, registry: ServiceRegistry) -> Self {
        Resolver::builder(config).registry(registry).build()
    }

    pub fn builder(config: NsswitchConfig) -> ResolverBuilder {
        ResolverBuilder::new(config)
    }

    /// Build a resolver from file-backed settings.
    pub fn from_config(config: &Config) -> Result<Self> {
        let nsswitch = NsswitchConfig::load_or_default(&config.nsswitch_path())?;
        let registry = ServiceRegistry::with_defaults(&config.group_file_path());

        let mut builder = Resolver::builder(nsswitch)
            .registry(registry)
            .legacy_default(config.nss.legacy_default);
        if let Some(guess) = config.resolve.initial_guess {
            builder = builder.initial_guess(guess);
        }
        if let Some(max) = config.resolve.max_initial {
            builder = builder.max_initial(max);
        }
        if let Some(retry) = config.accelerator.retry_interval {
            builder = builder.accelerator_retry(retry);
        }

        Ok(builder.build())
    }

    /// The service chain, built on first use.
    pub fn chain(&self) -> &ServiceChain {
        self.chain.get_or_init(|| {
            let chain = ServiceChain::build(&self.config, &self.registry, self.legacy_default);
            tracing::debug!(
                "using `{}` database ({} services, dedicated: {})",
                chain.database,
                chain.entries.len(),
                chain.dedicated
            );
            chain
        })
    }

    /// Back-off state of the accelerator.
    pub fn accelerator_gate(&self) -> &AcceleratorGate {
        &self.gate
    }

    /// Store at most `groups.len()` groups of `user` into `groups`, seed first.
    ///
    /// The whole chain is resolved into a scratch buffer, so the returned
    /// listing always carries the true total.
    pub fn getgrouplist(
        &self,
        user: &str,
        group: Gid,
        groups: &mut [Gid],
    ) -> Result<GroupListing, ResolveError> {
        let capacity = groups.len();
        let mut scratch = GroupBuffer::with_size(capacity).map_err(|_| ResolveError::OutOfMemory)?;

        let request = GroupRequest {
            user,
            group,
            limit: None,
        };
        let total = self.resolve_buffer(&request, &mut scratch);

        let fitted = total.min(capacity);
        groups[..fitted].copy_from_slice(&scratch.as_slice()[..fitted]);

        if total > capacity {
            Ok(GroupListing::TooSmall { total })
        } else {
            Ok(GroupListing::Fits(total))
        }
    }

    /// Resolve every group of `user` into an owned list, seed first.
    pub fn resolve(&self, user: &str, group: Gid) -> Result<Vec<Gid>, ResolveError> {
        let mut groups =
            GroupBuffer::with_size(self.initial_guess).map_err(|_| ResolveError::OutOfMemory)?;

        let request = GroupRequest {
            user,
            group,
            limit: None,
        };
        self.resolve_buffer(&request, &mut groups);

        Ok(groups.into_vec())
    }

    /// Resolve the groups of `user` and install them through `installer`.
    ///
    /// When the installer rejects the list with `EINVAL` the last entry is
    /// dropped and installation retried, down to a single group. Returns
    /// how many groups were installed.
    pub fn initgroups(
        &self,
        user: &str,
        group: Gid,
        installer: &dyn CredentialInstaller,
    ) -> Result<usize, ResolveError> {
        let limit = installer.max_groups().filter(|limit| *limit > 0);
        let size = match limit {
            Some(limit) => limit.min(self.max_initial),
            None => self.initial_guess,
        };

        let mut groups = GroupBuffer::with_size(size).map_err(|_| ResolveError::OutOfMemory)?;
        let request = GroupRequest { user, group, limit };
        let mut ngroups = self.resolve_buffer(&request, &mut groups);
        let groups = groups.into_vec();

        loop {
            match installer.install(&groups[..ngroups]) {
                Ok(()) => return Ok(ngroups),
                Err(e) if e.raw_os_error() == Some(libc::EINVAL) && ngroups > 1 => {
                    ngroups -= 1;
                    tracing::debug!("group list rejected, retrying with {} groups", ngroups);
                }
                Err(source) => {
                    return Err(ResolveError::Install {
                        count: ngroups,
                        source,
                    })
                }
            }
        }
    }

    fn resolve_buffer(&self, request: &GroupRequest<'_>, groups: &mut GroupBuffer) -> usize {
        if let Some(accelerator) = &self.accelerator {
            if self.gate.should_try() && !self.config.is_custom(GROUP_DB) {
                if let Some(n) = accelerator.getgrouplist(request, groups) {
                    groups.truncate(n);
                    return groups.len();
                }

                tracing::warn!(
                    "accelerator `{}` unavailable, falling back to services",
                    accelerator.name()
                );
                self.gate.disable();
            }
        }

        resolve_into(self.chain(), request, groups)
    }
}

/// Builder for [`Resolver`].
pub struct ResolverBuilder {
    config: NsswitchConfig,
    registry: ServiceRegistry,
    legacy_default: bool,
    accelerator: Option<Arc<dyn Accelerator>>,
    retry_interval: u32,
    initial_guess: usize,
    max_initial: usize,
}

impl ResolverBuilder {
    pub fn new(config: NsswitchConfig) -> Self {
        ResolverBuilder {
            config,
            registry: ServiceRegistry::new(),
            legacy_default: false,
            accelerator: None,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            initial_guess: DEFAULT_INITIAL_GUESS,
            max_initial: DEFAULT_MAX_INITIAL,
        }
    }

    pub fn registry(mut self, registry: ServiceRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use `compat [NOTFOUND=return] files` when no group database is configured.
    pub fn legacy_default(mut self, legacy: bool) -> Self {
        self.legacy_default = legacy;
        self
    }

    pub fn accelerator(mut self, accelerator: Arc<dyn Accelerator>) -> Self {
        self.accelerator = Some(accelerator);
        self
    }

    pub fn accelerator_retry(mut self, retry_interval: u32) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    pub fn initial_guess(mut self, size: usize) -> Self {
        self.initial_guess = size.max(1);
        self
    }

    pub fn max_initial(mut self, size: usize) -> Self {
        self.max_initial = size.max(1);
        self
    }

    pub fn build(self) -> Resolver {
        Resolver {
            config: self.config,
            registry: self.registry,
            legacy_default: self.legacy_default,
            chain: OnceLock::new(),
            accelerator: self.accelerator,
            gate: AcceleratorGate::new(self.retry_interval),
            initial_guess: self.initial_guess,
            max_initial: self.max_initial,
        }
    }
}

static GLOBAL: OnceLock<Resolver> = OnceLock::new();

/// The process-wide resolver over the system configuration.
pub fn global() -> &'static Resolver {
    GLOBAL.get_or_init(|| {
        let config = NsswitchConfig::load_or_default(Path::new(NSSWITCH_PATH)).unwrap_or_else(|e| {
            tracing::warn!("{:#}; using built-in defaults", e);
            NsswitchConfig::default()
        });
        Resolver::new(config, ServiceRegistry::with_defaults(Path::new(GROUP_FILE)))
    })
}

/// [`Resolver::getgrouplist`] on the process-wide resolver.
pub fn getgrouplist(user: &str, group: Gid, groups: &mut [Gid]) -> Result<GroupListing, ResolveError> {
    global().getgrouplist(user, group, groups)
}

/// [`Resolver::initgroups`] on the process-wide resolver, installing with `setgroups(2)`.
pub fn initgroups(user: &str, group: Gid) -> Result<usize, ResolveError> {
    global().initgroups(user, group, &SystemInstaller)
}
