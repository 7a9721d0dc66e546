//! Installing a user's groups as the process's supplementary groups.

use crate::core::Gid;
use crate::resolver::{system_max_groups, DryRunInstaller, ResolveError, Resolver, SystemInstaller};

/// Options for [`apply_groups`].
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Record attempts instead of calling `setgroups(2)`.
    pub dry_run: bool,
    /// Largest list the dry-run installer accepts.
    pub ceiling: Option<usize>,
}

/// What happened during installation.
#[derive(Debug, Clone)]
pub struct InitReport {
    pub user: String,
    pub group: Gid,
    /// Number of groups that were installed.
    pub installed: usize,
    /// Group counts tried, in order (dry run only).
    pub attempts: Vec<usize>,
    /// The accepted list (dry run only).
    pub groups: Vec<Gid>,
}

/// Resolve `user`'s groups and install them.
pub fn apply_groups(
    resolver: &Resolver,
    user: &str,
    group: Gid,
    options: &InitOptions,
) -> Result<InitReport, ResolveError> {
    if !options.dry_run {
        let installed = resolver.initgroups(user, group, &SystemInstaller)?;
        return Ok(InitReport {
            user: user.to_string(),
            group,
            installed,
            attempts: Vec::new(),
            groups: Vec::new(),
        });
    }

    let installer = DryRunInstaller::new(options.ceiling).with_max_groups(system_max_groups());
    let installed = resolver.initgroups(user, group, &installer)?;

    Ok(InitReport {
        user: user.to_string(),
        group,
        installed,
        attempts: installer.attempts(),
        groups: installer.installed().unwrap_or_default(),
    })
}
