//! Installing a resolved group set as the process's supplementary groups.

use std::io;
use std::sync::Mutex;

use crate::core::Gid;

/// Something that can make a group list the active credential set.
pub trait CredentialInstaller {
    /// Most groups that can be installed, if the platform reports a limit.
    fn max_groups(&self) -> Option<usize>;

    /// Install `groups`. Too many groups must fail with `EINVAL`.
    fn install(&self, groups: &[Gid]) -> io::Result<()>;
}

/// `NGROUPS_MAX` as reported by `sysconf`, if positive.
pub fn system_max_groups() -> Option<usize> {
    // SAFETY: sysconf has no memory-safety preconditions.
    let limit = unsafe { libc::sysconf(libc::_SC_NGROUPS_MAX) };
    (limit > 0).then_some(limit as usize)
}

/// Installs groups with `setgroups(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInstaller;

impl CredentialInstaller for SystemInstaller {
    fn max_groups(&self) -> Option<usize> {
        system_max_groups()
    }

    fn install(&self, groups: &[Gid]) -> io::Result<()> {
        let raw: Vec<libc::gid_t> = groups.iter().map(|g| g.as_raw()).collect();

        // SAFETY: `raw` outlives the call and its length is passed alongside.
        let rc = unsafe { libc::setgroups(raw.len() as _, raw.as_ptr()) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }
}

/// Records installation attempts instead of changing credentials.
///
/// Lists longer than the ceiling are rejected with `EINVAL`, like a kernel
/// with that `NGROUPS_MAX`.
#[derive(Debug, Default)]
pub struct DryRunInstaller {
    ceiling: Option<usize>,
    max_groups: Option<usize>,
    attempts: Mutex<Vec<usize>>,
    installed: Mutex<Option<Vec<Gid>>>,
}

impl DryRunInstaller {
    pub fn new(ceiling: Option<usize>) -> Self {
        DryRunInstaller {
            ceiling,
            ..Default::default()
        }
    }

    /// Report a platform limit to the resolver.
    pub fn with_max_groups(mut self, max_groups: Option<usize>) -> Self {
        self.max_groups = max_groups;
        self
    }

    /// Group counts passed to each `install` call, in order.
    pub fn attempts(&self) -> Vec<usize> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// The list that was accepted, if any.
    pub fn installed(&self) -> Option<Vec<Gid>> {
        self.installed.lock().ok().and_then(|i| i.clone())
    }
}

impl CredentialInstaller for DryRunInstaller {
    fn max_groups(&self) -> Option<usize> {
        self.max_groups
    }

    fn install(&self, groups: &[Gid]) -> io::Result<()> {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(groups.len());
        }

        if self.ceiling.is_some_and(|ceiling| groups.len() > ceiling) {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        }

        if let Ok(mut installed) = self.installed.lock() {
            *installed = Some(groups.to_vec());
        }
        Ok(())
    }
}
