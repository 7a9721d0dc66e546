//! The legacy enumeration path and the `compat` service.
//!
//! Sources without a native group-list operation are answered by walking
//! every group they can enumerate and keeping those that name the user.

use std::path::{Path, PathBuf};

use crate::core::{GroupBuffer, GroupEntry, NssStatus, RawStatus};
use crate::sources::files::GroupFile;
use crate::sources::{GroupRequest, GroupSource, Lookup};

/// Answer a group-list request by enumerating `source`.
///
/// `None` stands for a service name with no registered implementation.
/// Such a service, or one that cannot enumerate, is unavailable.
pub fn compat_call(
    source: Option<&dyn GroupSource>,
    request: &GroupRequest<'_>,
    groups: &mut GroupBuffer,
) -> Lookup {
    let Some(source) = source else {
        return Lookup::unavail(None);
    };

    let entries = match source.enumerate() {
        None => return Lookup::unavail(None),
        Some(Err(status)) => {
            return Lookup {
                status,
                errno: None,
            }
        }
        Some(Ok(entries)) => entries,
    };

    for entry in entries {
        if entry.gid == request.group || !entry.has_member(request.user) {
            continue;
        }
        if groups.contains_from(0, entry.gid) {
            continue;
        }
        // A full buffer drops the group and keeps walking.
        groups.push(entry.gid, request.limit);
    }

    Lookup::success()
}

/// The `compat` service: a group file that can only be enumerated.
#[derive(Debug, Clone)]
pub struct CompatSource {
    file: GroupFile,
}

impl CompatSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CompatSource {
            file: GroupFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl GroupSource for CompatSource {
    fn name(&self) -> &str {
        "compat"
    }

    fn enumerate(&self) -> Option<Result<Vec<GroupEntry>, RawStatus>> {
        Some(self.file.entries().map_err(|e| {
            tracing::debug!("cannot read {}: {}", self.path().display(), e);
            NssStatus::Unavail.into()
        }))
    }
}
