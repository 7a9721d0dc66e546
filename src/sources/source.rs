//! GroupSource trait - common interface for all group backends.

use crate::core::{Gid, GroupBuffer, GroupEntry, NssStatus, RawStatus};

/// Who is being resolved, and how far the buffer may grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRequest<'a> {
    /// User whose memberships are wanted.
    pub user: &'a str,
    /// Seed group, already stored in slot 0.
    pub group: Gid,
    /// Hard cap on the total number of entries, if any.
    pub limit: Option<usize>,
}

/// What a backend reports after one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub status: RawStatus,
    /// OS error the backend ran into, if any.
    pub errno: Option<i32>,
}

impl Lookup {
    pub fn new(status: NssStatus) -> Self {
        Lookup {
            status: status.into(),
            errno: None,
        }
    }

    pub fn success() -> Self {
        Self::new(NssStatus::Success)
    }

    pub fn unavail(errno: Option<i32>) -> Self {
        Lookup {
            status: NssStatus::Unavail.into(),
            errno,
        }
    }
}

/// A source of group-membership data.
pub trait GroupSource: Send + Sync {
    /// Get the source name for display.
    fn name(&self) -> &str;

    /// Append the groups `request.user` belongs to.
    ///
    /// Entries go after the current end of `groups` through
    /// [`GroupBuffer::push`], so the hard limit is honoured. A source
    /// should not append the seed group or the same gid twice.
    ///
    /// Returns `None` when the source has no native list operation; the
    /// caller then falls back to enumerating every group.
    fn initgroups_dyn(&self, request: &GroupRequest<'_>, groups: &mut GroupBuffer) -> Option<Lookup> {
        let _ = (request, groups);
        None
    }

    /// List every group the source knows.
    ///
    /// Returns `None` when the source cannot enumerate, and `Some(Err(_))`
    /// with the status that stopped the enumeration from starting.
    fn enumerate(&self) -> Option<Result<Vec<GroupEntry>, RawStatus>> {
        None
    }
}
