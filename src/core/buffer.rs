//! The growable group buffer shared by the resolver and its backends.
//!
//! A `GroupBuffer` tracks two numbers: the logical entries, and the number
//! of slots it currently advertises (`size`). Backends append through
//! [`GroupBuffer::push`], which doubles `size` when the buffer is full and
//! never grows it past the caller's hard limit.

use std::collections::TryReserveError;

use crate::core::Gid;

/// An owned, resizable list of group ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBuffer {
    groups: Vec<Gid>,
    size: usize,
}

impl GroupBuffer {
    /// Allocate a buffer with room for `size` entries (at least one).
    pub fn with_size(size: usize) -> Result<Self, TryReserveError> {
        let size = size.max(1);
        let mut groups = Vec::new();
        groups.try_reserve_exact(size)?;
        Ok(GroupBuffer { groups, size })
    }

    /// Reset the buffer so it holds only `gid`.
    pub fn seed(&mut self, gid: Gid) {
        self.groups.clear();
        self.groups.push(gid);
    }

    /// Number of logical entries.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of slots currently available before the buffer must grow.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_slice(&self) -> &[Gid] {
        &self.groups
    }

    pub fn into_vec(self) -> Vec<Gid> {
        self.groups
    }

    /// Whether `gid` is among the entries at or after `start`.
    pub fn contains_from(&self, start: usize, gid: Gid) -> bool {
        self.groups
            .get(start..)
            .is_some_and(|tail| tail.contains(&gid))
    }

    /// Drop every entry at or after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.groups.truncate(len);
    }

    /// Append `gid`, growing the buffer if it is full.
    ///
    /// Growth doubles the slot count, capped at `limit` when one is given.
    /// Returns `false` without storing anything when the buffer is full and
    /// already at `limit`, or when the allocation fails.
    pub fn push(&mut self, gid: Gid, limit: Option<usize>) -> bool {
        if self.groups.len() >= self.size {
            if limit.is_some_and(|limit| self.size >= limit) {
                return false;
            }

            let doubled = self.size.saturating_mul(2);
            let new_size = match limit {
                Some(limit) => doubled.min(limit),
                None => doubled,
            };

            if self
                .groups
                .try_reserve_exact(new_size - self.groups.len())
                .is_err()
            {
                return false;
            }
            self.size = new_size;
        }

        self.groups.push(gid);
        true
    }

    /// Remove entries appended since `prev_len` that already appear before it.
    ///
    /// A duplicate is replaced by the last entry and the length shrinks by
    /// one, so the order of the surviving new entries is not preserved.
    /// New entries are not compared with each other. Returns the number of
    /// entries removed.
    pub fn dedup_since(&mut self, prev_len: usize) -> usize {
        let prev_len = prev_len.min(self.groups.len());
        let before = self.groups.len();

        let mut cnt = prev_len;
        while cnt < self.groups.len() {
            if self.groups[..prev_len].contains(&self.groups[cnt]) {
                self.groups.swap_remove(cnt);
            } else {
                cnt += 1;
            }
        }

        before - self.groups.len()
    }
}
