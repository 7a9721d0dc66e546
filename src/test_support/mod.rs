//! Test utilities and stubs for grpresolve unit tests.
//!
//! This module provides scripted implementations of the backend and
//! accelerator interfaces so the resolver can be exercised without a real
//! group database.
//!
//! # Example
//!
//! ```rust,ignore
//! use grpresolve::test_support::ScriptedSource;
//!
//! #[test]
//! fn test_example() {
//!     let mut registry = ServiceRegistry::new();
//!     registry.register("ldap", Arc::new(ScriptedSource::native("ldap", NssStatus::Success, &[27])));
//!     // Build a resolver over `registry`...
//! }
//! ```

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{Gid, GroupBuffer, GroupEntry, NssStatus, RawStatus};
use crate::resolver::Accelerator;
use crate::sources::{GroupRequest, GroupSource, Lookup};

// Re-export fixtures for convenience
pub use fixtures::*;

/// A source that returns a fixed answer and counts its calls.
#[derive(Debug)]
pub struct ScriptedSource {
    name: String,
    status: RawStatus,
    gids: Vec<Gid>,
    entries: Option<Vec<GroupEntry>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    /// A source with a native group-list operation.
    ///
    /// Every gid is pushed as given, seed and repeats included, so the
    /// resolver's own deduplication is what gets tested.
    pub fn native(name: &str, status: NssStatus, gids: &[u32]) -> Self {
        Self::raw(name, status as i32, gids)
    }

    /// Like [`native`](Self::native) but with an arbitrary raw status.
    pub fn raw(name: &str, status: i32, gids: &[u32]) -> Self {
        ScriptedSource {
            name: name.to_string(),
            status: RawStatus(status),
            gids: gids.iter().copied().map(Gid::new).collect(),
            entries: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A source that can only enumerate.
    pub fn enumerating(name: &str, entries: Vec<GroupEntry>) -> Self {
        ScriptedSource {
            name: name.to_string(),
            status: NssStatus::Success.into(),
            gids: Vec::new(),
            entries: Some(entries),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the source was consulted.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GroupSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn initgroups_dyn(&self, request: &GroupRequest<'_>, groups: &mut GroupBuffer) -> Option<Lookup> {
        if self.entries.is_some() {
            return None;
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        for gid in &self.gids {
            groups.push(*gid, request.limit);
        }

        Some(Lookup {
            status: self.status,
            errno: None,
        })
    }

    fn enumerate(&self) -> Option<Result<Vec<GroupEntry>, RawStatus>> {
        let entries = self.entries.as_ref()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(Ok(entries.clone()))
    }
}

/// An accelerator with a canned answer.
#[derive(Debug)]
pub struct StubAccelerator {
    answer: Option<Vec<Gid>>,
    calls: AtomicUsize,
}

impl StubAccelerator {
    /// Always answers with `gids`.
    pub fn answering(gids: &[u32]) -> Self {
        StubAccelerator {
            answer: Some(gids.iter().copied().map(Gid::new).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Never usable.
    pub fn failing() -> Self {
        StubAccelerator {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Accelerator for StubAccelerator {
    fn name(&self) -> &str {
        "stub"
    }

    fn getgrouplist(&self, request: &GroupRequest<'_>, groups: &mut GroupBuffer) -> Option<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.answer.as_ref()?;

        groups.truncate(0);
        for gid in answer {
            groups.push(*gid, request.limit);
        }
        Some(groups.len())
    }
}
