//! Optional fast path consulted before the service chain.
//!
//! An accelerator (typically a caching daemon) may hand back a complete,
//! already merged group list. When it fails it is switched off and only
//! retried after a number of further resolutions.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::core::GroupBuffer;
use crate::sources::GroupRequest;

/// Resolutions to skip before retrying a failed accelerator.
pub const DEFAULT_RETRY_INTERVAL: u32 = 100;

/// A cache that can answer a whole group-list request at once.
pub trait Accelerator: Send + Sync {
    /// Get the accelerator name for display.
    fn name(&self) -> &str;

    /// Fill `groups` with the complete answer and return its length.
    ///
    /// `None` means the accelerator cannot answer right now. A returned
    /// answer is trusted as complete, seed group first.
    fn getgrouplist(&self, request: &GroupRequest<'_>, groups: &mut GroupBuffer) -> Option<usize>;
}

/// Back-off state for an accelerator.
///
/// Zero means the accelerator may be used. After a failure the counter is
/// set to one and advanced on every resolution; once it passes the retry
/// interval it drops back to zero.
#[derive(Debug)]
pub struct AcceleratorGate {
    not_use: AtomicU32,
    retry_interval: u32,
}

impl Default for AcceleratorGate {
    fn default() -> Self {
        AcceleratorGate::new(DEFAULT_RETRY_INTERVAL)
    }
}

impl AcceleratorGate {
    pub fn new(retry_interval: u32) -> Self {
        AcceleratorGate {
            not_use: AtomicU32::new(0),
            retry_interval,
        }
    }

    /// Advance the back-off counter and report whether to try the accelerator.
    pub fn should_try(&self) -> bool {
        let retry = self.retry_interval;
        match self
            .not_use
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n > 0).then(|| if n.saturating_add(1) > retry { 0 } else { n + 1 })
            }) {
            // This tick moved the counter; it is usable only if it wrapped to zero.
            Ok(prev) => prev.saturating_add(1) > retry,
            // Already zero.
            Err(_) => true,
        }
    }

    /// Switch the accelerator off after a failure.
    pub fn disable(&self) {
        self.not_use.store(1, Ordering::Relaxed);
    }

    pub fn is_disabled(&self) -> bool {
        self.not_use.load(Ordering::Relaxed) > 0
    }
}
