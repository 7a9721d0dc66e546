//! grpresolve - supplementary group resolution over nsswitch-style services
//!
//! This crate provides the core library functionality for grpresolve,
//! including service chain configuration, group-list resolution, and
//! installation of the result as the process's supplementary groups.

pub mod core;
pub mod nsswitch;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and stubs for grpresolve unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides scripted sources and accelerators.
#[cfg(test)]
pub mod test_support;

pub use core::{Gid, GroupBuffer, GroupEntry, NssStatus};
pub use nsswitch::NsswitchConfig;
pub use resolver::{getgrouplist, initgroups, GroupListing, ResolveError, Resolver};
pub use sources::{GroupSource, ServiceRegistry};
