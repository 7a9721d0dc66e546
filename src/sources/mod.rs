//! Group sources.
//!
//! Sources answer "which groups is this user in" for one configured
//! service (the local group file, the legacy compat service, or anything
//! registered at runtime).

pub mod compat;
pub mod files;
pub mod registry;
pub mod source;

pub use compat::{compat_call, CompatSource};
pub use files::{FilesSource, GroupFile, GROUP_FILE};
pub use registry::ServiceRegistry;
pub use source::{GroupRequest, GroupSource, Lookup};
