//! Core data structures for grpresolve.
//!
//! This module contains the foundational types used throughout grpresolve:
//! - Group identifiers and group records
//! - The growable group buffer shared with backends
//! - Backend statuses and the actions configured for them

pub mod buffer;
pub mod gid;
pub mod group;
pub mod status;

pub use buffer::GroupBuffer;
pub use gid::Gid;
pub use group::GroupEntry;
pub use status::{Action, ActionParseError, ActionTable, NssStatus, RawStatus};
