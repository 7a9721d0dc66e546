//! High-level operations.
//!
//! This module contains the implementation of grpresolve commands.

pub mod chain;
pub mod groups;
pub mod init;

pub use chain::{describe_chain, format_chain, ChainReport, ServiceLine};
pub use groups::{format_groups, list_groups, GroupsOptions, GroupsReport};
pub use init::{apply_groups, InitOptions, InitReport};
