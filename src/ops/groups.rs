//! Listing a user's groups.
//!
//! ```bash
//! grpresolve groups alice 100         # grow as needed
//! grpresolve groups alice 100 -n 4    # at most four slots
//! grpresolve groups alice 100 --json
//! ```

use std::fmt::Write;

use serde::Serialize;

use crate::core::Gid;
use crate::resolver::{GroupListing, ResolveError, Resolver};

/// Options for [`list_groups`].
#[derive(Debug, Clone, Default)]
pub struct GroupsOptions {
    /// Caller capacity; `None` resolves without a cap.
    pub capacity: Option<usize>,
}

/// The outcome of a group listing.
#[derive(Debug, Clone, Serialize)]
pub struct GroupsReport {
    pub user: String,
    pub group: Gid,
    /// True number of groups found.
    pub total: usize,
    /// Whether `groups` holds every group found.
    pub complete: bool,
    /// Groups that fit, seed first.
    pub groups: Vec<Gid>,
}

/// Resolve the groups of `user`, optionally through a fixed-capacity buffer.
pub fn list_groups(
    resolver: &Resolver,
    user: &str,
    group: Gid,
    options: &GroupsOptions,
) -> Result<GroupsReport, ResolveError> {
    let (groups, listing) = match options.capacity {
        Some(capacity) => {
            let mut groups = Vec::new();
            groups
                .try_reserve_exact(capacity)
                .map_err(|_| ResolveError::OutOfMemory)?;
            groups.resize(capacity, Gid::new(0));
            let listing = resolver.getgrouplist(user, group, &mut groups)?;
            groups.truncate(listing.total().min(capacity));
            (groups, listing)
        }
        None => {
            let groups = resolver.resolve(user, group)?;
            let listing = GroupListing::Fits(groups.len());
            (groups, listing)
        }
    };

    Ok(GroupsReport {
        user: user.to_string(),
        group,
        total: listing.total(),
        complete: listing.is_complete(),
        groups,
    })
}

/// Format a report as a single space-separated line.
pub fn format_groups(report: &GroupsReport) -> String {
    let mut output = String::new();
    for (i, gid) in report.groups.iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        let _ = write!(output, "{}", gid);
    }
    output
}
