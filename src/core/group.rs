//! Group records as backends see them.

use crate::core::Gid;

/// One entry of a group database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    pub gid: Gid,
    pub members: Vec<String>,
}

impl GroupEntry {
    pub fn new(name: impl Into<String>, gid: Gid, members: Vec<String>) -> Self {
        GroupEntry {
            name: name.into(),
            gid,
            members,
        }
    }

    /// Parse a group(5) line: `name:password:gid:member,member`.
    ///
    /// Returns `None` for lines that are not well-formed group records.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.splitn(4, ':');
        let name = fields.next()?;
        let _password = fields.next()?;
        let gid = fields.next()?.parse().ok()?;
        let members = fields.next()?;

        if name.is_empty() {
            return None;
        }

        let members = members
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();

        Some(GroupEntry::new(name, gid, members))
    }

    /// Whether `user` is listed as a member.
    pub fn has_member(&self, user: &str) -> bool {
        self.members.iter().any(|m| m == user)
    }
}
