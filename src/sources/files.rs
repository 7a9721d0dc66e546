//! Files source - the local group(5) database.

use std::io;
use std::path::{Path, PathBuf};

use crate::core::{GroupBuffer, GroupEntry, NssStatus, RawStatus};
use crate::sources::{GroupRequest, GroupSource, Lookup};

/// Default location of the group database.
pub const GROUP_FILE: &str = "/etc/group";

/// A group(5) formatted file.
#[derive(Debug, Clone)]
pub struct GroupFile {
    path: PathBuf,
}

impl GroupFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        GroupFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every well-formed entry.
    ///
    /// NIS inclusion lines (`+name`, `-name`) and malformed lines are skipped.
    pub fn entries(&self) -> io::Result<Vec<GroupEntry>> {
        let contents = std::fs::read(&self.path)?;

        let entries = contents
            .split(|b| *b == b'\n')
            .enumerate()
            .filter_map(|(idx, raw)| match std::str::from_utf8(raw) {
                Ok(line) => Some((idx, line.trim_end_matches('\r'))),
                Err(_) => {
                    tracing::trace!("{}:{}: skipping non-UTF-8 line", self.path.display(), idx + 1);
                    None
                }
            })
            .filter(|(_, line)| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            })
            .filter(|(_, line)| !line.starts_with('+') && !line.starts_with('-'))
            .filter_map(|(idx, line)| {
                let entry = GroupEntry::parse_line(line);
                if entry.is_none() {
                    tracing::trace!("{}:{}: skipping malformed line", self.path.display(), idx + 1);
                }
                entry
            })
            .collect();

        Ok(entries)
    }
}

/// The `files` service: answers group-list queries directly from a group file.
#[derive(Debug, Clone)]
pub struct FilesSource {
    file: GroupFile,
}

impl FilesSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilesSource {
            file: GroupFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl GroupSource for FilesSource {
    fn name(&self) -> &str {
        "files"
    }

    fn initgroups_dyn(&self, request: &GroupRequest<'_>, groups: &mut GroupBuffer) -> Option<Lookup> {
        let entries = match self.file.entries() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("cannot read {}: {}", self.path().display(), e);
                return Some(Lookup::unavail(e.raw_os_error()));
            }
        };

        let start = groups.len();
        for entry in entries {
            if entry.gid == request.group || !entry.has_member(request.user) {
                continue;
            }
            if groups.contains_from(start, entry.gid) {
                continue;
            }
            if !groups.push(entry.gid, request.limit) {
                // Buffer is at the hard limit.
                break;
            }
        }

        Some(Lookup::success())
    }

    fn enumerate(&self) -> Option<Result<Vec<GroupEntry>, RawStatus>> {
        Some(self.file.entries().map_err(|_| NssStatus::Unavail.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Gid;
    use crate::test_support::SAMPLE_GROUP_FILE;
    use tempfile::TempDir;

    fn write_group_file(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("group");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn seeded(gid: u32) -> GroupBuffer {
        let mut buffer = GroupBuffer::with_size(2).unwrap();
        buffer.seed(Gid::new(gid));
        buffer
    }

    #[test]
    fn test_entries_skip_comments_and_nis() {
        let tmp = TempDir::new().unwrap();
        let path = write_group_file(
            tmp.path(),
            "# comment\nwheel:x:10:alice\n+nisgroup\n-other\nbroken line\n\nusers:x:100:\n",
        );

        let entries = GroupFile::new(path).entries().unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["wheel", "users"]);
    }

    #[test]
    fn test_initgroups_collects_memberships() {
        let tmp = TempDir::new().unwrap();
        let source = FilesSource::new(write_group_file(tmp.path(), SAMPLE_GROUP_FILE));

        let mut buffer = seeded(100);
        let request = GroupRequest {
            user: "alice",
            group: Gid::new(100),
            limit: None,
        };

        let lookup = source.initgroups_dyn(&request, &mut buffer).unwrap();
        assert_eq!(lookup.status, NssStatus::Success.into());

        let gids: Vec<u32> = buffer.as_slice().iter().map(|g| g.as_raw()).collect();
        // Seed first; `users` (100) lists alice but is the seed and is skipped.
        assert_eq!(gids, vec![100, 10, 27, 1001]);
    }

    #[test]
    fn test_initgroups_skips_repeated_gid() {
        let tmp = TempDir::new().unwrap();
        let source = FilesSource::new(write_group_file(
            tmp.path(),
            "a:x:5:bob\nalias:x:5:bob\nb:x:6:bob\n",
        ));

        let mut buffer = seeded(1);
        let request = GroupRequest {
            user: "bob",
            group: Gid::new(1),
            limit: None,
        };
        source.initgroups_dyn(&request, &mut buffer).unwrap();

        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_initgroups_honours_limit() {
        let tmp = TempDir::new().unwrap();
        let source = FilesSource::new(write_group_file(tmp.path(), SAMPLE_GROUP_FILE));

        let mut buffer = seeded(100);
        let request = GroupRequest {
            user: "alice",
            group: Gid::new(100),
            limit: Some(2),
        };
        let lookup = source.initgroups_dyn(&request, &mut buffer).unwrap();

        assert_eq!(lookup.status, NssStatus::Success.into());
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_non_utf8_line_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("group");
        std::fs::write(&path, b"wheel:x:10:alice\nbad\xff:x:11:alice\nvideo:x:27:alice\n").unwrap();
        let source = FilesSource::new(path);

        let mut buffer = seeded(100);
        let request = GroupRequest {
            user: "alice",
            group: Gid::new(100),
            limit: None,
        };
        let lookup = source.initgroups_dyn(&request, &mut buffer).unwrap();

        assert_eq!(lookup.status, NssStatus::Success.into());
        assert_eq!(buffer.as_slice(), &[Gid::new(100), Gid::new(10), Gid::new(27)]);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let source = FilesSource::new(tmp.path().join("nope"));

        let mut buffer = seeded(100);
        let request = GroupRequest {
            user: "alice",
            group: Gid::new(100),
            limit: None,
        };
        let lookup = source.initgroups_dyn(&request, &mut buffer).unwrap();

        assert_eq!(lookup.status, NssStatus::Unavail.into());
        assert_eq!(lookup.errno, Some(libc::ENOENT));
        assert_eq!(buffer.len(), 1);
    }
}
