//! Test fixtures for common test scenarios.
//!
//! Sample group databases and nsswitch configurations shared by the
//! source, resolver and operation tests.

/// A small group(5) file.
///
/// alice: wheel (10), users (100), video (27), devs (1001)
/// bob:   wheel (10), users (100), audio (29)
/// carol: users (100), devs (1001)
pub const SAMPLE_GROUP_FILE: &str = "\
root:x:0:
wheel:x:10:alice,bob
users:x:100:alice,bob,carol
video:x:27:alice
audio:x:29:bob
devs:x:1001:alice,carol
";

/// nsswitch.conf with only a `group` line.
pub const SHARED_NSSWITCH: &str = "\
passwd: files
group:  files [SUCCESS=continue] compat
";

/// nsswitch.conf with a dedicated `initgroups` line.
pub const DEDICATED_NSSWITCH: &str = "\
group:      files compat
initgroups: files [NOTFOUND=return] compat
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nsswitch::NsswitchConfig;

    #[test]
    fn test_fixtures_parse() {
        let shared = NsswitchConfig::parse("shared", SHARED_NSSWITCH).unwrap();
        assert!(!shared.group_list_database(false).1);

        let dedicated = NsswitchConfig::parse("dedicated", DEDICATED_NSSWITCH).unwrap();
        assert!(dedicated.group_list_database(false).1);
    }
}
