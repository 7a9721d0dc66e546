//! Group identifiers.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A numeric group identity.
///
/// Only equality matters to the resolver; the ordering derive exists so
/// callers can sort a result for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Gid(libc::gid_t);

impl Gid {
    /// Wrap a raw group id.
    pub const fn new(raw: libc::gid_t) -> Self {
        Gid(raw)
    }

    /// The raw value passed to the OS.
    pub const fn as_raw(self) -> libc::gid_t {
        self.0
    }
}

impl From<libc::gid_t> for Gid {
    fn from(raw: libc::gid_t) -> Self {
        Gid(raw)
    }
}

impl From<Gid> for libc::gid_t {
    fn from(gid: Gid) -> Self {
        gid.0
    }
}

impl fmt::Display for Gid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Gid {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Gid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gid_parse() {
        assert_eq!("100".parse::<Gid>().unwrap(), Gid::new(100));
        assert_eq!(" 42 ".parse::<Gid>().unwrap(), Gid::new(42));
        assert!("-1".parse::<Gid>().is_err());
        assert!("wheel".parse::<Gid>().is_err());
    }

    #[test]
    fn test_gid_serializes_as_number() {
        let json = serde_json::to_string(&vec![Gid::new(1), Gid::new(27)]).unwrap();
        assert_eq!(json, "[1,27]");
    }
}
