//! Command implementations

pub mod chain;
pub mod completions;
pub mod groups;
pub mod init;

use grpresolve::util::Config;
use grpresolve::Resolver;

/// State shared by the commands that resolve groups.
pub struct Session {
    pub config: Config,
    pub resolver: Resolver,
    pub color: bool,
}
