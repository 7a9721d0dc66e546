//! Configuration file support for grpresolve.
//!
//! grpresolve reads settings from two places:
//! - Global: `~/.grpresolve/config.toml` - User-wide defaults
//! - Explicit: the file passed with `--config`
//!
//! The explicit file takes precedence over the global one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::nsswitch::NSSWITCH_PATH;
use crate::sources::GROUP_FILE;

/// grpresolve configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name service settings
    pub nss: NssConfig,

    /// Buffer sizing
    pub resolve: ResolveConfig,

    /// Accelerator back-off
    pub accelerator: AcceleratorConfig,
}

/// Where the service configuration and group data live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NssConfig {
    /// Path to nsswitch.conf (default: /etc/nsswitch.conf)
    pub nsswitch: Option<PathBuf>,

    /// Path to the group file used by `files` and `compat` (default: /etc/group)
    pub group_file: Option<PathBuf>,

    /// Fall back to `compat [NOTFOUND=return] files` instead of `files`
    #[serde(default)]
    pub legacy_default: bool,
}

/// Initial buffer sizing for unbounded resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Starting size when the platform reports no group limit
    pub initial_guess: Option<usize>,

    /// Cap on the starting size when a limit is known
    pub max_initial: Option<usize>,
}

/// Accelerator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceleratorConfig {
    /// Resolutions to skip before retrying a failed accelerator
    pub retry_interval: Option<u32>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.nss.nsswitch.is_some() {
            self.nss.nsswitch = other.nss.nsswitch;
        }
        if other.nss.group_file.is_some() {
            self.nss.group_file = other.nss.group_file;
        }
        if other.nss.legacy_default {
            self.nss.legacy_default = true;
        }

        if other.resolve.initial_guess.is_some() {
            self.resolve.initial_guess = other.resolve.initial_guess;
        }
        if other.resolve.max_initial.is_some() {
            self.resolve.max_initial = other.resolve.max_initial;
        }

        if other.accelerator.retry_interval.is_some() {
            self.accelerator.retry_interval = other.accelerator.retry_interval;
        }
    }

    /// Effective nsswitch.conf path.
    pub fn nsswitch_path(&self) -> PathBuf {
        self.nss
            .nsswitch
            .clone()
            .unwrap_or_else(|| PathBuf::from(NSSWITCH_PATH))
    }

    /// Effective group file path.
    pub fn group_file_path(&self) -> PathBuf {
        self.nss
            .group_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(GROUP_FILE))
    }
}

/// Get the global grpresolve config directory (~/.grpresolve).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".grpresolve"))
}

/// Get the global config path (~/.grpresolve/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load merged configuration from the global and an explicit location.
///
/// Order of precedence (highest to lowest):
/// 1. Explicit config (`--config`), which must exist
/// 2. Global config (~/.grpresolve/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, explicit_path: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if let Some(explicit_path) = explicit_path {
        config.merge(Config::load(explicit_path)?);
    }

    Ok(config)
}
