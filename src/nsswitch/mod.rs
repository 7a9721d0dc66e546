//! nsswitch.conf configuration.
//!
//! The configuration maps each database (`group`, `initgroups`, ...) to an
//! ordered list of services, each with its own action table.

pub mod parse;

pub use parse::{parse_config, parse_services, NsswitchParseError};

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::{Action, ActionTable, NssStatus};

/// Default location of the system configuration.
pub const NSSWITCH_PATH: &str = "/etc/nsswitch.conf";

/// Service line used for the group database when none is configured.
pub const DEFAULT_CONFIG: &str = "files";

/// Legacy default that consults the `compat` service first.
pub const LEGACY_DEFAULT_CONFIG: &str = "compat [NOTFOUND=return] files";

/// Database consulted when a dedicated group-list walk is configured.
pub const INITGROUPS_DB: &str = "initgroups";

/// Database that lists group lookup services.
pub const GROUP_DB: &str = "group";

/// One configured service and its per-status actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub name: String,
    pub actions: ActionTable,
}

impl ServiceSpec {
    pub fn new(name: impl Into<String>) -> Self {
        ServiceSpec {
            name: name.into(),
            actions: ActionTable::default(),
        }
    }

    /// Set the action for one status.
    pub fn with_action(mut self, status: NssStatus, action: Action) -> Self {
        self.actions.set(status, action);
        self
    }

    /// The action configured for `status`.
    pub fn next_action(&self, status: NssStatus) -> Action {
        self.actions.get(status)
    }
}

/// An ordered service list for one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub name: String,
    pub services: Vec<ServiceSpec>,
}

impl Database {
    pub fn new(name: impl AsRef<str>, services: Vec<ServiceSpec>) -> Self {
        Database {
            name: name.as_ref().to_ascii_lowercase(),
            services,
        }
    }

    /// The built-in group database used when nothing is configured.
    pub fn default_group(legacy: bool) -> Self {
        let services = if legacy {
            vec![
                ServiceSpec::new("compat").with_action(NssStatus::NotFound, Action::Return),
                ServiceSpec::new("files"),
            ]
        } else {
            vec![ServiceSpec::new(DEFAULT_CONFIG)]
        };
        Database::new(GROUP_DB, services)
    }
}

/// A parsed nsswitch configuration.
#[derive(Debug, Clone, Default)]
pub struct NsswitchConfig {
    databases: Vec<Database>,
    custom: HashSet<String>,
}

impl NsswitchConfig {
    /// Parse configuration text. `name` is used in error reports.
    pub fn parse(name: &str, text: &str) -> Result<Self, NsswitchParseError> {
        Ok(NsswitchConfig {
            databases: parse_config(name, text)?,
            custom: HashSet::new(),
        })
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read nsswitch config: {}", path.display()))?;

        Ok(Self::parse(&path.display().to_string(), &contents)?)
    }

    /// Load configuration, treating a missing file as an empty configuration.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("{} not found, using built-in defaults", path.display());
            Ok(Self::default())
        }
    }

    /// The first configured entry for a database.
    pub fn database(&self, name: &str) -> Option<&Database> {
        let name = name.to_ascii_lowercase();
        self.databases.iter().find(|db| db.name == name)
    }

    /// Replace a database's services with an explicit service line.
    ///
    /// The database is then considered custom for the rest of this
    /// configuration's life.
    pub fn configure_lookup(&mut self, database: &str, services: &str) -> Result<(), NsswitchParseError> {
        let services = parse_services(database, services)?;
        let db = Database::new(database, services);

        self.custom.insert(db.name.clone());
        match self.databases.iter_mut().find(|d| d.name == db.name) {
            Some(existing) => *existing = db,
            None => self.databases.push(db),
        }

        Ok(())
    }

    /// Whether a database was set through [`configure_lookup`](Self::configure_lookup).
    pub fn is_custom(&self, database: &str) -> bool {
        self.custom.contains(&database.to_ascii_lowercase())
    }

    /// The database a group-list walk uses, and whether it is dedicated.
    ///
    /// A configured `initgroups` database is dedicated. Otherwise the
    /// `group` database is used, falling back to the built-in default.
    pub fn group_list_database(&self, legacy_default: bool) -> (Database, bool) {
        if let Some(db) = self.database(INITGROUPS_DB) {
            return (db.clone(), true);
        }

        let db = self
            .database(GROUP_DB)
            .cloned()
            .unwrap_or_else(|| Database::default_group(legacy_default));
        (db, false)
    }
}
