//! Configuration management
//!
//! Settings live in `settings.json` inside the Warbler directory:
//! ```json
//! { "database": "warbler.duckdb", "testing": false }
//! ```
//!
//! `DATABASE_URL` and `WARBLER_TESTING` override the file, so a test run can
//! point at an isolated database before anything else is initialized. With
//! `testing` on, the directory schema is dropped and recreated on open.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

/// Database file used when nothing else is configured
pub const DEFAULT_DATABASE: &str = "warbler.duckdb";

/// Value of `DATABASE_URL` (or `database`) selecting an in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    database: Option<String>,
    #[serde(default)]
    testing: bool,
}

/// Where the directory database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

impl DatabaseLocation {
    /// Resolve a configured database value against the Warbler directory
    ///
    /// Accepts `:memory:`, a plain path, or a `duckdb://` URL. Relative paths
    /// are taken relative to `warbler_dir`.
    pub fn resolve(value: &str, warbler_dir: &Path) -> Self {
        let value = value.trim();
        let value = value.strip_prefix("duckdb://").unwrap_or(value);

        if value.is_empty() || value == IN_MEMORY {
            return DatabaseLocation::InMemory;
        }

        let path = Path::new(value);
        if path.is_absolute() {
            DatabaseLocation::File(path.to_path_buf())
        } else {
            DatabaseLocation::File(warbler_dir.join(path))
        }
    }
}

/// Warbler configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseLocation,
    /// Start every run from an empty schema
    pub testing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE)),
            testing: false,
        }
    }
}

impl Config {
    /// Load config from the Warbler directory
    ///
    /// The database can be chosen via:
    /// 1. `DATABASE_URL` environment variable (tests, CI)
    /// 2. `database` in settings.json
    /// 3. `warbler.duckdb` in the Warbler directory
    pub fn load(warbler_dir: &Path) -> Result<Self> {
        let settings_path = warbler_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        Ok(Self::from_settings(
            raw,
            warbler_dir,
            std::env::var("DATABASE_URL").ok().as_deref(),
            std::env::var("WARBLER_TESTING").ok().as_deref(),
        ))
    }

    /// Config pointing at an explicit database, ignoring settings and environment
    pub fn for_database(database: DatabaseLocation) -> Self {
        Self {
            database,
            ..Self::default()
        }
    }

    fn from_settings(
        raw: SettingsFile,
        warbler_dir: &Path,
        database_url: Option<&str>,
        testing_env: Option<&str>,
    ) -> Self {
        let database_value = database_url
            .or(raw.database.as_deref())
            .unwrap_or(DEFAULT_DATABASE);
        let database = DatabaseLocation::resolve(database_value, warbler_dir);

        let testing = match testing_env {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.testing,
        };

        Self { database, testing }
    }
}
