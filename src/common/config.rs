//! Configuration for volume-fsck
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `FSCK_*` environment variables.

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Filename of the metadata store under the volume root
pub const DEFAULT_DATABASE_FILE: &str = "s3gw.db";

/// Name of the quarantine subtree under the volume root
pub const DEFAULT_QUARANTINE_DIR: &str = "lost+found";

/// Metadata schema version this tool was built against
pub const EXPECTED_SCHEMA_VERSION: i64 = 4;

/// Environment variable prefix (`FSCK_DATABASE_FILE`, ...)
pub const ENV_PREFIX: &str = "FSCK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsckConfig {
    /// Metadata store filename, relative to the volume root
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Quarantine directory name, relative to the volume root
    #[serde(default = "default_quarantine_dir")]
    pub quarantine_dir: String,

    /// Schema version the metadata store must declare
    #[serde(default = "default_schema_version")]
    pub expected_schema_version: i64,
}

fn default_database_file() -> String {
    DEFAULT_DATABASE_FILE.to_string()
}
fn default_quarantine_dir() -> String {
    DEFAULT_QUARANTINE_DIR.to_string()
}
fn default_schema_version() -> i64 {
    EXPECTED_SCHEMA_VERSION
}

impl Default for FsckConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            quarantine_dir: default_quarantine_dir(),
            expected_schema_version: default_schema_version(),
        }
    }
}

impl FsckConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("database_file", DEFAULT_DATABASE_FILE)?
            .set_default("quarantine_dir", DEFAULT_QUARANTINE_DIR)?
            .set_default("expected_schema_version", EXPECTED_SCHEMA_VERSION)?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: FsckConfig = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject names that would escape the volume root or collide with it
    pub fn validate(&self) -> Result<()> {
        validate_name("database_file", &self.database_file)?;
        validate_name("quarantine_dir", &self.quarantine_dir)?;
        if self.database_file == self.quarantine_dir {
            return Err(Error::InvalidConfig(
                "database_file and quarantine_dir must differ".into(),
            ));
        }
        Ok(())
    }
}

fn validate_name(key: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidConfig(format!("{} cannot be empty", key)));
    }
    if value == "." || value == ".." || value.contains('/') || value.contains('\\') {
        return Err(Error::InvalidConfig(format!(
            "{} must be a plain file name, got {:?}",
            key, value
        )));
    }
    Ok(())
}
