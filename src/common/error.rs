//! Error types for volume-fsck

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error at {path}: {source}")]
    IoAt {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Metadata Errors ===
    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Query contract violated by `{query}`: {reason}")]
    QueryContract { query: String, reason: String },

    // === Volume Errors ===
    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    // === Config Errors ===
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Attach the offending path to an I/O error
    pub fn io_at(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        Error::IoAt {
            path: path.into(),
            source,
        }
    }

    /// Is this a defect in the tool rather than a problem with the volume
    /// or its environment?
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::QueryContract { .. } | Error::Internal(_))
    }
}
