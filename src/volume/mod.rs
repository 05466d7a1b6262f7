//! Volume handle
//!
//! A volume is a root directory holding:
//! - the sharded object tree (see [`layout`])
//! - the metadata store (`s3gw.db` by default)
//! - an optional `lost+found` quarantine tree created by repairs

pub mod layout;
pub mod quarantine;

use crate::common::{Error, FsckConfig, Result};
use crate::metadata::MetadataStore;
use std::fs;
use std::path::{Path, PathBuf};

/// What is found at the metadata store location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseState {
    Missing,
    NotRegularFile,
    Present,
}

#[derive(Debug, Clone)]
pub struct Volume {
    root: PathBuf,
    config: FsckConfig,
}

impl Volume {
    /// Bind to a volume root, which must be an existing directory
    pub fn open(root: impl AsRef<Path>, config: FsckConfig) -> Result<Self> {
        let root = root.as_ref();
        let metadata = match fs::metadata(root) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::InvalidVolume(format!(
                    "path not found: {}",
                    root.display()
                )))
            }
            Err(e) => return Err(Error::io_at(root, e)),
        };
        if !metadata.is_dir() {
            return Err(Error::InvalidVolume(format!(
                "path must be a directory: {}",
                root.display()
            )));
        }

        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &FsckConfig {
        &self.config
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(&self.config.database_file)
    }

    pub fn quarantine_root(&self) -> PathBuf {
        self.root.join(&self.config.quarantine_dir)
    }

    /// Name of the top-level directory the tree walk must skip
    pub fn quarantine_name(&self) -> &str {
        &self.config.quarantine_dir
    }

    pub fn database_state(&self) -> DatabaseState {
        match fs::metadata(self.database_path()) {
            Ok(m) if m.is_file() => DatabaseState::Present,
            Ok(_) => DatabaseState::NotRegularFile,
            Err(_) => DatabaseState::Missing,
        }
    }

    /// Open the metadata store, requiring it to be a regular file
    pub fn open_metadata(&self) -> Result<MetadataStore> {
        match self.database_state() {
            DatabaseState::Present => MetadataStore::open(self.database_path()),
            DatabaseState::Missing => Err(Error::InvalidVolume(format!(
                "metadata database not found at {} (is this a volume?)",
                self.database_path().display()
            ))),
            DatabaseState::NotRegularFile => Err(Error::InvalidVolume(format!(
                "metadata database is not a regular file: {}",
                self.database_path().display()
            ))),
        }
    }
}
