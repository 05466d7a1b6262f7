//! Fixture volumes for check tests

use crate::checks::{Outcome, Verifiable};
use crate::common::{config::EXPECTED_SCHEMA_VERSION, Console, FsckConfig, Verbosity};
use crate::metadata::MetadataStore;
use crate::volume::{layout, Volume};
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) const SCHEMA: &str = "
    CREATE TABLE versioned_objects (
        id INTEGER PRIMARY KEY,
        object_id TEXT,
        checksum TEXT,
        size INTEGER
    );
    CREATE TABLE multiparts (
        id INTEGER PRIMARY KEY,
        upload_id TEXT NOT NULL UNIQUE,
        path_uuid TEXT NOT NULL
    );
    CREATE TABLE multiparts_parts (
        id INTEGER PRIMARY KEY,
        upload_id TEXT NOT NULL REFERENCES multiparts (upload_id),
        part_num INTEGER NOT NULL
    );";

pub(crate) struct TestVolume {
    _dir: TempDir,
    pub volume: Volume,
}

impl TestVolume {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let volume = Volume::open(dir.path(), FsckConfig::default()).unwrap();
        let conn = Connection::open(volume.database_path()).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.pragma_update(None, "user_version", EXPECTED_SCHEMA_VERSION)
            .unwrap();
        Self { _dir: dir, volume }
    }

    pub fn root(&self) -> &Path {
        self.volume.root()
    }

    pub fn conn(&self) -> Connection {
        Connection::open(self.volume.database_path()).unwrap()
    }

    pub fn store(&self) -> MetadataStore {
        self.volume.open_metadata().unwrap()
    }

    pub fn set_schema_version(&self, version: i64) {
        self.conn()
            .pragma_update(None, "user_version", version)
            .unwrap();
    }

    /// Metadata row only
    pub fn add_version_row(&self, uuid: &str, id: i64, size: i64) {
        self.conn()
            .execute(
                "INSERT INTO versioned_objects (id, object_id, checksum, size) VALUES (?1, ?2, NULL, ?3)",
                params![id, uuid, size],
            )
            .unwrap();
    }

    /// Metadata row and a matching data file
    pub fn add_version(&self, uuid: &str, id: i64, data: &[u8]) -> PathBuf {
        self.add_version_row(uuid, id, data.len() as i64);
        self.write_file(&layout::version_path(uuid, id), data)
    }

    pub fn add_part_row(&self, uuid: &str, upload_id: &str, part_id: i64) {
        let conn = self.conn();
        conn.execute(
            "INSERT OR IGNORE INTO multiparts (upload_id, path_uuid) VALUES (?1, ?2)",
            params![upload_id, uuid],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO multiparts_parts (id, upload_id, part_num) VALUES (?1, ?2, ?1)",
            params![part_id, upload_id],
        )
        .unwrap();
    }

    /// Write a file under the root, returning its relative path
    pub fn write_file(&self, relative: &Path, data: &[u8]) -> PathBuf {
        let full = self.root().join(relative);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, data).unwrap();
        relative.to_path_buf()
    }
}

/// Run a check with a verbose console, returning the outcome and output
pub(crate) fn run_captured(check: &dyn Verifiable) -> (Outcome, String) {
    let mut buf = Vec::new();
    let outcome = {
        let mut console = Console::new(Verbosity::Verbose, &mut buf);
        check.run(&mut console).unwrap()
    };
    (outcome, String::from_utf8(buf).unwrap())
}
