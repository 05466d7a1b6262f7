//! Shared fixture: a temporary volume with a real metadata store

#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use volume_fsck::volume::layout;

const SCHEMA: &str = "
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
        upload_id TEXT NOT NULL,
        part_num INTEGER NOT NULL
    );
    PRAGMA user_version = 4;";

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    /// Empty volume directory, no metadata store
    pub fn uninitialized() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Volume with an empty, current-schema metadata store
    pub fn new() -> Self {
        let fixture = Self::uninitialized();
        fixture.conn().execute_batch(SCHEMA).unwrap();
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn conn(&self) -> Connection {
        Connection::open(self.root().join("s3gw.db")).unwrap()
    }

    pub fn new_uuid() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn set_schema_version(&self, version: i64) {
        self.conn()
            .pragma_update(None, "user_version", version)
            .unwrap();
    }

    pub fn add_version_row(&self, uuid: &str, id: i64, size: i64) {
        self.conn()
            .execute(
                "INSERT INTO versioned_objects (id, object_id, checksum, size) VALUES (?1, ?2, NULL, ?3)",
                params![id, uuid, size],
            )
            .unwrap();
    }

    /// Row plus a data file of matching size; returns the relative path
    pub fn add_version(&self, uuid: &str, id: i64, data: &[u8]) -> PathBuf {
        self.add_version_row(uuid, id, data.len() as i64);
        self.write(&layout::version_path(uuid, id), data)
    }

    pub fn add_part(&self, uuid: &str, upload_id: &str, part_id: i64, data: &[u8]) -> PathBuf {
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
        self.write(&layout::part_path(uuid, part_id), data)
    }

    pub fn write(&self, relative: &Path, data: &[u8]) -> PathBuf {
        let full = self.root().join(relative);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, data).unwrap();
        relative.to_path_buf()
    }
}
