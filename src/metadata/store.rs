//! Metadata store using SQLite
//!
//! Read-only view over the volume's relational metadata:
//! - `versioned_objects` (object_id, id, checksum, size)
//! - `multiparts` joined with `multiparts_parts` on `upload_id`
//! - the schema version in `PRAGMA user_version`

use crate::common::{Error, Result};
use crate::metadata::rows::VersionedObjectRow;
use rusqlite::{params, Connection, OpenFlags, Params};
use std::path::Path;

const QUERY_SCHEMA_VERSION: &str = "PRAGMA user_version";

const QUERY_INTEGRITY: &str = "PRAGMA integrity_check";

const QUERY_COUNT_VERSION: &str =
    "SELECT COUNT(*) FROM versioned_objects WHERE object_id = ?1 AND id = ?2";

const QUERY_COUNT_PART: &str = "SELECT COUNT(multiparts_parts.id) \
     FROM multiparts_parts \
     JOIN multiparts ON multiparts_parts.upload_id = multiparts.upload_id \
     WHERE multiparts_parts.id = ?1 AND multiparts.path_uuid = ?2";

const QUERY_VERSIONED_OBJECTS: &str = "SELECT object_id, id, checksum, size \
     FROM versioned_objects \
     WHERE object_id IS NOT NULL \
     ORDER BY object_id, id";

/// Metadata store
pub struct MetadataStore {
    conn: Connection,
}

impl MetadataStore {
    /// Open an existing store. A file that is not a database is only
    /// detected by the first query.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::debug!(path = %path.display(), "metadata store opened");
        Ok(Self { conn })
    }

    /// Schema version declared by the store
    pub fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row(QUERY_SCHEMA_VERSION, [], |row| row.get(0))?)
    }

    /// Run SQLite's structural verification. Returns every diagnostic row
    /// that is not `ok`; an empty list means the file is sound.
    pub fn integrity_check(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(QUERY_INTEGRITY)?;
        let mut rows = stmt.query([])?;
        let mut diagnostics = Vec::new();
        while let Some(row) = rows.next()? {
            let result: String = row.get(0)?;
            if !result.eq_ignore_ascii_case("ok") {
                diagnostics.push(result);
            }
        }
        Ok(diagnostics)
    }

    /// Run an aggregate `COUNT`-shaped query. Such a query always yields
    /// exactly one row; anything else is a contract violation.
    pub fn count<P: Params>(&self, query: &str, params: P) -> Result<i64> {
        let mut stmt = self.conn.prepare(query)?;
        let mut rows = stmt.query(params)?;
        let count = match rows.next()? {
            Some(row) => row.get(0)?,
            None => {
                return Err(Error::QueryContract {
                    query: query.to_string(),
                    reason: "aggregate query returned no rows".into(),
                })
            }
        };
        Ok(count)
    }

    /// Rows in `versioned_objects` for this object UUID and version id
    pub fn count_versioned_objects(&self, uuid: &str, id: i64) -> Result<i64> {
        self.count(QUERY_COUNT_VERSION, params![uuid, id])
    }

    /// Multipart parts with this part id whose upload belongs to `uuid`
    pub fn count_multipart_parts(&self, uuid: &str, id: i64) -> Result<i64> {
        self.count(QUERY_COUNT_PART, params![id, uuid])
    }

    /// Every versioned object with a non-null object id
    pub fn versioned_objects(&self) -> Result<Vec<VersionedObjectRow>> {
        let mut stmt = self.conn.prepare(QUERY_VERSIONED_OBJECTS)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(VersionedObjectRow {
                    object_id: row.get(0)?,
                    id: row.get(1)?,
                    checksum: row.get(2)?,
                    size: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
