//! Row types read from the metadata store

use crate::volume::layout;
use std::path::PathBuf;

/// One `versioned_objects` row with a non-null `object_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedObjectRow {
    pub object_id: String,
    pub id: i64,
    /// Not verified yet; carried for a future content-hash check
    pub checksum: Option<String>,
    pub size: Option<i64>,
}

impl VersionedObjectRow {
    /// Where this version's data file must live, relative to the root
    pub fn relative_path(&self) -> PathBuf {
        layout::version_path(&self.object_id, self.id)
    }
}
