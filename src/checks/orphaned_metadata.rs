//! Orphaned metadata: versioned-object rows whose data file is missing
//!
//! There is no automatic repair. Dropping the row would lose the object
//! from the gateway's view, so that decision is left to the operator.

use crate::checks::{Fatality, Fix, Outcome, Verifiable};
use crate::common::{Console, Result};
use crate::metadata::MetadataStore;
use crate::volume::Volume;

pub struct OrphanedMetadataCheck<'a> {
    volume: &'a Volume,
    store: &'a MetadataStore,
}

impl<'a> OrphanedMetadataCheck<'a> {
    pub fn new(volume: &'a Volume, store: &'a MetadataStore) -> Self {
        Self { volume, store }
    }
}

impl Verifiable for OrphanedMetadataCheck<'_> {
    fn name(&self) -> &'static str {
        "orphaned metadata"
    }

    fn fatality(&self) -> Fatality {
        Fatality::NonFatal
    }

    fn run(&self, console: &mut Console<'_>) -> Result<Outcome> {
        let mut fixes = Vec::new();

        for row in self.store.versioned_objects()? {
            let path = row.relative_path();
            console.detail(format!(
                "checking object {} version {}",
                row.object_id, row.id
            ));

            if !self.volume.root().join(&path).is_file() {
                fixes.push(Fix::OrphanedMetadata {
                    object_id: row.object_id,
                    id: row.id,
                    path,
                });
            }
        }

        Ok(Outcome::from_fixes(fixes))
    }
}
