//! Storage-engine level integrity of the metadata store

use crate::checks::{Fatality, Fix, Outcome, Verifiable};
use crate::common::{Console, Result};
use crate::metadata::MetadataStore;

pub struct MetadataIntegrityCheck<'a> {
    store: &'a MetadataStore,
}

impl<'a> MetadataIntegrityCheck<'a> {
    pub fn new(store: &'a MetadataStore) -> Self {
        Self { store }
    }
}

impl Verifiable for MetadataIntegrityCheck<'_> {
    fn name(&self) -> &'static str {
        "metadata integrity"
    }

    fn fatality(&self) -> Fatality {
        Fatality::Fatal
    }

    fn run(&self, console: &mut Console<'_>) -> Result<Outcome> {
        // Finer-grained problems (missing index rows, duplicate unique
        // entries) come back as rows; a file that is not a database at all
        // fails the query itself.
        let diagnostics = match self.store.integrity_check() {
            Ok(diagnostics) => diagnostics,
            Err(e) => vec![e.to_string()],
        };
        for d in &diagnostics {
            console.detail(format!("integrity diagnostic: {}", d));
        }

        if diagnostics.is_empty() {
            Ok(Outcome::from_fixes(Vec::new()))
        } else {
            Ok(Outcome::from_fixes(vec![Fix::MetadataCorrupt { diagnostics }]))
        }
    }
}
