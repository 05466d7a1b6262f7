//! Metadata schema version gate
//!
//! Every other check assumes the table layout of one schema version. If the
//! store declares another, nothing after this check can be trusted.

use crate::checks::{Fatality, Fix, Outcome, Verifiable};
use crate::common::{Console, Result};
use crate::metadata::MetadataStore;

pub struct SchemaVersionCheck<'a> {
    store: &'a MetadataStore,
    expected: i64,
}

impl<'a> SchemaVersionCheck<'a> {
    pub fn new(store: &'a MetadataStore, expected: i64) -> Self {
        Self { store, expected }
    }
}

impl Verifiable for SchemaVersionCheck<'_> {
    fn name(&self) -> &'static str {
        "metadata schema version"
    }

    fn fatality(&self) -> Fatality {
        Fatality::Fatal
    }

    fn run(&self, console: &mut Console<'_>) -> Result<Outcome> {
        let fix = match self.store.schema_version() {
            Ok(found) => {
                console.detail(format!("got schema version {}", found));
                (found != self.expected).then_some(Fix::SchemaVersionMismatch {
                    found,
                    expected: self.expected,
                })
            }
            Err(e) => Some(Fix::SchemaVersionUnreadable {
                expected: self.expected,
                reason: e.to_string(),
            }),
        };
        Ok(Outcome::from_fixes(fix.into_iter().collect()))
    }
}
