//! Object data integrity: on-disk size against the recorded size
//!
//! Only rows whose data file exists are compared; a missing file is the
//! orphaned-metadata check's concern. The row's checksum column is not
//! verified yet.

use crate::checks::{Fatality, Fix, Outcome, Verifiable};
use crate::common::{Console, Result};
use crate::metadata::MetadataStore;
use crate::volume::Volume;
use std::fs;

pub struct ObjectIntegrityCheck<'a> {
    volume: &'a Volume,
    store: &'a MetadataStore,
}

impl<'a> ObjectIntegrityCheck<'a> {
    pub fn new(volume: &'a Volume, store: &'a MetadataStore) -> Self {
        Self { volume, store }
    }
}

impl Verifiable for ObjectIntegrityCheck<'_> {
    fn name(&self) -> &'static str {
        "object integrity"
    }

    fn fatality(&self) -> Fatality {
        Fatality::NonFatal
    }

    fn run(&self, console: &mut Console<'_>) -> Result<Outcome> {
        let mut fixes = Vec::new();

        for row in self.store.versioned_objects()? {
            let path = row.relative_path();
            let actual = match fs::metadata(self.volume.root().join(&path)) {
                Ok(meta) if meta.is_file() => meta.len(),
                _ => continue,
            };
            let Some(expected) = row.size else {
                console.detail(format!("no recorded size for {}, skipping", path.display()));
                continue;
            };

            console.detail(format!(
                "{}: {} bytes on disk, {} recorded",
                path.display(),
                actual,
                expected
            ));
            if i64::try_from(actual).ok() != Some(expected) {
                fixes.push(Fix::SizeMismatch {
                    path,
                    actual,
                    expected,
                });
            }
        }

        Ok(Outcome::from_fixes(fixes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::{run_captured, TestVolume};
    use crate::common::Verbosity;
    use crate::volume::layout;

    const UUID: &str = "353e5262-d525-42bd-a43a-876a0938b484";

    #[test]
    fn test_matching_sizes_pass() {
        let tv = TestVolume::new();
        tv.add_version(UUID, 1, b"hello");

        let store = tv.store();
        let (outcome, _) = run_captured(&ObjectIntegrityCheck::new(&tv.volume, &store));
        assert!(outcome.passed);
    }

    #[test]
    fn test_size_mismatch_is_reported_and_left_alone() {
        let tv = TestVolume::new();
        tv.add_version_row(UUID, 1, 100);
        let rel = tv.write_file(&layout::version_path(UUID, 1), &[7u8; 90]);

        let store = tv.store();
        let (outcome, _) = run_captured(&ObjectIntegrityCheck::new(&tv.volume, &store));
        assert!(!outcome.passed);
        assert_eq!(outcome.fixes.len(), 1);
        let text = outcome.fixes[0].to_string();
        assert!(text.contains("90"));
        assert!(text.contains("100"));

        let mut sink = std::io::sink();
        let mut console = Console::new(Verbosity::Silent, &mut sink);
        outcome.fixes[0].fix(&mut console);
        assert_eq!(fs::read(tv.root().join(rel)).unwrap(), vec![7u8; 90]);
    }

    #[test]
    fn test_missing_file_is_not_an_integrity_failure() {
        let tv = TestVolume::new();
        tv.add_version_row(UUID, 3, 100);

        let store = tv.store();
        let (outcome, _) = run_captured(&ObjectIntegrityCheck::new(&tv.volume, &store));
        assert!(outcome.passed);
    }

    #[test]
    fn test_null_size_is_skipped() {
        let tv = TestVolume::new();
        tv.conn()
            .execute(
                "INSERT INTO versioned_objects (id, object_id, size) VALUES (1, ?1, NULL)",
                [UUID],
            )
            .unwrap();
        tv.write_file(&layout::version_path(UUID, 1), b"abc");

        let store = tv.store();
        let (outcome, out) = run_captured(&ObjectIntegrityCheck::new(&tv.volume, &store));
        assert!(outcome.passed);
        assert!(out.contains("no recorded size"));
    }
}
