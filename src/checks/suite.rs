//! Ordered execution of the standard checks

use crate::checks::{
    Check, MetadataIntegrityCheck, ObjectIntegrityCheck, OrphanedMetadataCheck,
    OrphanedObjectsCheck, SchemaVersionCheck,
};
use crate::common::{Console, FsckConfig, Result, Verbosity};
use crate::metadata::MetadataStore;
use crate::volume::Volume;
use std::path::Path;

/// What a suite run found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub checks_run: usize,
    pub checks_failed: Vec<&'static str>,
    pub fixes_found: usize,
    /// The fatal check that stopped the run early, if any
    pub aborted_by: Option<&'static str>,
    pub all_passed: bool,
}

pub struct CheckSuite<'a> {
    checks: Vec<Check<'a>>,
}

impl<'a> CheckSuite<'a> {
    pub fn new(checks: Vec<Check<'a>>) -> Self {
        Self { checks }
    }

    /// The standard checks. Schema and store integrity come first: if
    /// either fails, the row-level comparisons after them mean nothing.
    pub fn standard(volume: &'a Volume, store: &'a MetadataStore) -> Self {
        Self::new(vec![
            Check::new(SchemaVersionCheck::new(
                store,
                volume.config().expected_schema_version,
            )),
            Check::new(MetadataIntegrityCheck::new(store)),
            Check::new(OrphanedObjectsCheck::new(volume, store)),
            Check::new(OrphanedMetadataCheck::new(volume, store)),
            Check::new(ObjectIntegrityCheck::new(volume, store)),
        ])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.checks.iter().map(Check::name).collect()
    }

    /// Run every check in order. The report reflects the state before any
    /// repair; nothing is re-verified after fixing.
    pub fn run(&mut self, console: &mut Console<'_>, should_fix: bool) -> Result<SuiteReport> {
        let mut report = SuiteReport::default();

        for check in &mut self.checks {
            let passed = check.verify(console)?;
            report.checks_run += 1;
            report.fixes_found += check.fixes().len();

            if !console.verbosity().is_silent() {
                check.show(console);
            }

            if !passed {
                report.checks_failed.push(check.name());
            }
            if should_fix {
                check.fix(console);
            }
            if !passed && check.is_fatal() {
                tracing::warn!(check = check.name(), "fatal check failed, skipping the rest");
                report.aborted_by = Some(check.name());
                break;
            }
        }

        report.all_passed = report.checks_failed.is_empty();

        if report.all_passed {
            console.say("All checks passed.");
        } else {
            console.say("One or more checks failed.");
        }
        console.say(format!(
            "{} of {} checks run, {} failed, {} issues found",
            report.checks_run,
            self.checks.len(),
            report.checks_failed.len(),
            report.fixes_found
        ));
        if let Some(name) = report.aborted_by {
            console.say(format!("Stopped after fatal failure in {}.", name));
        }

        Ok(report)
    }
}

/// Check the volume at `root` with the default configuration, reporting on
/// stdout. Returns whether every check passed.
pub fn run_checks(root: &Path, verbosity: Verbosity, should_fix: bool) -> Result<bool> {
    let volume = Volume::open(root, FsckConfig::default())?;
    let store = volume.open_metadata()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut console = Console::new(verbosity, &mut out);

    let report = CheckSuite::standard(&volume, &store).run(&mut console, should_fix)?;
    Ok(report.all_passed)
}
