//! Consistency checks
//!
//! A check inspects the volume and/or its metadata store and produces a list
//! of [`Fix`]es. The [`CheckSuite`] runs checks in order, shows their fixes,
//! optionally applies them, and stops early when a fatal check fails.

pub mod fix;
pub mod metadata_integrity;
pub mod object_integrity;
pub mod orphaned_metadata;
pub mod orphaned_objects;
pub mod schema_version;
pub mod suite;

#[cfg(test)]
pub(crate) mod testing;

pub use fix::{Fix, OrphanKind, Remediation};
pub use metadata_integrity::MetadataIntegrityCheck;
pub use object_integrity::ObjectIntegrityCheck;
pub use orphaned_metadata::OrphanedMetadataCheck;
pub use orphaned_objects::OrphanedObjectsCheck;
pub use schema_version::SchemaVersionCheck;
pub use suite::{run_checks, CheckSuite, SuiteReport};

use crate::common::{Console, Result};

/// Whether a failure invalidates every check after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fatality {
    Fatal,
    NonFatal,
}

/// Result of one verification pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub passed: bool,
    pub fixes: Vec<Fix>,
}

impl Outcome {
    /// A check passes exactly when it found nothing to fix
    pub fn from_fixes(fixes: Vec<Fix>) -> Self {
        Self {
            passed: fixes.is_empty(),
            fixes,
        }
    }
}

/// The check-specific part of a [`Check`]
pub trait Verifiable {
    fn name(&self) -> &'static str;

    fn fatality(&self) -> Fatality;

    /// Inspect the volume. `Err` means the check itself could not run
    /// (a tool defect or an unreadable volume), never "passed".
    fn run(&self, console: &mut Console<'_>) -> Result<Outcome>;
}

/// A verification step together with the fixes from its latest run
pub struct Check<'a> {
    inner: Box<dyn Verifiable + 'a>,
    fixes: Vec<Fix>,
}

impl<'a> Check<'a> {
    pub fn new(inner: impl Verifiable + 'a) -> Self {
        Self {
            inner: Box::new(inner),
            fixes: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    pub fn is_fatal(&self) -> bool {
        self.inner.fatality() == Fatality::Fatal
    }

    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }

    /// Run the check, replacing any fixes from a previous run
    pub fn verify(&mut self, console: &mut Console<'_>) -> Result<bool> {
        console.say(format!("Checking {}...", self.name()));
        self.fixes.clear();

        let outcome = self.inner.run(console)?;
        tracing::debug!(
            check = self.name(),
            passed = outcome.passed,
            fixes = outcome.fixes.len(),
            "check finished"
        );

        self.fixes = outcome.fixes;
        Ok(outcome.passed)
    }

    /// Print one entry per fix
    pub fn show(&self, console: &mut Console<'_>) {
        for fix in &self.fixes {
            console.block(fix);
        }
    }

    /// Apply every fix in the order found
    pub fn fix(&self, console: &mut Console<'_>) {
        for fix in &self.fixes {
            fix.fix(console);
        }
    }
}
