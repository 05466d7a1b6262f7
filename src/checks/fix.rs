//! Remediation units produced by checks

use crate::common::{Console, Result};
use crate::volume::layout;
use crate::volume::quarantine::{self, Quarantined};
use std::fmt;
use std::path::{Path, PathBuf};

/// How an on-disk orphan was classified by its file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanKind {
    /// `<id>.v` without a `versioned_objects` row
    Object,
    /// `<id>.p` without a multipart part row
    Multipart,
    /// Matches no naming convention
    Unknown,
}

/// What applying a fix does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remediation {
    MoveToQuarantine,
    ReportOnly,
}

/// One inconsistency, with enough context to describe and repair it.
/// Paths are relative to the volume root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fix {
    OrphanedObject {
        root: PathBuf,
        quarantine: PathBuf,
        path: PathBuf,
        kind: OrphanKind,
    },
    /// A directory of the object tree the walk could not list
    UnreadableDirectory {
        path: PathBuf,
        reason: String,
    },
    OrphanedMetadata {
        object_id: String,
        id: i64,
        path: PathBuf,
    },
    SizeMismatch {
        path: PathBuf,
        actual: u64,
        expected: i64,
    },
    SchemaVersionMismatch {
        found: i64,
        expected: i64,
    },
    SchemaVersionUnreadable {
        expected: i64,
        reason: String,
    },
    MetadataCorrupt {
        diagnostics: Vec<String>,
    },
}

/// What [`Fix::apply`] actually did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Quarantined(Quarantined),
    Nothing,
}

impl Fix {
    pub fn remediation(&self) -> Remediation {
        match self {
            Fix::OrphanedObject {
                kind: OrphanKind::Object | OrphanKind::Multipart,
                ..
            } => Remediation::MoveToQuarantine,
            _ => Remediation::ReportOnly,
        }
    }

    /// The on-disk path this fix concerns, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Fix::OrphanedObject { path, .. }
            | Fix::UnreadableDirectory { path, .. }
            | Fix::OrphanedMetadata { path, .. }
            | Fix::SizeMismatch { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Perform the remediation, reporting errors to the caller
    pub fn apply(&self) -> Result<Applied> {
        match (self, self.remediation()) {
            (
                Fix::OrphanedObject {
                    root,
                    quarantine,
                    path,
                    ..
                },
                Remediation::MoveToQuarantine,
            ) => Ok(Applied::Quarantined(quarantine::quarantine_file(
                root, quarantine, path,
            )?)),
            _ => Ok(Applied::Nothing),
        }
    }

    /// Perform the remediation. Failures are logged and reported on the
    /// console but never propagate, so the rest of a batch still runs.
    pub fn fix(&self, console: &mut Console<'_>) {
        let subject = self.subject();
        match self.apply() {
            Ok(Applied::Quarantined(Quarantined::Moved { to, pruned })) => {
                console.say(format!("moved {} to {}", subject, to.display()));
                for dir in pruned {
                    console.detail(format!("removed empty directory {}", dir.display()));
                }
            }
            Ok(Applied::Quarantined(Quarantined::AlreadyGone)) => {
                console.say(format!("{} is no longer present, nothing to move", subject));
            }
            Ok(Applied::Nothing) => {
                console.detail(format!("no automatic repair for {}", subject));
            }
            Err(e) => {
                tracing::error!(fix = %subject, error = %e, "repair failed");
                console.say(format!("repair failed for {}: {}", subject, e));
            }
        }
    }

    /// Short name for repair messages
    fn subject(&self) -> String {
        match self.path() {
            Some(path) => path.display().to_string(),
            None => "metadata store".to_string(),
        }
    }
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fix::OrphanedObject { path, kind, .. } => {
                let uuid = layout::uuid_from_dir(path.parent().unwrap_or(Path::new("")));
                let id = path
                    .file_stem()
                    .map(|s| s.to_string_lossy())
                    .unwrap_or_default();
                match kind {
                    OrphanKind::Object => write!(
                        f,
                        "orphaned object: {} version {} at {}",
                        uuid,
                        id,
                        path.display()
                    ),
                    OrphanKind::Multipart => write!(
                        f,
                        "orphaned multipart part: {} part {} at {}",
                        uuid,
                        id,
                        path.display()
                    ),
                    OrphanKind::Unknown => write!(f, "unexpected file: {}", path.display()),
                }
            }
            Fix::UnreadableDirectory { path, reason } => {
                write!(f, "cannot read directory: {}
{}", path.display(), reason)
            }
            Fix::OrphanedMetadata {
                object_id,
                id,
                path,
            } => write!(
                f,
                "orphaned metadata: object {} version {} has no data at {}",
                object_id,
                id,
                path.display()
            ),
            Fix::SizeMismatch {
                path,
                actual,
                expected,
            } => write!(
                f,
                "object data integrity check failed: {}\nsize mismatch (got {}, expected {})",
                path.display(),
                actual,
                expected
            ),
            Fix::SchemaVersionMismatch { found, expected } => write!(
                f,
                "wrong metadata schema version: {}; expected: {}",
                found, expected
            ),
            Fix::SchemaVersionUnreadable { expected, reason } => write!(
                f,
                "cannot read metadata schema version (expected {}): {}",
                expected, reason
            ),
            Fix::MetadataCorrupt { diagnostics } => {
                write!(f, "database integrity check failed:")?;
                for d in diagnostics {
                    write!(f, "\n- {}", d)?;
                }
                Ok(())
            }
        }
    }
}
