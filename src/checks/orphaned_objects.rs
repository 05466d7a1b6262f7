//! Orphaned objects: files on disk that no metadata row accounts for
//!
//! The shard tree is walked depth-first with an explicit stack. Every file
//! is classified by name (`<id>.v` version, `<id>.p` multipart part,
//! anything else unexpected) and looked up in the metadata store under the
//! UUID its directory encodes. Unaccounted versions and parts are moved to
//! the quarantine tree on repair; unexpected files are only reported.

use crate::checks::{Fatality, Fix, OrphanKind, Outcome, Verifiable};
use crate::common::{Console, Error, Result};
use crate::metadata::MetadataStore;
use crate::volume::layout::{self, ObjectFile};
use crate::volume::Volume;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

pub struct OrphanedObjectsCheck<'a> {
    volume: &'a Volume,
    store: &'a MetadataStore,
}

impl<'a> OrphanedObjectsCheck<'a> {
    pub fn new(volume: &'a Volume, store: &'a MetadataStore) -> Self {
        Self { volume, store }
    }

    /// `None` if the file is accounted for
    fn classify(&self, relative: &Path) -> Result<Option<OrphanKind>> {
        let uuid = layout::uuid_from_dir(relative.parent().unwrap_or(Path::new("")));
        let name = relative.file_name().and_then(|n| n.to_str());

        let kind = match name.and_then(layout::classify) {
            Some(ObjectFile::Version(id)) => {
                (self.store.count_versioned_objects(&uuid, id)? == 0).then_some(OrphanKind::Object)
            }
            Some(ObjectFile::Part(id)) => {
                (self.store.count_multipart_parts(&uuid, id)? == 0).then_some(OrphanKind::Multipart)
            }
            // Too large for a row id, so nothing can reference it.
            None => match name.and_then(layout::object_suffix) {
                Some(layout::VERSION_SUFFIX) => Some(OrphanKind::Object),
                Some(layout::PART_SUFFIX) => Some(OrphanKind::Multipart),
                _ => Some(OrphanKind::Unknown),
            },
        };
        Ok(kind)
    }

    fn orphan_fix(&self, relative: PathBuf, kind: OrphanKind) -> Fix {
        Fix::OrphanedObject {
            root: self.volume.root().to_path_buf(),
            quarantine: self.volume.quarantine_root(),
            path: relative,
            kind,
        }
    }
}

impl Verifiable for OrphanedObjectsCheck<'_> {
    fn name(&self) -> &'static str {
        "orphaned objects"
    }

    fn fatality(&self) -> Fatality {
        Fatality::NonFatal
    }

    fn run(&self, console: &mut Console<'_>) -> Result<Outcome> {
        let root = self.volume.root();
        let mut fixes = Vec::new();

        // Top-level files (the metadata store and its journals) are not
        // object data; only directories seed the walk.
        let mut stack: Vec<PathBuf> = sorted_entries(root)?
            .into_iter()
            .filter(|entry| entry.file_name() != self.volume.quarantine_name())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|entry| entry.path())
            .rev()
            .collect();

        while let Some(dir) = stack.pop() {
            let mut subdirs = Vec::new();

            let entries = match sorted_entries(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "cannot list directory, skipping it");
                    let path = dir.strip_prefix(root).unwrap_or(dir.as_path()).to_path_buf();
                    fixes.push(Fix::UnreadableDirectory {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for entry in entries {
                let path = entry.path();
                let file_type = entry.file_type().map_err(|e| Error::io_at(&path, e))?;
                // Symlinks are not followed, so they are judged by name like files.
                if file_type.is_dir() {
                    subdirs.push(path);
                    continue;
                }

                let relative = path
                    .strip_prefix(root)
                    .map_err(|_| {
                        Error::Internal(format!("{} escaped the volume root", path.display()))
                    })?
                    .to_path_buf();
                console.detail(format!("checking file {}", relative.display()));

                if let Some(kind) = self.classify(&relative)? {
                    tracing::debug!(path = %relative.display(), ?kind, "orphan found");
                    fixes.push(self.orphan_fix(relative, kind));
                }
            }

            // Reversed so the walk pops directories in name order.
            stack.extend(subdirs.into_iter().rev());
        }

        Ok(Outcome::from_fixes(fixes))
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .and_then(|it| it.collect::<std::io::Result<Vec<_>>>())
        .map_err(|e| Error::io_at(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}
