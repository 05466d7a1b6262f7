//! Quarantine (lost+found) relocation
//!
//! Orphans are moved to `<root>/<quarantine>/<relative path>`, preserving the
//! shard layout, and the directories they leave behind are pruned back up
//! towards the volume root. An earlier quarantined copy at the same path is
//! never replaced; the newcomer gets a `.1`, `.2`, ... suffix instead.

use crate::common::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result of a quarantine move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quarantined {
    /// The file was moved to `to`; `pruned` lists removed empty directories
    Moved { to: PathBuf, pruned: Vec<PathBuf> },
    /// Nothing at the original path (already repaired, or removed since)
    AlreadyGone,
}

/// Move `relative` (a file under `root`) into the quarantine tree.
///
/// Safe to call repeatedly and after a sibling repair already pruned a
/// shared parent directory.
pub fn quarantine_file(root: &Path, quarantine: &Path, relative: &Path) -> Result<Quarantined> {
    let source = root.join(relative);
    match fs::symlink_metadata(&source) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Quarantined::AlreadyGone),
        Err(e) => return Err(Error::io_at(source, e)),
    }

    let wanted = quarantine.join(relative);
    if let Some(parent) = wanted.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))?;
    }
    let target = unused_path(wanted)?;
    fs::rename(&source, &target).map_err(|e| Error::io_at(&source, e))?;
    tracing::debug!(from = %source.display(), to = %target.display(), "moved to quarantine");

    let pruned = match source.parent() {
        Some(parent) => prune_empty_dirs(root, parent),
        None => Vec::new(),
    };

    Ok(Quarantined::Moved { to: target, pruned })
}

/// `path` itself if nothing is there, else the first free `path.N`
fn unused_path(path: PathBuf) -> Result<PathBuf> {
    let mut candidate = path.clone();
    for n in 1u32.. {
        match fs::symlink_metadata(&candidate) {
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(candidate),
            Err(e) => return Err(Error::io_at(candidate, e)),
            Ok(_) => {
                let mut name = path.clone().into_os_string();
                name.push(format!(".{}", n));
                candidate = PathBuf::from(name);
            }
        }
    }
    Err(Error::io_at(
        path,
        std::io::Error::new(ErrorKind::AlreadyExists, "no free quarantine name"),
    ))
}

/// Remove `start` and its ancestors while they are empty, stopping at (and
/// never removing) `root`. Errors end the walk and are logged, not returned.
pub fn prune_empty_dirs(root: &Path, start: &Path) -> Vec<PathBuf> {
    let mut pruned = Vec::new();
    let mut dir = start;

    while dir != root && dir.starts_with(root) {
        match fs::read_dir(dir) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    break;
                }
            }
            // An earlier repair already took it; keep climbing.
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot inspect directory, stopping cleanup");
                break;
            }
        }

        match fs::remove_dir(dir) {
            Ok(()) => pruned.push(dir.to_path_buf()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot remove empty directory, stopping cleanup");
                break;
            }
        }

        dir = match dir.parent() {
            Some(parent) => parent,
            None => break,
        };
    }

    pruned
}
