//! On-disk object layout
//!
//! Object files live under a two-level shard derived from the object UUID:
//!
//! ```text
//! 353e5262-d525-42bd-a43a-876a0938b484, version 3
//!   -> 35/3e/5262-d525-42bd-a43a-876a0938b484/3.v
//! ```
//!
//! Versions end in `.v`, multipart parts in `.p`. This module is the only
//! place that knows the mapping; every check goes through it.

use std::path::{Component, Path, PathBuf};

/// Extension of versioned object files
pub const VERSION_SUFFIX: &str = "v";

/// Extension of multipart part files
pub const PART_SUFFIX: &str = "p";

/// Width (in characters) of each shard level
const SHARD_WIDTH: usize = 2;

/// What a file under the shard tree is expected to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFile {
    /// `<id>.v`, keyed by `versioned_objects.id`
    Version(i64),
    /// `<id>.p`, keyed by `multiparts_parts.id`
    Part(i64),
}

impl ObjectFile {
    pub fn id(&self) -> i64 {
        match self {
            ObjectFile::Version(id) | ObjectFile::Part(id) => *id,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            ObjectFile::Version(_) => VERSION_SUFFIX,
            ObjectFile::Part(_) => PART_SUFFIX,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id(), self.suffix())
    }
}

/// Split a UUID into its shard directories: `[0,2)`, `[2,4)` and the rest.
///
/// Splitting is by character, so short or odd identifiers yield short or
/// empty segments instead of panicking.
pub fn shard_segments(uuid: &str) -> (&str, &str, &str) {
    let first = char_offset(uuid, SHARD_WIDTH);
    let second = first + char_offset(&uuid[first..], SHARD_WIDTH);
    (&uuid[..first], &uuid[first..second], &uuid[second..])
}

fn char_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

/// Directory (relative to the volume root) holding every file of `uuid`
pub fn object_dir(uuid: &str) -> PathBuf {
    let (first, second, rest) = shard_segments(uuid);
    let mut dir = PathBuf::new();
    for segment in [first, second, rest] {
        if !segment.is_empty() {
            dir.push(segment);
        }
    }
    dir
}

/// Relative path of an object file
pub fn object_path(uuid: &str, file: ObjectFile) -> PathBuf {
    object_dir(uuid).join(file.file_name())
}

pub fn version_path(uuid: &str, id: i64) -> PathBuf {
    object_path(uuid, ObjectFile::Version(id))
}

pub fn part_path(uuid: &str, id: i64) -> PathBuf {
    object_path(uuid, ObjectFile::Part(id))
}

/// Reconstruct the UUID from a relative shard directory by concatenating
/// its components (`35/3e/5262-...` -> `353e5262-...`).
pub fn uuid_from_dir(dir: &Path) -> String {
    dir.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect()
}

/// Suffix of a `<digits>.v` or `<digits>.p` name, however large the number
pub fn object_suffix(file_name: &str) -> Option<&'static str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match ext {
        VERSION_SUFFIX => Some(VERSION_SUFFIX),
        PART_SUFFIX => Some(PART_SUFFIX),
        _ => None,
    }
}

/// Classify a file name. `None` means no naming convention matches it, or
/// the number does not fit a row id.
pub fn classify(file_name: &str) -> Option<ObjectFile> {
    let suffix = object_suffix(file_name)?;
    let (stem, _) = file_name.rsplit_once('.')?;
    let id: i64 = stem.parse().ok()?;
    match suffix {
        VERSION_SUFFIX => Some(ObjectFile::Version(id)),
        _ => Some(ObjectFile::Part(id)),
    }
}
