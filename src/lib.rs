//! # volume-fsck
//!
//! Offline consistency checker for object-storage volumes:
//! - object data sharded by UUID under the volume root
//! - a SQLite metadata store describing every object version and
//!   multipart part
//! - optional repair that moves unexplained files to `lost+found`
//!
//! ## Architecture

#![allow(clippy::result_large_err)]
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │               CheckSuite                  │
//! │  schema version → metadata integrity →    │
//! │  orphaned objects → orphaned metadata →   │
//! │  object integrity                         │
//! └──────────┬─────────────────────┬──────────┘
//!            │                     │
//!   ┌────────▼────────┐   ┌────────▼─────────┐
//!   │  MetadataStore  │   │     Volume       │
//!   │  (s3gw.db)      │   │  ab/cd/<rest>/   │
//!   │  rows, pragmas  │   │    <id>.v <id>.p │
//!   └─────────────────┘   │  lost+found/     │
//!                         └──────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Report only
//! volume-fsck /var/lib/s3gw
//!
//! # Quarantine orphaned objects
//! volume-fsck --fix /var/lib/s3gw
//!
//! # Per-file detail; exit status only
//! volume-fsck --verbose /var/lib/s3gw
//! volume-fsck --quiet /var/lib/s3gw
//! ```
//!
//! ```no_run
//! use volume_fsck::{run_checks, Verbosity};
//!
//! if !run_checks("/var/lib/s3gw".as_ref(), Verbosity::Normal, false)? {
//!     eprintln!("volume is inconsistent");
//! }
//! # Ok::<(), volume_fsck::Error>(())
//! ```

pub mod checks;
pub mod common;
pub mod metadata;
pub mod volume;

// Re-export commonly used types
pub use checks::{run_checks, CheckSuite, Fix, SuiteReport};
pub use common::{Console, Error, FsckConfig, Result, Verbosity};
pub use metadata::MetadataStore;
pub use volume::Volume;

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
