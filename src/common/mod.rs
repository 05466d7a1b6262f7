//! Common utilities and types shared across volume-fsck

pub mod config;
pub mod console;
pub mod error;

pub use config::FsckConfig;
pub use console::{Console, Verbosity};
pub use error::{Error, Result};
