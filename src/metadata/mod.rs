//! Metadata store access
//!
//! The checker only reads metadata; no repair writes to the store.

pub mod rows;
pub mod store;

pub use rows::VersionedObjectRow;
pub use store::MetadataStore;
