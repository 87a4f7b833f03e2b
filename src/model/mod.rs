//! Mapping document loading and metadata saving
//!
//! Provides file-level operations for reading mapping documents and index
//! snapshots, and for writing mocked metadata.

pub mod loader;
pub mod saver;

pub use loader::{DocumentFormat, DocumentLoadResult, DocumentLoader};
pub use saver::MetadataSaver;
