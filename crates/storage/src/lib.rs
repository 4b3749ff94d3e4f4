//! Extension repository storage for the Shelf project.
//!
//! This crate provides a trait-based store for the list of extension
//! repositories a user has registered, with an in-memory backend and a
//! JSON file backend.

pub mod backends;
pub mod error;
pub mod models;
mod table;
pub mod traits;

pub use backends::{FilesystemRepoStorage, MemoryRepoStorage};
pub use error::{Result, StorageError};
pub use models::{ExtensionRepo, PLACEHOLDER_FINGERPRINT_PREFIX, RepoSnapshot};
pub use traits::RepoStorage;
