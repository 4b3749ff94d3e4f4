//! Trait definitions for the repository storage system.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::Result;
use crate::models::{ExtensionRepo, RepoSnapshot};

/// Persistent collection of extension repositories.
///
/// Both `base_url` and `fingerprint` are unique keys. Implementations must
/// never overwrite a record as a side effect of [`RepoStorage::insert`], and
/// must republish the full collection to subscribers after each successful
/// mutation.
#[async_trait]
pub trait RepoStorage: Send + Sync {
    // === Mutations ===

    /// Insert a new repository.
    ///
    /// Fails with [`StorageError::Conflict`](crate::StorageError::Conflict)
    /// if either unique key is already present. The error does not identify
    /// which one.
    async fn insert(&self, repo: &ExtensionRepo) -> Result<()>;

    /// Insert a repository or overwrite the record with the same base url.
    ///
    /// Fails with a conflict if the fingerprint is held by a record with a
    /// different base url.
    async fn upsert(&self, repo: &ExtensionRepo) -> Result<()>;

    /// Replace the record holding `repo.fingerprint` with `repo`.
    ///
    /// The base url may change. Fails with `NotFound` if no record holds the
    /// fingerprint and with a conflict if the new base url belongs to
    /// another record.
    async fn replace(&self, repo: &ExtensionRepo) -> Result<()>;

    /// Delete a repository by base url.
    ///
    /// # Returns
    /// `true` if a record was removed, `false` if none existed
    async fn delete(&self, base_url: &str) -> Result<bool>;

    // === Queries ===

    async fn get_by_base_url(&self, base_url: &str) -> Result<Option<ExtensionRepo>>;

    async fn get_by_fingerprint(&self, fingerprint: &str) -> Result<Option<ExtensionRepo>>;

    /// All stored repositories, sorted by base url.
    async fn list(&self) -> Result<RepoSnapshot>;

    async fn count(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }

    /// Live view of the collection.
    ///
    /// The receiver always holds the latest full snapshot.
    fn subscribe(&self) -> watch::Receiver<RepoSnapshot>;
}
