//! Process-local storage backend.

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use crate::error::Result;
use crate::models::{ExtensionRepo, RepoSnapshot};
use crate::table::RepoTable;
use crate::traits::RepoStorage;

/// Storage backend that keeps repositories in memory only.
#[derive(Debug)]
pub struct MemoryRepoStorage {
    table: Mutex<RepoTable>,
    snapshot: watch::Sender<RepoSnapshot>,
}

impl Default for MemoryRepoStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepoStorage {
    pub fn new() -> Self {
        Self::from_table(RepoTable::default())
    }

    /// Create a backend pre-populated with `repos`.
    ///
    /// Fails with [`StorageError::Corrupted`](crate::StorageError::Corrupted)
    /// when two records share a base url or a fingerprint.
    pub fn with_repos(repos: Vec<ExtensionRepo>) -> Result<Self> {
        Ok(Self::from_table(RepoTable::try_from(repos)?))
    }

    fn from_table(table: RepoTable) -> Self {
        let (snapshot, _) = watch::channel(table.snapshot());
        Self {
            table: Mutex::new(table),
            snapshot,
        }
    }

    async fn mutate<T>(&self, f: impl FnOnce(&mut RepoTable) -> Result<T>) -> Result<T> {
        let mut table = self.table.lock().await;
        let value = f(&mut table)?;
        self.snapshot.send_replace(table.snapshot());
        Ok(value)
    }
}

#[async_trait]
impl RepoStorage for MemoryRepoStorage {
    async fn insert(&self, repo: &ExtensionRepo) -> Result<()> {
        self.mutate(|table| table.insert(repo)).await
    }

    async fn upsert(&self, repo: &ExtensionRepo) -> Result<()> {
        self.mutate(|table| table.upsert(repo)).await
    }

    async fn replace(&self, repo: &ExtensionRepo) -> Result<()> {
        self.mutate(|table| table.replace(repo)).await
    }

    async fn delete(&self, base_url: &str) -> Result<bool> {
        let mut table = self.table.lock().await;
        let removed = table.delete(base_url);
        if removed {
            self.snapshot.send_replace(table.snapshot());
        }
        Ok(removed)
    }

    async fn get_by_base_url(&self, base_url: &str) -> Result<Option<ExtensionRepo>> {
        Ok(self.table.lock().await.get_by_base_url(base_url).cloned())
    }

    async fn get_by_fingerprint(&self, fingerprint: &str) -> Result<Option<ExtensionRepo>> {
        Ok(self.table.lock().await.get_by_fingerprint(fingerprint).cloned())
    }

    async fn list(&self) -> Result<RepoSnapshot> {
        Ok(self.table.lock().await.snapshot())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.table.lock().await.len())
    }

    fn subscribe(&self) -> watch::Receiver<RepoSnapshot> {
        self.snapshot.subscribe()
    }
}
