//! Shared fakes for the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use shelf_repo::{ApiError, RepoApi, RepoInteractors, parse_repo_manifest};
use shelf_storage::{ExtensionRepo, MemoryRepoStorage, RepoSnapshot, RepoStorage, StorageError};
use tokio::sync::watch;

/// Manifest api backed by a map of base url to `repo.json` body.
#[derive(Default)]
pub struct FakeRepoApi {
    manifests: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl FakeRepoApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, base_url: &str, body: impl Into<String>) {
        self.manifests
            .lock()
            .unwrap()
            .insert(base_url.to_string(), body.into());
    }

    pub fn serve_repo(&self, base_url: &str, name: &str, fingerprint: &str) {
        self.serve(base_url, manifest_json(name, fingerprint));
    }

    pub fn take_offline(&self, base_url: &str) {
        self.manifests.lock().unwrap().remove(base_url);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepoApi for FakeRepoApi {
    async fn fetch_repo_details(&self, base_url: &str) -> Result<ExtensionRepo, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = self.manifests.lock().unwrap().get(base_url).cloned();
        match body {
            Some(body) => parse_repo_manifest(base_url, body.as_bytes()),
            None => Err(ApiError::ResponseError { status: 404 }),
        }
    }
}

pub fn manifest_json(name: &str, fingerprint: &str) -> String {
    serde_json::json!({
        "meta": {
            "name": name,
            "website": format!("https://{}.example.org", name.to_lowercase()),
            "signingKeyFingerprint": fingerprint,
        }
    })
    .to_string()
}

/// Storage wrapper that counts lookups, to observe conflict diagnosis.
pub struct CountingStorage {
    inner: MemoryRepoStorage,
    pub base_url_reads: AtomicUsize,
    pub fingerprint_reads: AtomicUsize,
}

impl CountingStorage {
    pub fn new(inner: MemoryRepoStorage) -> Self {
        Self {
            inner,
            base_url_reads: AtomicUsize::new(0),
            fingerprint_reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RepoStorage for CountingStorage {
    async fn insert(&self, repo: &ExtensionRepo) -> shelf_storage::Result<()> {
        self.inner.insert(repo).await
    }

    async fn upsert(&self, repo: &ExtensionRepo) -> shelf_storage::Result<()> {
        self.inner.upsert(repo).await
    }

    async fn replace(&self, repo: &ExtensionRepo) -> shelf_storage::Result<()> {
        self.inner.replace(repo).await
    }

    async fn delete(&self, base_url: &str) -> shelf_storage::Result<bool> {
        self.inner.delete(base_url).await
    }

    async fn get_by_base_url(&self, base_url: &str) -> shelf_storage::Result<Option<ExtensionRepo>> {
        self.base_url_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_base_url(base_url).await
    }

    async fn get_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> shelf_storage::Result<Option<ExtensionRepo>> {
        self.fingerprint_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_fingerprint(fingerprint).await
    }

    async fn list(&self) -> shelf_storage::Result<RepoSnapshot> {
        self.inner.list().await
    }

    fn subscribe(&self) -> watch::Receiver<RepoSnapshot> {
        self.inner.subscribe()
    }
}

/// How [`FailingStorage`] rejects every insert.
#[derive(Clone, Copy)]
pub enum InsertFailure {
    /// Report a conflict that neither lookup can explain.
    UnexplainedConflict,
    /// Fail with a backend error.
    Backend,
}

/// Storage whose inserts always fail; everything else goes to an empty
/// in-memory backend.
pub struct FailingStorage {
    inner: MemoryRepoStorage,
    failure: InsertFailure,
}

impl FailingStorage {
    pub fn new(failure: InsertFailure) -> Self {
        Self {
            inner: MemoryRepoStorage::new(),
            failure,
        }
    }
}

#[async_trait]
impl RepoStorage for FailingStorage {
    async fn insert(&self, repo: &ExtensionRepo) -> shelf_storage::Result<()> {
        Err(match self.failure {
            InsertFailure::UnexplainedConflict => StorageError::Conflict {
                base_url: repo.base_url.clone(),
            },
            InsertFailure::Backend => {
                StorageError::backend("write repositories", std::io::Error::other("disk full"))
            }
        })
    }

    async fn upsert(&self, repo: &ExtensionRepo) -> shelf_storage::Result<()> {
        self.inner.upsert(repo).await
    }

    async fn replace(&self, repo: &ExtensionRepo) -> shelf_storage::Result<()> {
        self.inner.replace(repo).await
    }

    async fn delete(&self, base_url: &str) -> shelf_storage::Result<bool> {
        self.inner.delete(base_url).await
    }

    async fn get_by_base_url(&self, base_url: &str) -> shelf_storage::Result<Option<ExtensionRepo>> {
        self.inner.get_by_base_url(base_url).await
    }

    async fn get_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> shelf_storage::Result<Option<ExtensionRepo>> {
        self.inner.get_by_fingerprint(fingerprint).await
    }

    async fn list(&self) -> shelf_storage::Result<RepoSnapshot> {
        self.inner.list().await
    }

    fn subscribe(&self) -> watch::Receiver<RepoSnapshot> {
        self.inner.subscribe()
    }
}

pub fn interactors(
    storage: Arc<dyn RepoStorage>,
    api: Arc<FakeRepoApi>,
) -> RepoInteractors {
    RepoInteractors::new(storage, api)
}
