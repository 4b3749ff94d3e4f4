//! Filesystem-based storage backend implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::error::{Result, StorageError};
use crate::models::{ExtensionRepo, RepoSnapshot};
use crate::table::RepoTable;
use crate::traits::RepoStorage;

const DOCUMENT_VERSION: &str = "1.0";

/// Filesystem-based storage backend.
///
/// Repositories live in a single JSON document inside `root_path`. Every
/// mutation rewrites the document after copying the previous one aside:
///
/// ```text
/// root_path/
/// +-- repos.json
/// +-- repos.json.backup
/// ```
#[derive(Debug)]
pub struct FilesystemRepoStorage {
    document_path: PathBuf,
    backup_path: PathBuf,
    table: Mutex<RepoTable>,
    snapshot: watch::Sender<RepoSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RepoDocument {
    version: String,
    repos: RepoTable,
}

impl FilesystemRepoStorage {
    /// Open (or create) the storage rooted at `root_path`.
    pub async fn open<P: AsRef<Path>>(root_path: P) -> Result<Self> {
        let root_path = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root_path)
            .await
            .map_err(|e| StorageError::backend("create storage directory", e))?;

        let document_path = root_path.join("repos.json");
        let backup_path = root_path.join("repos.json.backup");
        let (table, restored) = load_table(&document_path, &backup_path).await?;
        let (snapshot, _) = watch::channel(table.snapshot());

        let storage = Self {
            document_path,
            backup_path,
            table: Mutex::new(table),
            snapshot,
        };
        if restored {
            // The primary document is unreadable; overwrite it from the backup
            // so the next save does not copy it over the only good version.
            let table = storage.table.lock().await.clone();
            storage.write_document(&table).await?;
        }
        Ok(storage)
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    /// Apply `f` to a copy of the table and commit it only once it is on disk.
    async fn mutate<T>(&self, f: impl FnOnce(&mut RepoTable) -> Result<T>) -> Result<T> {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        let value = f(&mut next)?;

        self.save(&next).await?;
        *table = next;
        self.snapshot.send_replace(table.snapshot());
        Ok(value)
    }

    async fn save(&self, table: &RepoTable) -> Result<()> {
        if fs::try_exists(&self.document_path).await.unwrap_or(false) {
            if let Err(e) = fs::copy(&self.document_path, &self.backup_path).await {
                warn!("Failed to create backup: {}", e);
            }
        }

        self.write_document(table).await
    }

    async fn write_document(&self, table: &RepoTable) -> Result<()> {
        let document = RepoDocument {
            version: DOCUMENT_VERSION.to_string(),
            repos: table.clone(),
        };
        let content = serde_json::to_string_pretty(&document)
            .map_err(|e| StorageError::backend("serialize repositories", e))?;

        fs::write(&self.document_path, content)
            .await
            .map_err(|e| StorageError::backend("write repositories", e))?;
        debug!("Saved {} repositories", table.len());
        Ok(())
    }
}

/// Load the table, returning `true` alongside it when it came from the backup.
async fn load_table(document_path: &Path, backup_path: &Path) -> Result<(RepoTable, bool)> {
    if !fs::try_exists(document_path).await.unwrap_or(false) {
        info!("No existing repository document, starting empty");
        return Ok((RepoTable::default(), false));
    }

    match read_document(document_path).await {
        Ok(document) => {
            debug!("Loaded {} repositories", document.repos.len());
            Ok((document.repos, false))
        }
        Err(primary) => {
            warn!("Failed to load repositories ({}), checking backup", primary);
            if !fs::try_exists(backup_path).await.unwrap_or(false) {
                return Err(primary);
            }
            let document = read_document(backup_path).await?;
            info!("Restored {} repositories from backup", document.repos.len());
            Ok((document.repos, true))
        }
    }
}

async fn read_document(path: &Path) -> Result<RepoDocument> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::backend("read repositories", e))?;

    serde_json::from_str(&content).map_err(|e| StorageError::Corrupted {
        message: format!("{}: {}", path.display(), e),
        source: Some(e.into()),
    })
}

#[async_trait]
impl RepoStorage for FilesystemRepoStorage {
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
        if self.table.lock().await.get_by_base_url(base_url).is_none() {
            return Ok(false);
        }
        self.mutate(|table| Ok(table.delete(base_url))).await
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
