//! In-memory table shared by the storage backends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};
use crate::models::{ExtensionRepo, RepoSnapshot};

/// Repositories keyed by base url, enforcing fingerprint uniqueness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ExtensionRepo>", into = "Vec<ExtensionRepo>")]
pub(crate) struct RepoTable {
    repos: BTreeMap<String, ExtensionRepo>,
}

impl RepoTable {
    pub fn get_by_base_url(&self, base_url: &str) -> Option<&ExtensionRepo> {
        self.repos.get(base_url)
    }

    pub fn get_by_fingerprint(&self, fingerprint: &str) -> Option<&ExtensionRepo> {
        self.repos.values().find(|r| r.fingerprint == fingerprint)
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn snapshot(&self) -> RepoSnapshot {
        self.repos.values().cloned().collect()
    }

    pub fn insert(&mut self, repo: &ExtensionRepo) -> Result<()> {
        if self.repos.contains_key(&repo.base_url)
            || self.get_by_fingerprint(&repo.fingerprint).is_some()
        {
            return Err(StorageError::Conflict {
                base_url: repo.base_url.clone(),
            });
        }

        self.repos.insert(repo.base_url.clone(), repo.clone());
        Ok(())
    }

    pub fn upsert(&mut self, repo: &ExtensionRepo) -> Result<()> {
        if self
            .get_by_fingerprint(&repo.fingerprint)
            .is_some_and(|other| other.base_url != repo.base_url)
        {
            return Err(StorageError::Conflict {
                base_url: repo.base_url.clone(),
            });
        }

        self.repos.insert(repo.base_url.clone(), repo.clone());
        Ok(())
    }

    pub fn replace(&mut self, repo: &ExtensionRepo) -> Result<()> {
        let old_base_url = self
            .get_by_fingerprint(&repo.fingerprint)
            .map(|old| old.base_url.clone())
            .ok_or_else(|| StorageError::NotFound {
                fingerprint: repo.fingerprint.clone(),
            })?;

        if old_base_url != repo.base_url && self.repos.contains_key(&repo.base_url) {
            return Err(StorageError::Conflict {
                base_url: repo.base_url.clone(),
            });
        }

        self.repos.remove(&old_base_url);
        self.repos.insert(repo.base_url.clone(), repo.clone());
        Ok(())
    }

    pub fn delete(&mut self, base_url: &str) -> bool {
        self.repos.remove(base_url).is_some()
    }
}

/// Rebuilds a table from stored records, rejecting a repeated base url or
/// fingerprint.
impl TryFrom<Vec<ExtensionRepo>> for RepoTable {
    type Error = StorageError;

    fn try_from(repos: Vec<ExtensionRepo>) -> Result<Self> {
        let mut table = Self::default();
        for repo in &repos {
            table.insert(repo).map_err(|_| StorageError::Corrupted {
                message: format!(
                    "duplicate repository {} (fingerprint {})",
                    repo.base_url, repo.fingerprint
                ),
                source: None,
            })?;
        }
        Ok(table)
    }
}

impl From<RepoTable> for Vec<ExtensionRepo> {
    fn from(table: RepoTable) -> Self {
        table.repos.into_values().collect()
    }
}
