use std::sync::Arc;

use futures::future::join_all;
use shelf_storage::{ExtensionRepo, RepoStorage, Result};
use tracing::{debug, info, warn};

use crate::api::RepoApi;

/// Result of re-validating one stored repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fresh metadata was written.
    Updated,
    /// The manifest matches what is stored.
    Unchanged,
    /// The manifest could not be fetched or parsed; the record is kept.
    Unreachable,
    /// The manifest is signed by a different key; the record is kept.
    FingerprintMismatch { stored: String, fetched: String },
    /// Writing the fresh metadata failed.
    Failed,
}

impl RefreshOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, RefreshOutcome::Updated | RefreshOutcome::Unchanged)
    }
}

/// Re-fetches stored repositories and keeps their metadata current.
#[derive(Clone)]
pub struct UpdateExtensionRepo {
    storage: Arc<dyn RepoStorage>,
    api: Arc<dyn RepoApi>,
}

impl UpdateExtensionRepo {
    pub fn new(storage: Arc<dyn RepoStorage>, api: Arc<dyn RepoApi>) -> Self {
        Self { storage, api }
    }

    /// Refresh a single repository.
    ///
    /// Metadata is only accepted when it is signed by the stored key, or when
    /// the stored key is a legacy placeholder.
    pub async fn update(&self, repo: &ExtensionRepo) -> RefreshOutcome {
        let fetched = match self.api.fetch_repo_details(&repo.base_url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("Failed to refresh repository {}: {}", repo.base_url, e);
                return RefreshOutcome::Unreachable;
            }
        };

        if fetched == *repo {
            debug!("Repository {} is up to date", repo.base_url);
            return RefreshOutcome::Unchanged;
        }

        if fetched.fingerprint != repo.fingerprint && !repo.has_placeholder_fingerprint() {
            warn!(
                "Repository {} is now signed by {} instead of {}",
                repo.base_url, fetched.fingerprint, repo.fingerprint
            );
            return RefreshOutcome::FingerprintMismatch {
                stored: repo.fingerprint.clone(),
                fetched: fetched.fingerprint,
            };
        }

        match self.storage.upsert(&fetched).await {
            Ok(()) => {
                info!("Refreshed repository {}", fetched);
                RefreshOutcome::Updated
            }
            Err(e) => {
                warn!("Failed to save refreshed repository {}: {}", repo.base_url, e);
                RefreshOutcome::Failed
            }
        }
    }

    /// Refresh every stored repository concurrently.
    ///
    /// A failure on one repository does not affect the others.
    pub async fn update_all(&self) -> Result<Vec<(ExtensionRepo, RefreshOutcome)>> {
        let repos = self.storage.list().await?;
        let outcomes = join_all(repos.iter().map(|repo| self.update(repo))).await;
        Ok(repos.iter().cloned().zip(outcomes).collect())
    }
}
