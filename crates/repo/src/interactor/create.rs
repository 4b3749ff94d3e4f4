use std::sync::Arc;

use shelf_storage::{ExtensionRepo, RepoStorage};
use tracing::{debug, info, warn};

use crate::api::RepoApi;
use crate::repo_url::base_url_from_index;

/// Outcome of registering a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateRepoResult {
    Success,
    /// The url has the wrong shape, or its manifest could not be fetched or parsed.
    InvalidUrl,
    RepoAlreadyExists,
    /// Another stored repository is signed with the same key.
    DuplicateFingerprint {
        existing: ExtensionRepo,
        attempted: ExtensionRepo,
    },
    /// Storage failed for a reason other than a recognisable conflict.
    Error,
}

/// Registers a repository from the url of its extension index.
#[derive(Clone)]
pub struct CreateExtensionRepo {
    storage: Arc<dyn RepoStorage>,
    api: Arc<dyn RepoApi>,
}

impl CreateExtensionRepo {
    pub fn new(storage: Arc<dyn RepoStorage>, api: Arc<dyn RepoApi>) -> Self {
        Self { storage, api }
    }

    /// Validate `repo_url`, fetch the manifest next to it and store the result.
    ///
    /// Makes no network call when the url is rejected.
    pub async fn create(&self, repo_url: &str) -> CreateRepoResult {
        let Some(base_url) = base_url_from_index(repo_url) else {
            debug!("Rejected repository url {:?}", repo_url);
            return CreateRepoResult::InvalidUrl;
        };

        match self.api.fetch_repo_details(base_url).await {
            Ok(repo) => self.insert(repo).await,
            Err(e) => {
                warn!("Failed to fetch repository details for {}: {}", base_url, e);
                CreateRepoResult::InvalidUrl
            }
        }
    }

    async fn insert(&self, repo: ExtensionRepo) -> CreateRepoResult {
        match self.storage.insert(&repo).await {
            Ok(()) => {
                info!("Added repository {}", repo);
                CreateRepoResult::Success
            }
            Err(e) if e.is_conflict() => {
                warn!(
                    "Conflict attempting to add new repository {}: {}",
                    repo.base_url, e
                );
                self.diagnose_conflict(repo).await
            }
            Err(e) => {
                warn!("Failed to store repository {}: {}", repo.base_url, e);
                CreateRepoResult::Error
            }
        }
    }

    /// Storage only reports that some unique key collided, so check the base
    /// url first and the fingerprint second.
    async fn diagnose_conflict(&self, repo: ExtensionRepo) -> CreateRepoResult {
        match self.storage.get_by_base_url(&repo.base_url).await {
            Ok(Some(_)) => return CreateRepoResult::RepoAlreadyExists,
            Ok(None) => {}
            Err(e) => {
                warn!("Lookup of {} failed: {}", repo.base_url, e);
                return CreateRepoResult::Error;
            }
        }

        match self.storage.get_by_fingerprint(&repo.fingerprint).await {
            Ok(Some(existing)) => CreateRepoResult::DuplicateFingerprint {
                existing,
                attempted: repo,
            },
            Ok(None) => CreateRepoResult::Error,
            Err(e) => {
                warn!("Lookup of fingerprint {} failed: {}", repo.fingerprint, e);
                CreateRepoResult::Error
            }
        }
    }
}
