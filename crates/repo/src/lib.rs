//! Shelf Repo - Extension repository registration and management
//!
//! This crate manages the list of extension repositories a user has added.
//! A repository is identified by the base url of its extension index and
//! verified by the fingerprint of its signing key.
//!
//! # Features
//!
//! - **Registration**: validate an index url, fetch the `repo.json` manifest
//!   next to it and store the repository, reporting conflicts precisely
//! - **Refresh**: re-fetch stored manifests and accept them only when signed
//!   by the same key
//! - **Screen model**: observable list state, dialogs and one-shot events for
//!   a repository list screen
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shelf_repo::{ApiConfig, CreateRepoResult, RepoInteractors, ReqwestRepoApi};
//! use shelf_storage::MemoryRepoStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = Arc::new(MemoryRepoStorage::new());
//! let api = Arc::new(ReqwestRepoApi::new(&ApiConfig::default())?);
//! let interactors = RepoInteractors::new(storage, api);
//!
//! match interactors.create.create("https://example.com/index.min.json").await {
//!     CreateRepoResult::Success => println!("Added"),
//!     other => println!("Not added: {:?}", other),
//! }
//! # Ok(())
//! # }
//! ```
pub mod api;
pub mod error;
pub mod interactor;
pub mod repo_url;
pub mod screen;

pub use api::{ApiConfig, RepoApi, ReqwestRepoApi, parse_repo_manifest};
pub use error::{ApiError, Result};
pub use interactor::{
    CreateExtensionRepo, CreateRepoResult, DeleteExtensionRepo, GetExtensionRepo,
    GetExtensionRepoCount, RefreshOutcome, ReplaceExtensionRepo, RepoInteractors,
    UpdateExtensionRepo,
};
pub use screen::{ExtensionReposModel, RepoDialog, RepoEvent, RepoScreenState};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
