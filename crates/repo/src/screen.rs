//! State holder behind the repository list screen.
//!
//! [`ExtensionReposModel`] keeps an observable [`RepoScreenState`], runs each
//! user command as its own task and reports one-shot notifications through
//! an unbounded channel with a single consumer.

use std::sync::{Mutex, PoisonError};

use shelf_storage::{ExtensionRepo, RepoSnapshot};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::interactor::{CreateRepoResult, RefreshOutcome, RepoInteractors};

/// Dialog currently shown over the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoDialog {
    Create,
    Delete(String),
    /// Offer to replace `existing` with `attempted`, which shares its key.
    Conflict {
        existing: ExtensionRepo,
        attempted: ExtensionRepo,
    },
}

/// Notification meant to be shown once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoEvent {
    InvalidUrl,
    RepoAlreadyExists,
    /// A key conflict found before the list loaded, so no dialog could open.
    DuplicateFingerprint {
        existing: ExtensionRepo,
        attempted: ExtensionRepo,
    },
    FingerprintMismatch { base_url: String },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoScreenState {
    Loading,
    Loaded {
        repos: RepoSnapshot,
        dialog: Option<RepoDialog>,
    },
}

impl RepoScreenState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, RepoScreenState::Loaded { .. })
    }

    /// `true` while loading as well as for an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            RepoScreenState::Loading => true,
            RepoScreenState::Loaded { repos, .. } => repos.is_empty(),
        }
    }

    pub fn repos(&self) -> Option<&RepoSnapshot> {
        match self {
            RepoScreenState::Loading => None,
            RepoScreenState::Loaded { repos, .. } => Some(repos),
        }
    }

    pub fn dialog(&self) -> Option<&RepoDialog> {
        match self {
            RepoScreenState::Loading => None,
            RepoScreenState::Loaded { dialog, .. } => dialog.as_ref(),
        }
    }
}

/// Sets the dialog and returns whether it was applied; has no effect while loading.
fn set_dialog(state: &watch::Sender<RepoScreenState>, next: Option<RepoDialog>) -> bool {
    state.send_if_modified(|state| match state {
        RepoScreenState::Loading => false,
        RepoScreenState::Loaded { dialog, .. } => {
            *dialog = next;
            true
        }
    })
}

/// Open the conflict dialog, or report the conflict as an event if the list
/// is still loading.
fn offer_replacement(
    state: &watch::Sender<RepoScreenState>,
    existing: ExtensionRepo,
    attempted: ExtensionRepo,
) -> Option<RepoEvent> {
    let dialog = RepoDialog::Conflict {
        existing: existing.clone(),
        attempted: attempted.clone(),
    };
    if set_dialog(state, Some(dialog)) {
        return None;
    }
    Some(RepoEvent::DuplicateFingerprint {
        existing,
        attempted,
    })
}

/// Controller for the repository list screen.
///
/// Commands must be issued from within a Tokio runtime. Dropping the model
/// aborts every task it started.
pub struct ExtensionReposModel {
    interactors: RepoInteractors,
    state: watch::Sender<RepoScreenState>,
    events: mpsc::UnboundedSender<RepoEvent>,
    tasks: Mutex<JoinSet<()>>,
    subscription: JoinHandle<()>,
}

impl ExtensionReposModel {
    /// Create the model and start following the stored repositories.
    ///
    /// The returned receiver is the only consumer of [`RepoEvent`]s.
    pub fn new(interactors: RepoInteractors) -> (Self, mpsc::UnboundedReceiver<RepoEvent>) {
        let (state, _) = watch::channel(RepoScreenState::Loading);
        let (events, events_rx) = mpsc::unbounded_channel();

        let subscription = tokio::spawn(follow_repos(
            interactors.get.subscribe_all(),
            state.clone(),
        ));

        let model = Self {
            interactors,
            state,
            events,
            tasks: Mutex::new(JoinSet::new()),
            subscription,
        };
        (model, events_rx)
    }

    pub fn state(&self) -> watch::Receiver<RepoScreenState> {
        self.state.subscribe()
    }

    pub fn current_state(&self) -> RepoScreenState {
        self.state.borrow().clone()
    }

    pub fn show_dialog(&self, dialog: RepoDialog) {
        set_dialog(&self.state, Some(dialog));
    }

    pub fn dismiss_dialog(&self) {
        set_dialog(&self.state, None);
    }

    /// Register the repository whose index lives at `url`.
    pub fn create_repo(&self, url: &str) {
        let create = self.interactors.create.clone();
        let state = self.state.clone();
        let events = self.events.clone();
        let url = url.to_string();

        self.spawn(async move {
            let event = match create.create(&url).await {
                CreateRepoResult::Success => None,
                CreateRepoResult::InvalidUrl => Some(RepoEvent::InvalidUrl),
                CreateRepoResult::RepoAlreadyExists => Some(RepoEvent::RepoAlreadyExists),
                CreateRepoResult::DuplicateFingerprint { existing, attempted } => {
                    offer_replacement(&state, existing, attempted)
                }
                CreateRepoResult::Error => Some(RepoEvent::Failed),
            };

            if let Some(event) = event {
                // The receiver may be gone if the screen was closed.
                let _ = events.send(event);
            }
        });
    }

    /// Re-validate every repository currently shown, one task each.
    pub fn refresh_repos(&self) {
        let repos = match &*self.state.borrow() {
            RepoScreenState::Loading => return,
            RepoScreenState::Loaded { repos, .. } => repos.clone(),
        };
        info!("Refreshing {} repositories", repos.len());

        for repo in repos.iter().cloned() {
            let update = self.interactors.update.clone();
            let events = self.events.clone();

            self.spawn(async move {
                let event = match update.update(&repo).await {
                    RefreshOutcome::Updated | RefreshOutcome::Unchanged => None,
                    RefreshOutcome::Unreachable => Some(RepoEvent::InvalidUrl),
                    RefreshOutcome::FingerprintMismatch { .. } => {
                        Some(RepoEvent::FingerprintMismatch {
                            base_url: repo.base_url.clone(),
                        })
                    }
                    RefreshOutcome::Failed => Some(RepoEvent::Failed),
                };

                if let Some(event) = event {
                    let _ = events.send(event);
                }
            });
        }
    }

    pub fn delete_repo(&self, base_url: &str) {
        let delete = self.interactors.delete.clone();
        let events = self.events.clone();
        let base_url = base_url.to_string();

        self.spawn(async move {
            if let Err(e) = delete.delete(&base_url).await {
                warn!("Failed to delete repository {}: {}", base_url, e);
                let _ = events.send(RepoEvent::Failed);
            }
        });
    }

    /// Accept `repo` in place of the stored repository sharing its fingerprint.
    pub fn replace_repo(&self, repo: ExtensionRepo) {
        let replace = self.interactors.replace.clone();
        let state = self.state.clone();
        let events = self.events.clone();

        self.spawn(async move {
            match replace.replace(&repo).await {
                Ok(()) => {
                    set_dialog(&state, None);
                }
                Err(e) => {
                    warn!("Failed to replace repository {}: {}", repo.base_url, e);
                    let _ = events.send(RepoEvent::Failed);
                }
            }
        });
    }

    /// Wait until every command issued so far has finished.
    pub async fn settle(&self) {
        loop {
            let mut tasks = std::mem::take(&mut *self.lock_tasks());
            if tasks.is_empty() {
                return;
            }
            while let Some(result) = tasks.join_next().await {
                if let Err(e) = result {
                    warn!("Repository task did not complete: {}", e);
                }
            }
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.lock_tasks().spawn(task);
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ExtensionReposModel {
    fn drop(&mut self) {
        self.subscription.abort();
    }
}

/// Mirror every storage snapshot into the screen state, keeping the dialog.
async fn follow_repos(
    mut repos_rx: watch::Receiver<RepoSnapshot>,
    state: watch::Sender<RepoScreenState>,
) {
    loop {
        let repos = repos_rx.borrow_and_update().clone();
        debug!("Repository list now has {} entries", repos.len());

        state.send_modify(|state| {
            let dialog = match state {
                RepoScreenState::Loading => None,
                RepoScreenState::Loaded { dialog, .. } => dialog.take(),
            };
            *state = RepoScreenState::Loaded { repos, dialog };
        });

        if repos_rx.changed().await.is_err() {
            break;
        }
    }
}
