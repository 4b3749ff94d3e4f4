use eyre::{Result, eyre};
use shelf_repo::{
    ExtensionReposModel, RefreshOutcome, RepoDialog, RepoEvent, RepoInteractors, RepoScreenState,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::cli::RepoCommands;

pub async fn handle_repo_command(cmd: RepoCommands, interactors: RepoInteractors) -> Result<()> {
    match cmd {
        RepoCommands::Add { url, replace } => handle_add(interactors, &url, replace).await,
        RepoCommands::List => handle_list(interactors).await,
        RepoCommands::Remove { base_url } => handle_remove(interactors, &base_url).await,
        RepoCommands::Refresh => handle_refresh(interactors).await,
        RepoCommands::Count => {
            println!("{}", interactors.count.count().await?);
            Ok(())
        }
    }
}

async fn open_model(
    interactors: RepoInteractors,
) -> Result<(ExtensionReposModel, UnboundedReceiver<RepoEvent>)> {
    let (model, events) = ExtensionReposModel::new(interactors);
    model
        .state()
        .wait_for(RepoScreenState::is_loaded)
        .await
        .map_err(|_| eyre!("Repository list closed before loading"))?;
    Ok((model, events))
}

fn event_error(event: RepoEvent) -> eyre::Report {
    match event {
        RepoEvent::InvalidUrl => eyre!("Invalid repository url"),
        RepoEvent::RepoAlreadyExists => eyre!("Repository already exists"),
        RepoEvent::DuplicateFingerprint { existing, attempted } => eyre!(
            "{} uses the same signing key as {}",
            attempted.base_url,
            existing
        ),
        RepoEvent::FingerprintMismatch { base_url } => {
            eyre!("Repository {} is signed by a different key", base_url)
        }
        RepoEvent::Failed => eyre!("Repository operation failed"),
    }
}

async fn handle_add(interactors: RepoInteractors, url: &str, replace: bool) -> Result<()> {
    let (model, mut events) = open_model(interactors).await?;

    model.create_repo(url);
    model.settle().await;

    if let Ok(event) = events.try_recv() {
        println!("❌ Failed to add {}", url);
        return Err(event_error(event));
    }

    match model.current_state().dialog().cloned() {
        Some(RepoDialog::Conflict { existing, attempted }) if replace => {
            model.replace_repo(attempted.clone());
            model.settle().await;
            if let Ok(event) = events.try_recv() {
                return Err(event_error(event));
            }
            println!("✅ Replaced {} with {}", existing.base_url, attempted);
        }
        Some(RepoDialog::Conflict { existing, attempted }) => {
            println!(
                "⚠️  {} uses the same signing key as {}",
                attempted.base_url, existing
            );
            println!("   Run again with --replace to use the new repository instead");
            return Err(eyre!("Duplicate signing key fingerprint"));
        }
        _ => println!("✅ Added {}", url),
    }

    Ok(())
}

async fn handle_list(interactors: RepoInteractors) -> Result<()> {
    let repos = interactors.get.get_all().await?;

    if repos.is_empty() {
        println!("No repositories added.");
        return Ok(());
    }

    println!("📦 Repositories ({}):", repos.len());
    for repo in repos.iter() {
        println!("  {} - {}", repo.display_name(), repo.base_url);
        println!("    website: {}", repo.website);
        println!("    fingerprint: {}", repo.fingerprint);
    }
    Ok(())
}

async fn handle_remove(interactors: RepoInteractors, base_url: &str) -> Result<()> {
    let (model, mut events) = open_model(interactors).await?;

    model.delete_repo(base_url);
    model.settle().await;

    if let Ok(event) = events.try_recv() {
        return Err(event_error(event));
    }
    println!("✅ Removed {}", base_url);
    Ok(())
}

async fn handle_refresh(interactors: RepoInteractors) -> Result<()> {
    let outcomes = interactors.update.update_all().await?;
    debug!("Refreshed {} repositories", outcomes.len());

    let mut failures = 0;
    for (repo, outcome) in &outcomes {
        let status = match outcome {
            RefreshOutcome::Updated => "updated".to_string(),
            RefreshOutcome::Unchanged => "up to date".to_string(),
            RefreshOutcome::Unreachable => "unreachable".to_string(),
            RefreshOutcome::FingerprintMismatch { fetched, .. } => {
                format!("signing key changed to {}", fetched)
            }
            RefreshOutcome::Failed => "failed to save".to_string(),
        };
        if outcome.is_failure() {
            failures += 1;
        }
        println!("  {} - {}", repo.base_url, status);
    }

    if failures > 0 {
        println!(
            "⚠️  {} of {} repositories could not be refreshed",
            failures,
            outcomes.len()
        );
    }
    Ok(())
}
