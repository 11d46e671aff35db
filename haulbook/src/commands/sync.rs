//! Sync commands
//!
//! A one-shot sync for scripts and cron, and `run_agent` for the
//! long-running process: background push loop, periodic ledger refresh and
//! status log until shutdown.

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::services::{
    CredentialManager, HttpRemoteStore, RemoteStore, StatusSubscription, SyncAgent, SyncReport,
    SyncSettings, SyncStatus,
};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Remote store described by the sync settings
pub fn build_remote_store(sync: &SyncSettings) -> Result<HttpRemoteStore> {
    let endpoint = sync
        .remote
        .endpoint
        .as_deref()
        .filter(|endpoint| !endpoint.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("No remote endpoint configured".to_string()))?;

    let token = CredentialManager::resolve_remote_token(sync.remote.credentials_path.as_deref())?;
    if token.is_none() {
        tracing::warn!("No remote store credentials; pushing unauthenticated");
    }

    HttpRemoteStore::new(endpoint, &sync.remote.collection, token)
}

/// Run one sync iteration against the configured remote store
pub async fn sync_once(state: &AppState) -> Result<SyncReport> {
    let remote = build_remote_store(&state.settings.sync)?;
    sync_once_with(state, Arc::new(remote)).await
}

pub async fn sync_once_with(state: &AppState, remote: Arc<dyn RemoteStore>) -> Result<SyncReport> {
    let agent = SyncAgent::new(state.repo.clone(), remote, state.status.clone());
    let report = agent.sync_now().await;

    if let SyncStatus::Error { detail } = state.status.current() {
        if !report.connected {
            return Err(AppError::Remote(detail));
        }
    }
    Ok(report)
}

/// Run until `shutdown` resolves. The sync agent only runs when enabled in
/// the settings; the ledger refresh always runs.
pub async fn run_agent<F>(state: &AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let remote: Option<Arc<dyn RemoteStore>> = if state.settings.sync.enabled {
        Some(Arc::new(build_remote_store(&state.settings.sync)?))
    } else {
        tracing::warn!("Sync disabled in settings; trips are recorded locally only");
        None
    };

    run_agent_with(state, remote, shutdown).await
}

pub async fn run_agent_with<F>(
    state: &AppState,
    remote: Option<Arc<dyn RemoteStore>>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let agent = remote.map(|remote| SyncAgent::new(state.repo.clone(), remote, state.status.clone()));
    if let Some(agent) = &agent {
        agent.start().await;
    }

    let cancel = CancellationToken::new();
    let status_task = tokio::spawn(log_status(state.status.subscribe(), cancel.clone()));

    let refresh_interval = state.settings.sync.refresh_interval();
    tracing::info!("Ledger refresh every {:?}", refresh_interval);
    let mut ticker = tokio::time::interval(refresh_interval);

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break;
            }
            _ = ticker.tick() => refresh_ledger(state).await,
        }
    }

    if let Some(agent) = &agent {
        agent.stop().await;
    }

    cancel.cancel();
    if let Err(e) = status_task.await {
        tracing::error!("Status logger ended abnormally: {}", e);
    }

    Ok(())
}

async fn refresh_ledger(state: &AppState) {
    match state.trips.ledger_summary().await {
        Ok(summary) => tracing::info!(
            "Ledger: {} trips, revenue {:.2}, {} pending sync, {} synced",
            summary.trips,
            summary.revenue_total,
            summary.pending_sync,
            summary.synced
        ),
        Err(e) => tracing::error!("Failed to refresh ledger: {}", e),
    }
}

async fn log_status(mut subscription: StatusSubscription, cancel: CancellationToken) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = subscription.next() => match next {
                Some(status) if status.is_error() => tracing::warn!("Status: {}", status),
                Some(status) => tracing::info!("Status: {}", status),
                None => break,
            },
        }
    }
}
