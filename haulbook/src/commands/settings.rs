//! Settings-related commands
//!
//! Sync settings and the remote store credentials kept in the OS
//! credential manager.

use crate::app::AppState;
use crate::config::MIN_REFRESH_INTERVAL_SECS;
use crate::error::{AppError, Result};
use crate::services::{AppSettings, CredentialManager, SyncSettings};
use serde::Deserialize;

/// Current settings as loaded at startup
pub fn get_settings(state: &AppState) -> AppSettings {
    state.settings.clone()
}

/// Changes to the sync settings; `None` keeps the stored value and an
/// empty endpoint or credentials path clears it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncSettingsUpdate {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub collection: Option<String>,
    pub credentials_path: Option<String>,
    pub refresh_interval_secs: Option<u64>,
}

fn non_blank(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Update sync settings
/// Note: restart required for changes to take effect
pub async fn update_sync_settings(
    state: &AppState,
    update: SyncSettingsUpdate,
) -> Result<SyncSettings> {
    let mut sync = state.settings_service.load().await?.sync;

    if let Some(enabled) = update.enabled {
        sync.enabled = enabled;
    }
    if let Some(endpoint) = update.endpoint {
        sync.remote.endpoint = non_blank(endpoint);
    }
    if let Some(collection) = update.collection {
        sync.remote.collection = non_blank(collection)
            .ok_or_else(|| AppError::InvalidInput("Collection name is empty".to_string()))?;
    }
    if let Some(path) = update.credentials_path {
        sync.remote.credentials_path = non_blank(path);
    }
    if let Some(secs) = update.refresh_interval_secs {
        if secs < MIN_REFRESH_INTERVAL_SECS {
            return Err(AppError::InvalidInput(format!(
                "Refresh interval must be at least {} seconds",
                MIN_REFRESH_INTERVAL_SECS
            )));
        }
        sync.refresh_interval_secs = Some(secs);
    }

    if sync.enabled && sync.remote.endpoint.is_none() {
        return Err(AppError::InvalidInput(
            "Sync cannot be enabled without a remote endpoint".to_string(),
        ));
    }

    state.settings_service.update_sync(sync.clone()).await?;

    tracing::warn!("Sync settings updated. Restart required for changes to take effect.");

    Ok(sync)
}

/// Store the remote store token
pub fn set_remote_token(token: String) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::InvalidInput("Token is empty".to_string()));
    }
    CredentialManager::store_remote_token(token)
}

/// Remove the stored remote store token
pub fn clear_remote_token() -> Result<()> {
    CredentialManager::delete_remote_token()
}
