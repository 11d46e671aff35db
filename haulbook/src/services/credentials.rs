/// Credential Manager Service
/// Resolves the remote store token from a credentials file or the OS keyring
use crate::error::{AppError, Result};
use keyring::Entry;
use serde::Deserialize;
use std::path::Path;

const SERVICE_NAME: &str = "haulbook";
const REMOTE_TOKEN_KEY: &str = "remote_store_token";

/// Shape of the JSON credentials file
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    api_key: String,
}

/// Credential manager for the remote store token
pub struct CredentialManager;

impl CredentialManager {
    /// Store the remote store token in the OS credential store
    pub fn store_remote_token(token: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, REMOTE_TOKEN_KEY)
            .map_err(|e| AppError::Credentials(format!("Failed to create keyring entry: {}", e)))?;

        entry
            .set_password(token)
            .map_err(|e| AppError::Credentials(format!("Failed to store token: {}", e)))?;

        tracing::info!("Remote store token saved in credential manager");
        Ok(())
    }

    /// Delete the remote store token from the OS credential store
    pub fn delete_remote_token() -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, REMOTE_TOKEN_KEY)
            .map_err(|e| AppError::Credentials(format!("Failed to create keyring entry: {}", e)))?;

        entry
            .delete_credential()
            .map_err(|e| AppError::Credentials(format!("Failed to delete token: {}", e)))?;

        tracing::info!("Remote store token deleted from credential manager");
        Ok(())
    }

    /// Read the `api_key` from a JSON credentials file
    pub fn read_credentials_file(path: &Path) -> Result<String> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Credentials(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file: CredentialsFile = serde_json::from_str(&content).map_err(|e| {
            AppError::Credentials(format!("Malformed credentials file {}: {}", path.display(), e))
        })?;

        if file.api_key.trim().is_empty() {
            return Err(AppError::Credentials(format!(
                "Credentials file {} has an empty api_key",
                path.display()
            )));
        }

        Ok(file.api_key)
    }

    /// Token for the remote store: the credentials file when configured,
    /// otherwise the keyring entry, otherwise none.
    pub fn resolve_remote_token(credentials_path: Option<&str>) -> Result<Option<String>> {
        if let Some(path) = credentials_path {
            return Self::read_credentials_file(Path::new(path)).map(Some);
        }

        let token = Entry::new(SERVICE_NAME, REMOTE_TOKEN_KEY)
            .and_then(|entry| entry.get_password())
            .ok();

        if token.is_none() {
            tracing::debug!("No remote store token in credential manager");
        }
        Ok(token)
    }
}
