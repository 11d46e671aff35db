//! Settings service
//!
//! Manages application settings persistence using JSON file storage.
//! Settings are read once at startup; edits take effect on the next start.

use crate::config::{
    DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_REMOTE_COLLECTION, MIN_REFRESH_INTERVAL_SECS,
};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;

/// Remote document store connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Base URL of the document API; sync stays off while unset
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// JSON credentials file; the keyring token is used when unset
    #[serde(default)]
    pub credentials_path: Option<String>,
}

fn default_collection() -> String {
    DEFAULT_REMOTE_COLLECTION.to_string()
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            collection: default_collection(),
            credentials_path: None,
        }
    }
}

/// Background synchronization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Ledger refresh interval in seconds
    #[serde(default)]
    pub refresh_interval_secs: Option<u64>,
    #[serde(default)]
    pub remote: RemoteSettings,
}

impl SyncSettings {
    /// Configured refresh interval, falling back to the default when unset
    pub fn refresh_interval(&self) -> Duration {
        let secs = self
            .refresh_interval_secs
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS)
            .max(MIN_REFRESH_INTERVAL_SECS);
        Duration::from_secs(secs)
    }
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join("settings.json"),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Update sync settings
    pub async fn update_sync(&self, sync: SyncSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.sync = sync;
        self.save(&settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, temp) = create_test_service();

        let settings = service.load().await.unwrap();

        assert!(!settings.sync.enabled);
        assert_eq!(settings.sync.remote.endpoint, None);
        assert_eq!(settings.sync.remote.collection, "trips");
        assert!(temp.path().join("settings.json").exists());
    }

    #[test]
    fn test_refresh_interval_defaults_to_sixty_seconds() {
        let sync = SyncSettings::default();
        assert_eq!(sync.refresh_interval(), Duration::from_secs(60));

        let sync = SyncSettings {
            refresh_interval_secs: Some(120),
            ..SyncSettings::default()
        };
        assert_eq!(sync.refresh_interval(), Duration::from_secs(120));

        let sync = SyncSettings {
            refresh_interval_secs: Some(0),
            ..SyncSettings::default()
        };
        assert_eq!(sync.refresh_interval(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let (service, temp) = create_test_service();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{ "sync": { "enabled": true, "remote": { "endpoint": "https://docs.example.com" } } }"#,
        )
        .unwrap();

        let settings = service.load().await.unwrap();

        assert!(settings.sync.enabled);
        assert_eq!(
            settings.sync.remote.endpoint.as_deref(),
            Some("https://docs.example.com")
        );
        assert_eq!(settings.sync.remote.collection, "trips");
        assert_eq!(settings.sync.refresh_interval_secs, None);
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().to_path_buf();

        {
            let service = SettingsService::new(settings_path.clone());
            let sync = SyncSettings {
                enabled: true,
                refresh_interval_secs: Some(30),
                remote: RemoteSettings {
                    endpoint: Some("https://docs.example.com".to_string()),
                    collection: "hauls".to_string(),
                    credentials_path: Some("/etc/haulbook/creds.json".to_string()),
                },
            };
            service.update_sync(sync).await.unwrap();
        }

        {
            let service = SettingsService::new(settings_path);
            let loaded = service.load().await.unwrap();
            assert!(loaded.sync.enabled);
            assert_eq!(loaded.sync.refresh_interval_secs, Some(30));
            assert_eq!(loaded.sync.remote.collection, "hauls");
        }
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let (service, temp) = create_test_service();
        std::fs::write(temp.path().join("settings.json"), "{ not json").unwrap();

        assert!(service.load().await.is_err());
    }
}
