//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::database::{ledger_path, open_ledger, Repository};
use crate::error::{AppError, Result};
use crate::services::{AppSettings, RoutesService, SettingsService, StatusBoard, TripsService};
use std::path::{Path, PathBuf};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub repo: Repository,
    pub trips: TripsService,
    pub routes: RoutesService,
    pub settings_service: SettingsService,
    pub settings: AppSettings,
    pub status: StatusBoard,
}

impl AppState {
    /// Open the ledger in `app_data_dir`, creating it on first use
    pub async fn initialize(app_data_dir: &Path) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("App data directory: {:?}", app_data_dir);

        let pool = open_ledger(app_data_dir).await?;
        let repo = Repository::new(pool);

        let settings_service = SettingsService::new(app_data_dir.to_path_buf());
        let settings = settings_service.load().await?;

        let routes = RoutesService::new(repo.clone());
        let trips = TripsService::new(repo.clone(), routes.clone());

        tracing::info!("Application initialized successfully");

        Ok(Self {
            app_data_dir: app_data_dir.to_path_buf(),
            repo,
            trips,
            routes,
            settings_service,
            settings,
            status: StatusBoard::new(),
        })
    }
}

/// Platform data directory for the ledger
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("haulbook"))
        .ok_or_else(|| AppError::Generic("Failed to locate a data directory".to_string()))
}
