//! Commands exposed to the command line
//!
//! This module organizes commands into logical submodules:
//! - `trips`: Trip recording, listing and deletion
//! - `routes`: Depots, route prices and fare quotes
//! - `sync`: One-shot sync and the long-running agent
//! - `settings`: Sync settings and remote store credentials
//!
//! All commands take the `AppState` first and return `Result<T, AppError>`.

pub mod routes;
pub mod settings;
pub mod sync;
pub mod trips;

use crate::app::AppState;
use crate::database::LedgerSummary;
use crate::error::Result;
use crate::services::{AppSettings, SyncStatus};
use serde::Serialize;

pub use routes::*;
pub use settings::*;
pub use sync::*;
pub use trips::*;

/// Get application information
pub async fn get_app_info(state: &AppState) -> Result<AppInfo> {
    Ok(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
        settings: get_settings(state),
        ledger: state.trips.ledger_summary().await?,
        status: state.status.current(),
    })
}

/// Application information structure
#[derive(Debug, Serialize)]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
    pub settings: AppSettings,
    pub ledger: LedgerSummary,
    pub status: SyncStatus,
}
