//! Database module
//!
//! The ledger is a single SQLite file in the data directory. It holds the
//! depot registry, route fares, trips and the per-trip sync records.

pub mod models;
pub mod repository;
pub mod schema;

pub use models::*;
pub use repository::Repository;
pub use schema::initialize_database;

use crate::config::{LEDGER_BUSY_TIMEOUT, LEDGER_POOL_SIZE};
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

/// File name of the ledger inside the data directory
pub const LEDGER_FILE_NAME: &str = "haulbook.db";

pub fn ledger_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LEDGER_FILE_NAME)
}

fn ledger_options(path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(LEDGER_BUSY_TIMEOUT)
}

/// Open the ledger in `data_dir`, creating and migrating it as needed.
///
/// Migrations run over one connection before the shared pool exists, so
/// the sync worker never sees a half-migrated schema.
pub async fn open_ledger(data_dir: &Path) -> Result<SqlitePool> {
    std::fs::create_dir_all(data_dir)?;

    let path = ledger_path(data_dir);
    tracing::info!("Opening ledger at {:?}", path);

    let migrator = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(ledger_options(&path))
        .await?;
    initialize_database(&migrator).await?;
    migrator.close().await;

    let pool = SqlitePoolOptions::new()
        .max_connections(LEDGER_POOL_SIZE)
        .connect_with(ledger_options(&path))
        .await?;

    tracing::debug!("Ledger pool ready ({} connections)", LEDGER_POOL_SIZE);
    Ok(pool)
}
