//! Application configuration constants
//!
//! Central location for tax rates, tariff rules, sync timing and
//! validation boundaries used throughout the application.

use std::time::Duration;

// ===== Tariff =====

/// VAT rate applied to the fare
pub const VAT_RATE: f64 = 0.20;

/// Share of the VAT amount withheld from the VAT-inclusive total
pub const WITHHOLDING_RATE: f64 = 0.20;

/// Flat fare for escrow and soda runs, independent of route and load state
pub const EXTRA_FLAT_FARE: f64 = 1000.0;

/// Deducted from the route price when the container travels empty
pub const EMPTY_RUN_DEDUCTION: f64 = 100.0;

// ===== Sync =====

/// Pause between two sync iterations
pub const SYNC_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Ledger refresh interval used when the settings leave it unset
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Lower bound for a configured refresh interval
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 5;

/// Timeout for a single request to the remote store
pub const REMOTE_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Remote collection used when the settings leave it unset
pub const DEFAULT_REMOTE_COLLECTION: &str = "trips";

// ===== Storage =====

/// Ledger pool size: the sync worker, the command surface and the ledger
/// refresh ticker each hold at most one connection
pub const LEDGER_POOL_SIZE: u32 = 3;

/// How long a writer waits on a locked ledger before failing
pub const LEDGER_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ===== Validation Limits =====

/// Maximum length of a depot name
pub const MAX_DEPOT_NAME_LENGTH: usize = 64;

/// Maximum length of free-text trip notes
pub const MAX_NOTES_LENGTH: usize = 2_000;
