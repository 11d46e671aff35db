//! Database models
//!
//! Rust structs representing database entities, plus the small enumerations
//! stored as text columns.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// ISO container length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum ContainerSize {
    #[serde(rename = "20")]
    #[sqlx(rename = "20")]
    Twenty,
    #[serde(rename = "40")]
    #[sqlx(rename = "40")]
    Forty,
}

impl ContainerSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerSize::Twenty => "20",
            ContainerSize::Forty => "40",
        }
    }
}

impl fmt::Display for ContainerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "20" => Ok(ContainerSize::Twenty),
            "40" => Ok(ContainerSize::Forty),
            other => Err(format!("Invalid container size '{}'. Use 20 or 40", other)),
        }
    }
}

/// Whether the container travels full or empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LoadState {
    Empty,
    Loaded,
}

impl LoadState {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadState::Empty => "empty",
            LoadState::Loaded => "loaded",
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "empty" => Ok(LoadState::Empty),
            "loaded" => Ok(LoadState::Loaded),
            other => Err(format!("Invalid load state '{}'. Use empty or loaded", other)),
        }
    }
}

/// Special run category that overrides route pricing
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ExtraCategory {
    #[default]
    None,
    Escrow,
    Soda,
}

impl ExtraCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtraCategory::None => "none",
            ExtraCategory::Escrow => "escrow",
            ExtraCategory::Soda => "soda",
        }
    }

    /// Escrow and soda runs are billed at a flat rate
    pub fn is_flat_rate(self) -> bool {
        matches!(self, ExtraCategory::Escrow | ExtraCategory::Soda)
    }
}

impl fmt::Display for ExtraCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtraCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(ExtraCategory::None),
            "escrow" => Ok(ExtraCategory::Escrow),
            "soda" => Ok(ExtraCategory::Soda),
            other => Err(format!(
                "Invalid extra category '{}'. Use none, escrow or soda",
                other
            )),
        }
    }
}

/// A named route endpoint (yard, terminal, facility)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Depot {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Price row for an ordered depot pair, joined with the depot names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteFare {
    pub id: i64,
    pub origin_depot_id: i64,
    pub origin_name: String,
    pub destination_depot_id: i64,
    pub destination_name: String,
    pub base_price: Option<f64>,
    /// Seeded placeholder rather than a manually priced pair
    pub auto_generated: bool,
    pub updated_at: DateTime<Utc>,
}

/// Derived financial fields of a trip
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FareQuote {
    pub base_fare: f64,
    pub vat: f64,
    pub withholding: f64,
    pub total: f64,
}

/// A stored trip
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub trip_date: NaiveDate,
    pub container_no: String,
    pub origin: String,
    pub destination: String,
    pub container_size: Option<ContainerSize>,
    pub load_state: Option<LoadState>,
    pub extra: ExtraCategory,
    pub vehicle_plate: String,
    pub notes: String,
    pub base_fare: f64,
    pub vat: f64,
    pub withholding: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Trip {
    pub fn quote(&self) -> FareQuote {
        FareQuote {
            base_fare: self.base_fare,
            vat: self.vat,
            withholding: self.withholding,
            total: self.total,
        }
    }
}

/// Editable trip state; `id == 0` means the trip has not been saved yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDraft {
    pub id: i64,
    pub trip_date: NaiveDate,
    pub container_no: String,
    pub origin: String,
    pub destination: String,
    pub container_size: Option<ContainerSize>,
    pub load_state: Option<LoadState>,
    pub extra: ExtraCategory,
    pub vehicle_plate: String,
    pub notes: String,
    pub fare: FareQuote,
}

impl TripDraft {
    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}

impl Default for TripDraft {
    fn default() -> Self {
        Self {
            id: 0,
            trip_date: Local::now().date_naive(),
            container_no: String::new(),
            origin: String::new(),
            destination: String::new(),
            container_size: None,
            load_state: None,
            extra: ExtraCategory::None,
            vehicle_plate: String::new(),
            notes: String::new(),
            fare: FareQuote::default(),
        }
    }
}

impl From<&Trip> for TripDraft {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id,
            trip_date: trip.trip_date,
            container_no: trip.container_no.clone(),
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            container_size: trip.container_size,
            load_state: trip.load_state,
            extra: trip.extra,
            vehicle_plate: trip.vehicle_plate.clone(),
            notes: trip.notes.clone(),
            fare: trip.quote(),
        }
    }
}

/// Local mirror of a trip awaiting (or done with) remote synchronization
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncRecord {
    pub trip_id: i64,
    pub remote_id: Option<String>,
    pub container_no: String,
    pub load_location: String,
    pub unload_location: String,
    pub container_size: Option<ContainerSize>,
    pub load_state: Option<LoadState>,
    pub vehicle_plate: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub dirty: bool,
    pub deleted: bool,
}

/// Aggregate figures over the non-deleted trips
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LedgerSummary {
    pub trips: i64,
    pub revenue_total: f64,
    pub pending_sync: i64,
    pub synced: i64,
}
