//! CLI definition using clap

use crate::commands::TripInput;
use crate::database::{ContainerSize, ExtraCategory, LoadState};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Parser)]
#[command(name = "haulbook")]
#[command(version)]
#[command(about = "Container haulage trip ledger with route pricing and remote sync")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(long, short = 'f', global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage depots
    Depot {
        #[command(subcommand)]
        action: DepotAction,
    },

    /// Manage route prices
    Route {
        #[command(subcommand)]
        action: RouteAction,
    },

    /// Quote a fare without recording a trip
    Quote {
        origin: String,
        destination: String,

        /// Container size (20, 40); defaults to 40
        #[arg(long, short = 's', value_parser = parse_size)]
        size: Option<ContainerSize>,

        /// Load state (empty, loaded); defaults to loaded
        #[arg(long, short = 'l', value_parser = parse_load_state)]
        load: Option<LoadState>,

        /// Extra category (escrow, soda)
        #[arg(long, short = 'x', value_parser = parse_extra)]
        extra: Option<ExtraCategory>,
    },

    /// Record and inspect trips
    Trip {
        #[command(subcommand)]
        action: TripAction,
    },

    /// Push pending trips once and exit
    Sync,

    /// Run the sync agent and ledger refresh until Ctrl-C
    Run,

    /// Show version, data directory, settings and ledger totals
    Info,

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Manage the remote store token in the OS credential manager
    Credentials {
        #[command(subcommand)]
        action: CredentialsAction,
    },
}

#[derive(Subcommand)]
pub enum DepotAction {
    /// Register a depot
    Add { name: String },
    /// List depots
    List,
}

#[derive(Subcommand)]
pub enum RouteAction {
    /// Set the base price of an ordered depot pair
    Set {
        origin: String,
        destination: String,
        price: f64,
    },
    /// List route prices
    List,
}

/// Trip fields shared by `trip add` and `trip edit`
#[derive(clap::Args, Debug, Default)]
pub struct TripFields {
    /// Trip date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Container number
    #[arg(long, short = 'c')]
    pub container: Option<String>,

    /// Origin depot
    #[arg(long, short = 'o')]
    pub origin: Option<String>,

    /// Destination depot
    #[arg(long, short = 'd')]
    pub destination: Option<String>,

    /// Container size (20, 40)
    #[arg(long, short = 's', value_parser = parse_size)]
    pub size: Option<ContainerSize>,

    /// Load state (empty, loaded)
    #[arg(long, short = 'l', value_parser = parse_load_state)]
    pub load: Option<LoadState>,

    /// Extra category (none, escrow, soda)
    #[arg(long, short = 'x', value_parser = parse_extra)]
    pub extra: Option<ExtraCategory>,

    /// Vehicle plate
    #[arg(long, short = 'p')]
    pub plate: Option<String>,

    /// Free-form notes
    #[arg(long, short = 'n')]
    pub notes: Option<String>,
}

impl From<TripFields> for TripInput {
    fn from(fields: TripFields) -> Self {
        Self {
            trip_date: fields.date,
            container_no: fields.container,
            origin: fields.origin,
            destination: fields.destination,
            container_size: fields.size,
            load_state: fields.load,
            extra: fields.extra,
            vehicle_plate: fields.plate,
            notes: fields.notes,
        }
    }
}

#[derive(Subcommand)]
pub enum TripAction {
    /// Record a new trip
    Add(TripFields),
    /// Change fields of a stored trip
    Edit {
        id: i64,
        #[command(flatten)]
        fields: TripFields,
    },
    /// List trips, newest first
    List,
    /// Show a single trip
    Show { id: i64 },
    /// Delete a trip
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the stored settings
    Show,
    /// Change sync settings (applied on the next start)
    Sync {
        /// Enable background sync
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Disable background sync
        #[arg(long)]
        disable: bool,

        /// Remote document API base URL; empty clears it
        #[arg(long)]
        endpoint: Option<String>,

        /// Remote collection name
        #[arg(long)]
        collection: Option<String>,

        /// JSON credentials file with an `api_key`; empty clears it
        #[arg(long)]
        credentials_file: Option<String>,

        /// Ledger refresh interval in seconds
        #[arg(long)]
        refresh_interval: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum CredentialsAction {
    /// Store the remote store token
    Set { token: String },
    /// Remove the stored token
    Clear,
}

fn parse_size(value: &str) -> Result<ContainerSize, String> {
    value.parse()
}

fn parse_load_state(value: &str) -> Result<LoadState, String> {
    value.parse()
}

fn parse_extra(value: &str) -> Result<ExtraCategory, String> {
    value.parse()
}
