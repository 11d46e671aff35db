//! Services module
//!
//! Business logic services that coordinate between commands and repository.

pub mod credentials;
pub mod pricing;
pub mod remote;
pub mod routes;
pub mod settings;
pub mod status;
pub mod sync;
pub mod trip_editor;
pub mod trips;

pub use credentials::CredentialManager;
pub use pricing::{canonical_depot_name, quote_fare, round2, FareInput, RouteBook};
pub use remote::{HttpRemoteStore, RemoteStore, SyncPayload};
pub use routes::RoutesService;
pub use settings::{AppSettings, RemoteSettings, SettingsService, SyncSettings};
pub use status::{StatusBoard, StatusSubscription, SyncStatus};
pub use sync::{AgentState, SyncAgent, SyncReport};
pub use trip_editor::{DefaultsLatch, TripEditor};
pub use trips::TripsService;
