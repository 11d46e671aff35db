//! Integration tests for haulbook
//!
//! These tests verify end-to-end functionality including:
//! - Ledger bootstrap in a fresh data directory
//! - Route pricing and trip recording through the command layer
//! - Background synchronization against an in-process remote store

use async_trait::async_trait;
use haulbook::app::AppState;
use haulbook::commands::{self, QuoteRequest, TripInput};
use haulbook::database::{ContainerSize, ExtraCategory, LoadState};
use haulbook::error::{AppError, Result};
use haulbook::services::{AgentState, RemoteStore, SyncAgent, SyncPayload, SyncStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Remote store that accepts every push and remembers it
#[derive(Default)]
struct RecordingRemote {
    connected: AtomicBool,
    offline: AtomicBool,
    pushed: Mutex<Vec<SyncPayload>>,
}

#[async_trait]
impl RemoteStore for RecordingRemote {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Remote("network unreachable".to_string()));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn push(&self, payload: &SyncPayload) -> Result<String> {
        self.pushed.lock().unwrap().push(payload.clone());
        Ok(payload
            .remote_id
            .clone()
            .unwrap_or_else(|| format!("remote-{}", payload.trip_id)))
    }
}

impl RecordingRemote {
    fn pushed(&self) -> Vec<SyncPayload> {
        self.pushed.lock().unwrap().clone()
    }
}

/// Helper to open a ledger with two priced depots
async fn create_test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let state = AppState::initialize(temp_dir.path()).await.unwrap();

    commands::add_depot(&state, "ARDEP".to_string()).await.unwrap();
    commands::add_depot(&state, "LIMAN".to_string()).await.unwrap();
    commands::set_route_price(&state, "ARDEP".to_string(), "LIMAN".to_string(), 1400.0)
        .await
        .unwrap();

    (state, temp_dir)
}

fn trip_input(container_no: &str) -> TripInput {
    TripInput {
        container_no: Some(container_no.to_string()),
        origin: Some("ARDEP".to_string()),
        destination: Some("LIMAN".to_string()),
        vehicle_plate: Some("34 ABC 123".to_string()),
        ..TripInput::default()
    }
}

#[tokio::test]
async fn test_trip_pricing_scenarios() {
    let (state, _temp) = create_test_state().await;

    // Defaults: loaded 40ft, no extra
    let loaded = commands::create_trip(&state, trip_input("MSCU1234565"))
        .await
        .unwrap();
    assert_eq!(loaded.container_size, Some(ContainerSize::Forty));
    assert_eq!(loaded.load_state, Some(LoadState::Loaded));
    assert_eq!(
        (loaded.base_fare, loaded.vat, loaded.withholding, loaded.total),
        (1400.0, 280.0, 56.0, 1624.0)
    );

    let empty_twenty = commands::create_trip(
        &state,
        TripInput {
            container_size: Some(ContainerSize::Twenty),
            load_state: Some(LoadState::Empty),
            ..trip_input("MSCU7654321")
        },
    )
    .await
    .unwrap();
    assert_eq!(
        (
            empty_twenty.base_fare,
            empty_twenty.vat,
            empty_twenty.withholding,
            empty_twenty.total
        ),
        (650.0, 130.0, 26.0, 754.0)
    );

    let soda = commands::create_trip(
        &state,
        TripInput {
            extra: Some(ExtraCategory::Soda),
            ..trip_input("TGHU0000001")
        },
    )
    .await
    .unwrap();
    assert_eq!(
        (soda.base_fare, soda.vat, soda.withholding, soda.total),
        (1000.0, 200.0, 40.0, 1160.0)
    );

    assert_eq!(commands::list_trips(&state).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_unmapped_route_quotes_zero() {
    let (state, _temp) = create_test_state().await;

    let quote = commands::quote_fare(
        &state,
        QuoteRequest {
            origin: "ARDEP".to_string(),
            destination: "NOWHERE".to_string(),
            ..QuoteRequest::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(quote.base_fare, 0.0);
    assert_eq!(quote.vat, 0.0);
    assert_eq!(quote.withholding, 0.0);
    assert_eq!(quote.total, 0.0);
}

#[tokio::test]
async fn test_seeded_routes_cover_both_directions() {
    let (state, _temp) = create_test_state().await;

    let routes = commands::list_routes(&state).await.unwrap();
    assert_eq!(routes.len(), 2);

    let forward = routes
        .iter()
        .find(|r| r.origin_name == "ARDEP" && r.destination_name == "LIMAN")
        .unwrap();
    assert_eq!(forward.base_price, Some(1400.0));
    assert!(!forward.auto_generated);

    let reverse = routes
        .iter()
        .find(|r| r.origin_name == "LIMAN" && r.destination_name == "ARDEP")
        .unwrap();
    assert_eq!(reverse.base_price, Some(0.0));
    assert!(reverse.auto_generated);
}

#[tokio::test]
async fn test_missing_fields_are_reported_together() {
    let (state, _temp) = create_test_state().await;

    let result = commands::create_trip(
        &state,
        TripInput {
            origin: Some("ARDEP".to_string()),
            destination: Some("LIMAN".to_string()),
            ..TripInput::default()
        },
    )
    .await;

    match result {
        Err(err @ AppError::Validation { .. }) => assert_eq!(
            err.to_string(),
            "Missing required fields: container_no, vehicle_plate"
        ),
        other => panic!("unexpected result {:?}", other),
    }
    assert!(commands::list_trips(&state).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_once_pushes_and_records_remote_ids() {
    let (state, _temp) = create_test_state().await;
    let remote = Arc::new(RecordingRemote::default());

    let first = commands::create_trip(&state, trip_input("MSCU1234565"))
        .await
        .unwrap();
    let second = commands::create_trip(&state, trip_input("MSCU7654321"))
        .await
        .unwrap();
    assert!(!commands::is_trip_synced(&state, first.id).await.unwrap());

    let report = commands::sync_once_with(&state, remote.clone()).await.unwrap();
    assert_eq!(report.pushed, 2);
    assert_eq!(report.failed, 0);

    // Oldest edit first
    let order: Vec<i64> = remote.pushed().iter().map(|p| p.trip_id).collect();
    assert_eq!(order, vec![first.id, second.id]);

    assert!(commands::is_trip_synced(&state, first.id).await.unwrap());
    assert!(commands::is_trip_synced(&state, second.id).await.unwrap());
    assert_eq!(state.status.current(), SyncStatus::UpToDate);

    // Nothing left to push
    let report = commands::sync_once_with(&state, remote.clone()).await.unwrap();
    assert_eq!(report.attempted, 0);

    // An edit re-pushes under the known remote id
    commands::update_trip(
        &state,
        first.id,
        TripInput {
            load_state: Some(LoadState::Empty),
            ..TripInput::default()
        },
    )
    .await
    .unwrap();
    assert!(!commands::is_trip_synced(&state, first.id).await.unwrap());
    assert!(state.trips.has_remote_id(first.id).await.unwrap());

    let report = commands::sync_once_with(&state, remote.clone()).await.unwrap();
    assert_eq!(report.pushed, 1);
    assert!(commands::is_trip_synced(&state, first.id).await.unwrap());

    let last = remote.pushed().pop().unwrap();
    assert_eq!(last.trip_id, first.id);
    assert_eq!(last.remote_id, Some(format!("remote-{}", first.id)));
    assert_eq!(state.trips.ledger_summary().await.unwrap().pending_sync, 0);
}

#[tokio::test]
async fn test_sync_once_offline_is_an_error_and_keeps_records_pending() {
    let (state, _temp) = create_test_state().await;
    let remote = Arc::new(RecordingRemote::default());
    remote.offline.store(true, Ordering::SeqCst);

    let trip = commands::create_trip(&state, trip_input("MSCU1234565"))
        .await
        .unwrap();

    let result = commands::sync_once_with(&state, remote.clone()).await;
    assert!(matches!(result, Err(AppError::Remote(_))));
    assert!(state.status.current().is_error());
    assert!(remote.pushed().is_empty());
    assert!(!commands::is_trip_synced(&state, trip.id).await.unwrap());

    // Back online: the next attempt picks the record up
    remote.offline.store(false, Ordering::SeqCst);
    let report = commands::sync_once_with(&state, remote.clone()).await.unwrap();
    assert_eq!(report.pushed, 1);
    assert!(commands::is_trip_synced(&state, trip.id).await.unwrap());
}

#[tokio::test]
async fn test_agent_syncs_in_background_until_stopped() {
    let (state, _temp) = create_test_state().await;
    let remote = Arc::new(RecordingRemote::default());

    let agent = SyncAgent::new(state.repo.clone(), remote.clone(), state.status.clone())
        .with_interval(Duration::from_millis(20));
    assert!(agent.start().await);
    assert!(!agent.start().await);
    assert_eq!(agent.state().await, AgentState::Running);

    let trip = commands::create_trip(&state, trip_input("MSCU1234565"))
        .await
        .unwrap();

    let mut synced = false;
    for _ in 0..100 {
        if commands::is_trip_synced(&state, trip.id).await.unwrap() {
            synced = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(synced);

    agent.stop().await;
    assert_eq!(agent.state().await, AgentState::Stopped);
    assert_eq!(state.status.current(), SyncStatus::Idle);
}

#[tokio::test]
async fn test_run_agent_stops_on_shutdown() {
    let (state, _temp) = create_test_state().await;
    let remote: Arc<dyn RemoteStore> = Arc::new(RecordingRemote::default());

    commands::create_trip(&state, trip_input("MSCU1234565"))
        .await
        .unwrap();

    let shutdown = tokio::time::sleep(Duration::from_millis(200));
    tokio::time::timeout(
        Duration::from_secs(5),
        commands::run_agent_with(&state, Some(remote), shutdown),
    )
    .await
    .expect("run loop did not stop")
    .unwrap();

    assert_eq!(state.status.current(), SyncStatus::Idle);
}

#[tokio::test]
async fn test_ledger_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let trip_id = {
        let state = AppState::initialize(temp_dir.path()).await.unwrap();
        commands::add_depot(&state, "ARDEP".to_string()).await.unwrap();
        commands::add_depot(&state, "LIMAN".to_string()).await.unwrap();
        commands::create_trip(&state, trip_input("MSCU1234565"))
            .await
            .unwrap()
            .id
    };

    let state = AppState::initialize(temp_dir.path()).await.unwrap();
    let trip = commands::get_trip(&state, trip_id).await.unwrap();
    assert_eq!(trip.container_no, "MSCU1234565");
    assert_eq!(commands::list_depots(&state).await.unwrap().len(), 2);

    commands::delete_trip(&state, trip_id).await.unwrap();
    assert!(matches!(
        commands::get_trip(&state, trip_id).await,
        Err(AppError::TripNotFound(_))
    ));
}
