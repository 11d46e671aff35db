//! Trips service
//!
//! Validation, pricing and persistence of trips. Every save reprices the
//! trip against the current route table and marks it for synchronization.

use crate::config::MAX_NOTES_LENGTH;
use crate::database::{LedgerSummary, Repository, Trip, TripDraft};
use crate::error::{AppError, Result};
use crate::services::pricing::{quote_fare, FareInput};
use crate::services::routes::RoutesService;
use crate::services::trip_editor::TripEditor;

/// Service for managing trips
#[derive(Clone)]
pub struct TripsService {
    repo: Repository,
    routes: RoutesService,
}

impl TripsService {
    pub fn new(repo: Repository, routes: RoutesService) -> Self {
        Self { repo, routes }
    }

    /// Check required fields; all missing ones are reported together
    pub fn validate(draft: &TripDraft) -> Result<()> {
        let mut missing = Vec::new();

        if draft.container_no.trim().is_empty() {
            missing.push("container_no");
        }
        if draft.origin.trim().is_empty() {
            missing.push("origin");
        }
        if draft.destination.trim().is_empty() {
            missing.push("destination");
        }
        if draft.container_size.is_none() {
            missing.push("container_size");
        }
        if draft.load_state.is_none() {
            missing.push("load_state");
        }
        if draft.vehicle_plate.trim().is_empty() {
            missing.push("vehicle_plate");
        }

        if !missing.is_empty() {
            return Err(AppError::Validation {
                missing: missing.into_iter().map(String::from).collect(),
            });
        }

        if draft.notes.chars().count() > MAX_NOTES_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "Notes exceed {} characters",
                MAX_NOTES_LENGTH
            )));
        }

        Ok(())
    }

    /// Edit session for a new trip
    pub async fn new_editor(&self) -> Result<TripEditor> {
        let routes = self.routes.route_book().await?;
        Ok(TripEditor::new(TripDraft::default(), routes))
    }

    /// Edit session for a stored trip
    pub async fn open_editor(&self, id: i64) -> Result<TripEditor> {
        let trip = self.repo.get_trip(id).await?;
        let routes = self.routes.route_book().await?;
        Ok(TripEditor::new(TripDraft::from(&trip), routes))
    }

    /// Validate, reprice and persist a trip
    pub async fn save_trip(&self, draft: &TripDraft) -> Result<Trip> {
        Self::validate(draft)?;

        let routes = self.routes.route_book().await?;
        let mut priced = draft.clone();
        priced.container_no = priced.container_no.trim().to_string();
        priced.origin = priced.origin.trim().to_string();
        priced.destination = priced.destination.trim().to_string();
        priced.vehicle_plate = priced.vehicle_plate.trim().to_string();
        priced.fare = quote_fare(&FareInput::from(&priced), &routes);

        if priced.fare != draft.fare {
            tracing::debug!("Fare of trip {} repriced on save", draft.id);
        }

        let trip = self.repo.save_trip(&priced).await?;

        tracing::info!(
            "Trip {} saved: {} -> {} total {:.2}",
            trip.id,
            trip.origin,
            trip.destination,
            trip.total
        );

        Ok(trip)
    }

    pub async fn get_trip(&self, id: i64) -> Result<Trip> {
        self.repo.get_trip(id).await
    }

    pub async fn list_trips(&self) -> Result<Vec<Trip>> {
        self.repo.list_trips().await
    }

    /// Delete a trip (soft delete)
    pub async fn delete_trip(&self, id: i64) -> Result<()> {
        tracing::info!("Deleting trip: {}", id);
        self.repo.delete_trip(id).await
    }

    pub async fn has_remote_id(&self, id: i64) -> Result<bool> {
        self.repo.has_remote_id(id).await
    }

    /// Pushed and unchanged since the last accepted push
    pub async fn is_synced(&self, id: i64) -> Result<bool> {
        self.repo.is_synced(id).await
    }

    pub async fn ledger_summary(&self) -> Result<LedgerSummary> {
        self.repo.ledger_summary().await
    }
}
