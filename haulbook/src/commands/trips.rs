//! Trip commands
//!
//! Trips are recorded through a [`TripEditor`] so the command line gets the
//! same defaults and live pricing as an interactive form.

use crate::app::AppState;
use crate::database::{ContainerSize, ExtraCategory, LoadState, Trip};
use crate::error::Result;
use crate::services::TripEditor;
use chrono::NaiveDate;
use serde::Deserialize;

/// Field values for a new or edited trip; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripInput {
    pub trip_date: Option<NaiveDate>,
    pub container_no: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub container_size: Option<ContainerSize>,
    pub load_state: Option<LoadState>,
    pub extra: Option<ExtraCategory>,
    pub vehicle_plate: Option<String>,
    pub notes: Option<String>,
}

impl TripInput {
    /// Feed the values into an editor in form order: route first, so the
    /// one-time defaults land before any explicit size or load state.
    fn apply(self, editor: &mut TripEditor) {
        if let Some(date) = self.trip_date {
            editor.set_trip_date(date);
        }
        if let Some(container_no) = self.container_no {
            editor.set_container_no(container_no);
        }
        if let Some(origin) = self.origin {
            editor.set_origin(origin);
        }
        if let Some(destination) = self.destination {
            editor.set_destination(destination);
        }
        if let Some(size) = self.container_size {
            editor.set_container_size(Some(size));
        }
        if let Some(load_state) = self.load_state {
            editor.set_load_state(Some(load_state));
        }
        if let Some(extra) = self.extra {
            editor.set_extra(extra);
        }
        if let Some(plate) = self.vehicle_plate {
            editor.set_vehicle_plate(plate);
        }
        if let Some(notes) = self.notes {
            editor.set_notes(notes);
        }
    }
}

/// Record a new trip
pub async fn create_trip(state: &AppState, input: TripInput) -> Result<Trip> {
    let mut editor = state.trips.new_editor().await?;
    input.apply(&mut editor);
    state.trips.save_trip(&editor.into_draft()).await
}

/// Edit a stored trip
pub async fn update_trip(state: &AppState, id: i64, input: TripInput) -> Result<Trip> {
    let mut editor = state.trips.open_editor(id).await?;
    input.apply(&mut editor);
    state.trips.save_trip(&editor.into_draft()).await
}

pub async fn get_trip(state: &AppState, id: i64) -> Result<Trip> {
    state.trips.get_trip(id).await
}

/// List all non-deleted trips, newest first
pub async fn list_trips(state: &AppState) -> Result<Vec<Trip>> {
    state.trips.list_trips().await
}

/// Soft delete a trip
pub async fn delete_trip(state: &AppState, id: i64) -> Result<()> {
    state.trips.delete_trip(id).await
}

/// Whether the remote store holds the current version of the trip
pub async fn is_trip_synced(state: &AppState, id: i64) -> Result<bool> {
    state.trips.is_synced(id).await
}
