//! Trip edit session
//!
//! Wraps a [`TripDraft`] and keeps its fare in step with every pricing edit.
//! A brand-new trip gets default classification values the first time both
//! route endpoints are filled in, and never again during the same session.

use crate::database::{ContainerSize, ExtraCategory, LoadState, TripDraft};
use crate::services::pricing::{quote_fare, FareInput, RouteBook};
use chrono::NaiveDate;

/// Whether first-time defaults have been applied in this session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultsLatch {
    Fresh,
    DefaultsApplied,
}

/// Edit session over a single trip draft
#[derive(Debug, Clone)]
pub struct TripEditor {
    draft: TripDraft,
    latch: DefaultsLatch,
    routes: RouteBook,
}

impl TripEditor {
    /// Start editing a trip. Stored trips never receive defaults.
    pub fn new(draft: TripDraft, routes: RouteBook) -> Self {
        let latch = if draft.is_new() {
            DefaultsLatch::Fresh
        } else {
            DefaultsLatch::DefaultsApplied
        };

        let mut editor = Self {
            draft,
            latch,
            routes,
        };
        editor.recompute();
        editor
    }

    pub fn draft(&self) -> &TripDraft {
        &self.draft
    }

    pub fn into_draft(self) -> TripDraft {
        self.draft
    }

    pub fn latch(&self) -> DefaultsLatch {
        self.latch
    }

    // ===== Pricing fields =====

    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.draft.origin = origin.into();
        self.pricing_changed();
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.draft.destination = destination.into();
        self.pricing_changed();
    }

    pub fn set_load_state(&mut self, load_state: Option<LoadState>) {
        self.draft.load_state = load_state;
        self.pricing_changed();
    }

    pub fn set_container_size(&mut self, size: Option<ContainerSize>) {
        self.draft.container_size = size;
        self.pricing_changed();
    }

    pub fn set_extra(&mut self, extra: ExtraCategory) {
        self.draft.extra = extra;
        self.pricing_changed();
    }

    // ===== Other fields =====

    pub fn set_container_no(&mut self, container_no: impl Into<String>) {
        self.draft.container_no = container_no.into();
    }

    pub fn set_vehicle_plate(&mut self, plate: impl Into<String>) {
        self.draft.vehicle_plate = plate.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.draft.notes = notes.into();
    }

    pub fn set_trip_date(&mut self, date: NaiveDate) {
        self.draft.trip_date = date;
    }

    /// Swap in a newer route table snapshot and reprice
    pub fn refresh_routes(&mut self, routes: RouteBook) {
        self.routes = routes;
        self.recompute();
    }

    fn pricing_changed(&mut self) {
        self.apply_defaults_once();
        self.recompute();
    }

    fn apply_defaults_once(&mut self) {
        if self.latch != DefaultsLatch::Fresh {
            return;
        }

        if self.draft.origin.trim().is_empty() || self.draft.destination.trim().is_empty() {
            return;
        }

        self.draft.container_size = Some(ContainerSize::Forty);
        self.draft.load_state = Some(LoadState::Loaded);
        self.draft.extra = ExtraCategory::None;
        self.latch = DefaultsLatch::DefaultsApplied;

        tracing::debug!(
            "Applied trip defaults for {} -> {}",
            self.draft.origin,
            self.draft.destination
        );
    }

    fn recompute(&mut self) {
        self.draft.fare = quote_fare(&FareInput::from(&self.draft), &self.routes);
    }
}
