//! Fare calculation
//!
//! Turns a trip's route, load state, container size and extra category into
//! base fare, VAT, withholding and the VAT-inclusive total. The calculation
//! is a pure function over a [`RouteBook`] snapshot of the route fare table.

use crate::config::{EMPTY_RUN_DEDUCTION, EXTRA_FLAT_FARE, VAT_RATE, WITHHOLDING_RATE};
use crate::database::{ContainerSize, ExtraCategory, FareQuote, LoadState, RouteFare, TripDraft};
use std::collections::HashMap;

/// Inputs that drive the fare of a trip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FareInput {
    pub origin: String,
    pub destination: String,
    pub load_state: Option<LoadState>,
    pub container_size: Option<ContainerSize>,
    pub extra: ExtraCategory,
}

impl From<&TripDraft> for FareInput {
    fn from(draft: &TripDraft) -> Self {
        Self {
            origin: draft.origin.clone(),
            destination: draft.destination.clone(),
            load_state: draft.load_state,
            container_size: draft.container_size,
            extra: draft.extra,
        }
    }
}

/// Case-folded, trimmed depot name
fn fold_depot_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Canonical form of a depot name.
///
/// `TER-<n>` and `TER <n>` (digits only) are aliases of `TERMINAL<n>`;
/// everything else is just trimmed and upper-cased.
pub fn canonical_depot_name(name: &str) -> String {
    let folded = fold_depot_name(name);

    let number = folded
        .strip_prefix("TER-")
        .or_else(|| folded.strip_prefix("TER "))
        .map(str::trim_start);

    match number {
        Some(n) if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => {
            format!("TERMINAL{}", n)
        }
        _ => folded,
    }
}

/// In-memory snapshot of the route fare table keyed by ordered depot names
#[derive(Debug, Clone, Default)]
pub struct RouteBook {
    by_name: HashMap<(String, String), Option<f64>>,
    by_canonical: HashMap<(String, String), Option<f64>>,
}

impl RouteBook {
    pub fn from_fares(fares: &[RouteFare]) -> Self {
        let mut book = Self::default();
        for fare in fares {
            book.insert(&fare.origin_name, &fare.destination_name, fare.base_price);
        }
        book
    }

    pub fn insert(&mut self, origin: &str, destination: &str, base_price: Option<f64>) {
        self.by_name.insert(
            (fold_depot_name(origin), fold_depot_name(destination)),
            base_price,
        );
        self.by_canonical
            .entry((canonical_depot_name(origin), canonical_depot_name(destination)))
            .or_insert(base_price);
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Base price of the ordered pair; exact (case-insensitive) names win
    /// over canonical aliases. Unknown or unpriced pairs yield `None`.
    pub fn base_price(&self, origin: &str, destination: &str) -> Option<f64> {
        let exact = (fold_depot_name(origin), fold_depot_name(destination));
        if let Some(price) = self.by_name.get(&exact) {
            return *price;
        }

        let canonical = (canonical_depot_name(origin), canonical_depot_name(destination));
        self.by_canonical.get(&canonical).copied().flatten()
    }
}

/// Round to cents, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fare before VAT
fn base_fare(input: &FareInput, routes: &RouteBook) -> f64 {
    if input.extra.is_flat_rate() {
        return EXTRA_FLAT_FARE;
    }

    let price = routes
        .base_price(&input.origin, &input.destination)
        .unwrap_or(0.0);

    let fare = match input.load_state {
        Some(LoadState::Empty) => {
            let reduced = price - EMPTY_RUN_DEDUCTION;
            if input.container_size == Some(ContainerSize::Twenty) {
                reduced / 2.0
            } else {
                reduced
            }
        }
        // Loaded, or not chosen yet
        _ => price,
    };

    fare.max(0.0)
}

/// Price a trip
pub fn quote_fare(input: &FareInput, routes: &RouteBook) -> FareQuote {
    let base_fare = base_fare(input, routes);

    let vat = if base_fare > 0.0 {
        round2(base_fare * VAT_RATE)
    } else {
        0.0
    };

    let withholding = if vat > 0.0 {
        round2(vat * WITHHOLDING_RATE)
    } else {
        0.0
    };

    FareQuote {
        base_fare,
        vat,
        withholding,
        total: round2(base_fare + vat - withholding),
    }
}
