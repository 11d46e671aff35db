//! Depot and route price commands

use crate::app::AppState;
use crate::database::{ContainerSize, Depot, ExtraCategory, FareQuote, LoadState, RouteFare};
use crate::error::Result;
use crate::services::FareInput;
use serde::Deserialize;

/// Register a depot
pub async fn add_depot(state: &AppState, name: String) -> Result<Depot> {
    state.routes.add_depot(&name).await
}

pub async fn list_depots(state: &AppState) -> Result<Vec<Depot>> {
    state.routes.list_depots().await
}

/// Set the base price of an ordered depot pair
pub async fn set_route_price(
    state: &AppState,
    origin: String,
    destination: String,
    base_price: f64,
) -> Result<RouteFare> {
    state
        .routes
        .set_route_price(&origin, &destination, base_price)
        .await
}

pub async fn list_routes(state: &AppState) -> Result<Vec<RouteFare>> {
    state.routes.list_routes().await
}

/// Parameters of a fare quote; unset size and load state price as a
/// loaded 40ft container, matching the trip editor defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteRequest {
    pub origin: String,
    pub destination: String,
    pub container_size: Option<ContainerSize>,
    pub load_state: Option<LoadState>,
    pub extra: Option<ExtraCategory>,
}

/// Quote a fare against the current route table
pub async fn quote_fare(state: &AppState, request: QuoteRequest) -> Result<FareQuote> {
    let input = FareInput {
        origin: request.origin,
        destination: request.destination,
        container_size: Some(request.container_size.unwrap_or(ContainerSize::Forty)),
        load_state: Some(request.load_state.unwrap_or(LoadState::Loaded)),
        extra: request.extra.unwrap_or_default(),
    };
    state.routes.quote(&input).await
}
