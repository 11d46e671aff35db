//! Routes service
//!
//! Depot registry and route fare table, plus fare quotes against the
//! current table.

use crate::config::MAX_DEPOT_NAME_LENGTH;
use crate::database::{Depot, FareQuote, Repository, RouteFare};
use crate::error::{AppError, Result};
use crate::services::pricing::{quote_fare, FareInput, RouteBook};

/// Service for depots and route prices
#[derive(Clone)]
pub struct RoutesService {
    repo: Repository,
}

impl RoutesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Register a depot; placeholder fares towards all other depots are seeded
    pub async fn add_depot(&self, name: &str) -> Result<Depot> {
        let name = name.trim();

        if name.is_empty() {
            return Err(AppError::InvalidInput("Depot name is empty".to_string()));
        }
        if name.chars().count() > MAX_DEPOT_NAME_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "Depot name exceeds {} characters",
                MAX_DEPOT_NAME_LENGTH
            )));
        }
        if self.repo.find_depot_by_name(name).await?.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Depot '{}' already exists",
                name
            )));
        }

        let depot = self.repo.create_depot(name).await?;
        tracing::info!("Depot added: {}", depot.name);
        Ok(depot)
    }

    pub async fn list_depots(&self) -> Result<Vec<Depot>> {
        self.repo.list_depots().await
    }

    pub async fn list_routes(&self) -> Result<Vec<RouteFare>> {
        self.repo.list_route_fares().await
    }

    /// Price the ordered pair `origin -> destination`
    pub async fn set_route_price(
        &self,
        origin: &str,
        destination: &str,
        base_price: f64,
    ) -> Result<RouteFare> {
        if !base_price.is_finite() || base_price < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "Route price must be a non-negative amount, got {}",
                base_price
            )));
        }

        let origin_depot = self.resolve_depot(origin).await?;
        let destination_depot = self.resolve_depot(destination).await?;

        if origin_depot.id == destination_depot.id {
            return Err(AppError::InvalidInput(
                "Origin and destination must differ".to_string(),
            ));
        }

        let fare = self
            .repo
            .set_route_price(origin_depot.id, destination_depot.id, base_price)
            .await?;

        tracing::info!(
            "Route price set: {} -> {} = {:.2}",
            fare.origin_name,
            fare.destination_name,
            base_price
        );
        Ok(fare)
    }

    /// Snapshot of the route table for fare calculation
    pub async fn route_book(&self) -> Result<RouteBook> {
        let fares = self.repo.list_route_fares().await?;
        let book = RouteBook::from_fares(&fares);
        tracing::debug!("Loaded route book with {} pairs", book.len());
        Ok(book)
    }

    /// Quote a fare against the current route table
    pub async fn quote(&self, input: &FareInput) -> Result<FareQuote> {
        let book = self.route_book().await?;
        Ok(quote_fare(input, &book))
    }

    async fn resolve_depot(&self, name: &str) -> Result<Depot> {
        self.repo
            .find_depot_by_name(name.trim())
            .await?
            .ok_or_else(|| AppError::DepotNotFound(name.trim().to_string()))
    }
}
