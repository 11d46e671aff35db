//! Repository layer for database operations
//!
//! CRUD for depots, route fares and trips, plus the dirty-record bookkeeping
//! the sync agent relies on. Writes that touch more than one table run in a
//! single transaction.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const ROUTE_FARE_SELECT: &str = r#"
    SELECT r.id,
           r.origin_depot_id,
           o.name AS origin_name,
           r.destination_depot_id,
           d.name AS destination_name,
           r.base_price,
           r.auto_generated,
           r.updated_at
    FROM route_fares r
    JOIN depots o ON o.id = r.origin_depot_id
    JOIN depots d ON d.id = r.destination_depot_id
"#;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Depots & Routes =====

    /// Create a depot and seed placeholder fares towards every other depot
    pub async fn create_depot(&self, name: &str) -> Result<Depot> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let depot = sqlx::query_as::<_, Depot>(
            r#"
            INSERT INTO depots (name, created_at)
            VALUES (?, ?)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let seeded = sqlx::query(
            r#"
            INSERT OR IGNORE INTO route_fares
                (origin_depot_id, destination_depot_id, base_price, auto_generated, updated_at)
            SELECT ?, id, 0, 1, ? FROM depots WHERE id != ?
            UNION ALL
            SELECT id, ?, 0, 1, ? FROM depots WHERE id != ?
            "#,
        )
        .bind(depot.id)
        .bind(now)
        .bind(depot.id)
        .bind(depot.id)
        .bind(now)
        .bind(depot.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        tracing::debug!("Created depot {} ({} route pairs seeded)", depot.name, seeded);
        Ok(depot)
    }

    /// Find a depot by name, ignoring case
    pub async fn find_depot_by_name(&self, name: &str) -> Result<Option<Depot>> {
        let depot = sqlx::query_as::<_, Depot>("SELECT * FROM depots WHERE name = ? COLLATE NOCASE")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(depot)
    }

    pub async fn list_depots(&self) -> Result<Vec<Depot>> {
        let depots = sqlx::query_as::<_, Depot>("SELECT * FROM depots ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(depots)
    }

    /// Price an ordered depot pair, replacing any seeded placeholder
    pub async fn set_route_price(
        &self,
        origin_depot_id: i64,
        destination_depot_id: i64,
        base_price: f64,
    ) -> Result<RouteFare> {
        sqlx::query(
            r#"
            INSERT INTO route_fares
                (origin_depot_id, destination_depot_id, base_price, auto_generated, updated_at)
            VALUES (?, ?, ?, 0, ?)
            ON CONFLICT(origin_depot_id, destination_depot_id) DO UPDATE SET
                base_price = excluded.base_price,
                auto_generated = 0,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(origin_depot_id)
        .bind(destination_depot_id)
        .bind(base_price)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            "Set route price {} -> {} = {}",
            origin_depot_id,
            destination_depot_id,
            base_price
        );

        self.get_route_fare(origin_depot_id, destination_depot_id)
            .await?
            .ok_or_else(|| AppError::Generic("Route fare vanished after upsert".to_string()))
    }

    pub async fn get_route_fare(
        &self,
        origin_depot_id: i64,
        destination_depot_id: i64,
    ) -> Result<Option<RouteFare>> {
        let query = format!(
            "{} WHERE r.origin_depot_id = ? AND r.destination_depot_id = ?",
            ROUTE_FARE_SELECT
        );

        let fare = sqlx::query_as::<_, RouteFare>(&query)
            .bind(origin_depot_id)
            .bind(destination_depot_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(fare)
    }

    pub async fn list_route_fares(&self) -> Result<Vec<RouteFare>> {
        let query = format!("{} ORDER BY o.name, d.name", ROUTE_FARE_SELECT);

        let fares = sqlx::query_as::<_, RouteFare>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(fares)
    }

    // ===== Trips =====

    /// Insert or update a trip and mark its sync mirror dirty.
    ///
    /// The draft's fare must already be computed by the caller.
    pub async fn save_trip(&self, draft: &TripDraft) -> Result<Trip> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let trip = if draft.is_new() {
            sqlx::query_as::<_, Trip>(
                r#"
                INSERT INTO trips (
                    trip_date, container_no, origin, destination, container_size,
                    load_state, extra, vehicle_plate, notes,
                    base_fare, vat, withholding, total, created_at, updated_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(draft.trip_date)
            .bind(&draft.container_no)
            .bind(&draft.origin)
            .bind(&draft.destination)
            .bind(draft.container_size)
            .bind(draft.load_state)
            .bind(draft.extra)
            .bind(&draft.vehicle_plate)
            .bind(&draft.notes)
            .bind(draft.fare.base_fare)
            .bind(draft.fare.vat)
            .bind(draft.fare.withholding)
            .bind(draft.fare.total)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_as::<_, Trip>(
                r#"
                UPDATE trips SET
                    trip_date = ?, container_no = ?, origin = ?, destination = ?,
                    container_size = ?, load_state = ?, extra = ?, vehicle_plate = ?,
                    notes = ?, base_fare = ?, vat = ?, withholding = ?, total = ?,
                    updated_at = ?
                WHERE id = ? AND deleted_at IS NULL
                RETURNING *
                "#,
            )
            .bind(draft.trip_date)
            .bind(&draft.container_no)
            .bind(&draft.origin)
            .bind(&draft.destination)
            .bind(draft.container_size)
            .bind(draft.load_state)
            .bind(draft.extra)
            .bind(&draft.vehicle_plate)
            .bind(&draft.notes)
            .bind(draft.fare.base_fare)
            .bind(draft.fare.vat)
            .bind(draft.fare.withholding)
            .bind(draft.fare.total)
            .bind(now)
            .bind(draft.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::TripNotFound(draft.id))?
        };

        sqlx::query(
            r#"
            INSERT INTO sync_records (
                trip_id, remote_id, container_no, load_location, unload_location,
                container_size, load_state, vehicle_plate, notes,
                created_at, updated_at, dirty, deleted
            )
            VALUES (?, NULL, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 0)
            ON CONFLICT(trip_id) DO UPDATE SET
                container_no = excluded.container_no,
                load_location = excluded.load_location,
                unload_location = excluded.unload_location,
                container_size = excluded.container_size,
                load_state = excluded.load_state,
                vehicle_plate = excluded.vehicle_plate,
                notes = excluded.notes,
                updated_at = excluded.updated_at,
                dirty = 1
            "#,
        )
        .bind(trip.id)
        .bind(&trip.container_no)
        .bind(&trip.origin)
        .bind(&trip.destination)
        .bind(trip.container_size)
        .bind(trip.load_state)
        .bind(&trip.vehicle_plate)
        .bind(&trip.notes)
        .bind(trip.created_at)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Saved trip {} (sync mirror marked dirty)", trip.id);
        Ok(trip)
    }

    /// Get a trip by ID
    pub async fn get_trip(&self, id: i64) -> Result<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            SELECT * FROM trips WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::TripNotFound(id))?;

        Ok(trip)
    }

    /// List all trips (non-deleted), newest first
    pub async fn list_trips(&self) -> Result<Vec<Trip>> {
        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT * FROM trips
            WHERE deleted_at IS NULL
            ORDER BY trip_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    /// Soft delete a trip
    pub async fn delete_trip(&self, id: i64) -> Result<()> {
        let rows = sqlx::query(
            r#"
            UPDATE trips SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::TripNotFound(id));
        }

        tracing::debug!("Soft deleted trip: {}", id);
        Ok(())
    }

    // ===== Sync Records =====

    /// Dirty records, oldest edit first
    pub async fn list_dirty_sync_records(&self) -> Result<Vec<SyncRecord>> {
        let records = sqlx::query_as::<_, SyncRecord>(
            r#"
            SELECT * FROM sync_records
            WHERE dirty = 1
            ORDER BY updated_at ASC, trip_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn get_sync_record(&self, trip_id: i64) -> Result<Option<SyncRecord>> {
        let record = sqlx::query_as::<_, SyncRecord>("SELECT * FROM sync_records WHERE trip_id = ?")
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Store the remote id of a pushed record and clear its dirty flag.
    ///
    /// The flag is only cleared while `updated_at` still equals `pushed_version`;
    /// an edit that landed during the push keeps the record dirty. Returns
    /// whether the flag was cleared.
    pub async fn mark_synced(
        &self,
        trip_id: i64,
        remote_id: &str,
        pushed_version: DateTime<Utc>,
    ) -> Result<bool> {
        let cleared = sqlx::query(
            r#"
            UPDATE sync_records SET remote_id = ?, dirty = 0
            WHERE trip_id = ? AND updated_at = ?
            "#,
        )
        .bind(remote_id)
        .bind(trip_id)
        .bind(pushed_version)
        .execute(&self.pool)
        .await?
        .rows_affected()
            > 0;

        if !cleared {
            sqlx::query("UPDATE sync_records SET remote_id = ? WHERE trip_id = ?")
                .bind(remote_id)
                .bind(trip_id)
                .execute(&self.pool)
                .await?;
        }

        tracing::debug!(
            "Recorded remote id {} for trip {} (cleared: {})",
            remote_id,
            trip_id,
            cleared
        );
        Ok(cleared)
    }

    /// Whether the trip has been pushed at least once
    pub async fn has_remote_id(&self, trip_id: i64) -> Result<bool> {
        let has: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT remote_id IS NOT NULL AND remote_id != ''
            FROM sync_records WHERE trip_id = ?
            "#,
        )
        .bind(trip_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(has.unwrap_or(false))
    }

    /// Whether the remote copy is current: pushed and not edited since
    pub async fn is_synced(&self, trip_id: i64) -> Result<bool> {
        let synced: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT dirty = 0 AND remote_id IS NOT NULL AND remote_id != ''
            FROM sync_records WHERE trip_id = ?
            "#,
        )
        .bind(trip_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(synced.unwrap_or(false))
    }

    pub async fn ledger_summary(&self) -> Result<LedgerSummary> {
        let summary = sqlx::query_as::<_, LedgerSummary>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM trips WHERE deleted_at IS NULL) AS trips,
                (SELECT COALESCE(SUM(total), 0.0) FROM trips WHERE deleted_at IS NULL) AS revenue_total,
                (SELECT COUNT(*) FROM sync_records WHERE dirty = 1) AS pending_sync,
                (SELECT COUNT(*) FROM sync_records WHERE dirty = 0 AND remote_id IS NOT NULL AND remote_id != '') AS synced
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }
}
