//! `PostgreSQL` flight repository.

use crate::error::storage;
use chrono::NaiveDateTime;
use flightdeck_core::repository::{RepositoryFuture, Result};
use flightdeck_core::{
    AircraftId, Flight, FlightId, FlightRepository, FlightStatus, FlightUpdate, RepositoryError,
};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

/// Column order shared by every flight `SELECT`.
const FLIGHT_COLUMNS: &str = "id, departure, origin, destination, status, aircraft_id";

type FlightRow = (i64, NaiveDateTime, String, String, String, Option<i64>);

fn decode(row: FlightRow) -> Result<Flight> {
    let (id, departure, origin, destination, status, aircraft_id) = row;
    let status: FlightStatus = status
        .parse()
        .map_err(|e| RepositoryError::Decode(format!("flight {id}: {e}")))?;

    Ok(Flight {
        id: FlightId::new(id),
        departure,
        origin,
        destination,
        status,
        aircraft_id: aircraft_id.map(AircraftId::new),
    })
}

async fn upsert<'e, E: PgExecutor<'e>>(executor: E, flight: &Flight) -> Result<()> {
    sqlx::query(
        "INSERT INTO flights (id, departure, origin, destination, status, aircraft_id)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (id) DO UPDATE SET
            departure = EXCLUDED.departure,
            origin = EXCLUDED.origin,
            destination = EXCLUDED.destination,
            status = EXCLUDED.status,
            aircraft_id = EXCLUDED.aircraft_id",
    )
    .bind(flight.id.get())
    .bind(flight.departure)
    .bind(&flight.origin)
    .bind(&flight.destination)
    .bind(flight.status.as_str())
    .bind(flight.aircraft_id.map(AircraftId::get))
    .execute(executor)
    .await
    .map_err(|e| storage("Failed to save flight", &e))?;

    tracing::debug!(flight_id = %flight.id, status = %flight.status, "Flight saved");
    Ok(())
}

/// A flight row held under `SELECT ... FOR UPDATE` inside an open transaction.
///
/// Dropping it without committing rolls the transaction back.
struct PostgresFlightUpdate {
    tx: Transaction<'static, Postgres>,
    existing: Flight,
}

impl FlightUpdate for PostgresFlightUpdate {
    fn existing(&self) -> &Flight {
        &self.existing
    }

    fn commit<'a>(self: Box<Self>, proposed: &'a Flight) -> RepositoryFuture<'a, ()> {
        let Self { mut tx, .. } = *self;
        Box::pin(async move {
            upsert(&mut *tx, proposed).await?;
            tx.commit()
                .await
                .map_err(|e| storage("Failed to commit flight update", &e))
        })
    }
}

/// `PostgreSQL`-backed [`FlightRepository`].
#[derive(Clone)]
pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    /// Create a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_one(&self, id: FlightId) -> Result<Option<Flight>> {
        let row: Option<FlightRow> =
            sqlx::query_as(&format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = $1"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| storage("Failed to load flight", &e))?;

        row.map(decode).transpose()
    }

    async fn fetch_by_route(&self, origin: &str, destination: &str) -> Result<Vec<Flight>> {
        let rows: Vec<FlightRow> = sqlx::query_as(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights \
             WHERE origin = $1 AND destination = $2 ORDER BY departure, id"
        ))
        .bind(origin)
        .bind(destination)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("Failed to query flights by route", &e))?;

        rows.into_iter().map(decode).collect()
    }

    async fn fetch_by_departure(&self, departure: NaiveDateTime) -> Result<Vec<Flight>> {
        let rows: Vec<FlightRow> = sqlx::query_as(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights WHERE departure = $1 ORDER BY id"
        ))
        .bind(departure)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("Failed to query flights by departure", &e))?;

        rows.into_iter().map(decode).collect()
    }

    async fn upsert(&self, flight: &Flight) -> Result<()> {
        upsert(&self.pool, flight).await
    }

    async fn lock(&self, id: FlightId) -> Result<Option<Box<dyn FlightUpdate>>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("Failed to start transaction", &e))?;

        // Row lock held until commit or rollback
        let row: Option<FlightRow> = sqlx::query_as(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| storage("Failed to lock flight", &e))?;

        let Some(row) = row else {
            if let Err(e) = tx.rollback().await {
                tracing::warn!(flight_id = %id, error = %e, "Rollback failed");
            }
            return Ok(None);
        };

        let existing = decode(row)?;
        Ok(Some(Box::new(PostgresFlightUpdate { tx, existing })))
    }

    async fn delete(&self, id: FlightId) -> Result<()> {
        let result = sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| storage("Failed to delete flight", &e))?;

        tracing::debug!(flight_id = %id, rows = result.rows_affected(), "Flight deleted");
        Ok(())
    }
}

impl FlightRepository for PostgresFlightRepository {
    fn get_flight_by_id(&self, id: FlightId) -> RepositoryFuture<'_, Option<Flight>> {
        Box::pin(self.fetch_one(id))
    }

    fn get_flights_by_route<'a>(
        &'a self,
        origin: &'a str,
        destination: &'a str,
    ) -> RepositoryFuture<'a, Vec<Flight>> {
        Box::pin(self.fetch_by_route(origin, destination))
    }

    fn get_flights_by_departure(
        &self,
        departure: NaiveDateTime,
    ) -> RepositoryFuture<'_, Vec<Flight>> {
        Box::pin(self.fetch_by_departure(departure))
    }

    fn lock_flight_for_update(
        &self,
        id: FlightId,
    ) -> RepositoryFuture<'_, Option<Box<dyn FlightUpdate>>> {
        Box::pin(self.lock(id))
    }

    fn save_flight<'a>(&'a self, flight: &'a Flight) -> RepositoryFuture<'a, ()> {
        Box::pin(self.upsert(flight))
    }

    fn delete_flight_by_id(&self, id: FlightId) -> RepositoryFuture<'_, ()> {
        Box::pin(self.delete(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightdeck_testing::fixtures::at;

    #[test]
    fn unknown_status_is_a_decode_error() {
        let row = (
            1,
            at("2024-05-01T10:00"),
            "NYC".to_string(),
            "LON".to_string(),
            "Teleported".to_string(),
            None,
        );
        assert!(matches!(decode(row), Err(RepositoryError::Decode(_))));
    }

    #[test]
    fn rows_decode_into_flights() {
        let row = (
            7,
            at("2024-05-01T10:00"),
            "NYC".to_string(),
            "LON".to_string(),
            "Delayed".to_string(),
            Some(3),
        );
        let flight = decode(row);
        assert!(matches!(
            flight,
            Ok(Flight {
                status: FlightStatus::Delayed,
                aircraft_id: Some(id),
                ..
            }) if id == AircraftId::new(3)
        ));
    }
}
