//! `PostgreSQL` aircraft repository.
//!
//! An aircraft is stored as one `aircraft` row plus one `seats` row per seat.
//! Seat order is kept in the `position` column so the inventory reads back in
//! the order it was written.

use crate::error::storage;
use flightdeck_core::repository::{RepositoryFuture, Result};
use flightdeck_core::{
    Aircraft, AircraftId, AircraftRepository, RepositoryError, Seat, SeatCategory, SeatId,
};
use sqlx::PgPool;
use std::collections::BTreeMap;

type SeatRow = (i64, i64, String, bool, bool);

fn decode_seat(row: SeatRow) -> Result<(AircraftId, Seat)> {
    let (id, aircraft_id, category, is_registered, is_sold) = row;
    let category: SeatCategory = category
        .parse()
        .map_err(|e| RepositoryError::Decode(format!("seat {id}: {e}")))?;

    Ok((
        AircraftId::new(aircraft_id),
        Seat {
            id: SeatId::new(id),
            category,
            is_registered,
            is_sold,
        },
    ))
}

/// `PostgreSQL`-backed [`AircraftRepository`].
#[derive(Clone)]
pub struct PostgresAircraftRepository {
    pool: PgPool,
}

impl PostgresAircraftRepository {
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

    async fn fetch_all(&self) -> Result<Vec<Aircraft>> {
        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, model FROM aircraft ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage("Failed to list aircraft", &e))?;

        let seat_rows: Vec<SeatRow> = sqlx::query_as(
            "SELECT id, aircraft_id, category, is_registered, is_sold
             FROM seats ORDER BY aircraft_id, position",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("Failed to list seats", &e))?;

        let mut seats: BTreeMap<AircraftId, Vec<Seat>> = BTreeMap::new();
        for row in seat_rows {
            let (aircraft_id, seat) = decode_seat(row)?;
            seats.entry(aircraft_id).or_default().push(seat);
        }

        Ok(rows
            .into_iter()
            .map(|(id, model)| {
                let id = AircraftId::new(id);
                Aircraft {
                    id,
                    model,
                    seats: seats.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn fetch_one(&self, id: AircraftId) -> Result<Option<Aircraft>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT model FROM aircraft WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("Failed to load aircraft", &e))?;

        let Some((model,)) = row else {
            return Ok(None);
        };

        let seat_rows: Vec<SeatRow> = sqlx::query_as(
            "SELECT id, aircraft_id, category, is_registered, is_sold
             FROM seats WHERE aircraft_id = $1 ORDER BY position",
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("Failed to load seats", &e))?;

        let seats = seat_rows
            .into_iter()
            .map(|row| decode_seat(row).map(|(_, seat)| seat))
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Aircraft { id, model, seats }))
    }

    async fn upsert(&self, aircraft: &Aircraft) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("Failed to begin transaction", &e))?;

        sqlx::query(
            "INSERT INTO aircraft (id, model) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET model = EXCLUDED.model",
        )
        .bind(aircraft.id.get())
        .bind(&aircraft.model)
        .execute(&mut *tx)
        .await
        .map_err(|e| storage("Failed to save aircraft", &e))?;

        sqlx::query("DELETE FROM seats WHERE aircraft_id = $1")
            .bind(aircraft.id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("Failed to clear seats", &e))?;

        for (position, seat) in aircraft.seats.iter().enumerate() {
            let position = i32::try_from(position).map_err(|e| {
                RepositoryError::Database(format!("Seat position overflow: {e}"))
            })?;

            sqlx::query(
                "INSERT INTO seats (id, aircraft_id, position, category, is_registered, is_sold)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(seat.id.get())
            .bind(aircraft.id.get())
            .bind(position)
            .bind(seat.category.as_str())
            .bind(seat.is_registered)
            .bind(seat.is_sold)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage("Failed to save seat", &e))?;
        }

        tx.commit()
            .await
            .map_err(|e| storage("Failed to commit aircraft", &e))?;

        tracing::debug!(
            aircraft_id = %aircraft.id,
            seats = aircraft.seats.len(),
            "Aircraft saved"
        );
        Ok(())
    }

    async fn delete(&self, id: AircraftId) -> Result<()> {
        let result = sqlx::query("DELETE FROM aircraft WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| storage("Failed to delete aircraft", &e))?;

        tracing::debug!(aircraft_id = %id, rows = result.rows_affected(), "Aircraft deleted");
        Ok(())
    }
}

impl AircraftRepository for PostgresAircraftRepository {
    fn list_aircraft(&self) -> RepositoryFuture<'_, Vec<Aircraft>> {
        Box::pin(self.fetch_all())
    }

    fn get_aircraft_by_id(&self, id: AircraftId) -> RepositoryFuture<'_, Option<Aircraft>> {
        Box::pin(self.fetch_one(id))
    }

    fn save_aircraft<'a>(&'a self, aircraft: &'a Aircraft) -> RepositoryFuture<'a, ()> {
        Box::pin(self.upsert(aircraft))
    }

    fn delete_aircraft_by_id(&self, id: AircraftId) -> RepositoryFuture<'_, ()> {
        Box::pin(self.delete(id))
    }
}
