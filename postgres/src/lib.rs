//! `PostgreSQL` persistence accessors for Flightdeck.
//!
//! This crate implements the `FlightRepository` and `AircraftRepository`
//! traits from `flightdeck-core` on top of a sqlx [`PgPool`]:
//!
//! - Insert-or-replace writes keyed by id (`ON CONFLICT ... DO UPDATE`)
//! - Aircraft seat lists replaced atomically in one transaction
//! - Foreign-key and uniqueness violations reported as `RepositoryError::Conflict`
//! - Embedded migrations via [`migrate`]
//!
//! # Example
//!
//! ```no_run
//! use flightdeck_postgres::{PostgresAircraftRepository, PostgresFlightRepository};
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgres://localhost/flightdeck").await?;
//! flightdeck_postgres::migrate(&pool).await?;
//!
//! let flights = PostgresFlightRepository::new(pool.clone());
//! let aircraft = PostgresAircraftRepository::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aircraft;
mod error;
mod flights;

pub use aircraft::PostgresAircraftRepository;
pub use flights::PostgresFlightRepository;

use flightdeck_core::RepositoryError;
use sqlx::PgPool;

/// Apply the embedded schema migrations.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Migration failed: {e}")))?;

    tracing::info!("Database migrations applied");
    Ok(())
}

/// Round-trip a trivial statement to check the pool can reach the database.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Database ping failed: {e}")))?;
    Ok(())
}
