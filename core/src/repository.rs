//! Persistence accessors.
//!
//! Thin read/write contracts over the relational store. Lookups by id return
//! `Option`: absence is an ordinary outcome that callers must branch on, never a
//! fault. Saves are insert-or-replace keyed by id and overwrite every field.
//!
//! An orchestrated update goes through [`FlightRepository::lock_flight_for_update`]:
//! the stored read, the caller's work and the write share one unit of work, and
//! concurrent updates of the same flight are serialized.
//!
//! # Implementations
//!
//! - `PostgresFlightRepository` / `PostgresAircraftRepository` (in `flightdeck-postgres`)
//! - `InMemoryFlightRepository` / `InMemoryAircraftRepository` (in `flightdeck-testing`)

use crate::types::{Aircraft, AircraftId, Flight, FlightId};
use chrono::NaiveDateTime;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors raised by persistence accessors.
#[derive(Error, Debug, Clone)]
pub enum RepositoryError {
    /// The datastore could not be reached or the statement failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A stored row could not be turned back into a domain value.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The write would break a reference held by another record.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Boxed future returned by repository methods.
pub type RepositoryFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// A stored flight locked for replacement.
///
/// Holding the value keeps concurrent updates of the same flight waiting.
/// [`commit`](Self::commit) writes the replacement and releases the lock;
/// dropping the value without committing releases it with nothing written.
pub trait FlightUpdate: Send {
    /// The flight as stored when the lock was taken.
    fn existing(&self) -> &Flight;

    /// Replace the locked flight with `proposed` and release the lock.
    fn commit<'a>(self: Box<Self>, proposed: &'a Flight) -> RepositoryFuture<'a, ()>;
}

/// Read/write access to stored flights.
pub trait FlightRepository: Send + Sync {
    /// Load one flight.
    fn get_flight_by_id(&self, id: FlightId) -> RepositoryFuture<'_, Option<Flight>>;

    /// All flights between `origin` and `destination`, any date.
    fn get_flights_by_route<'a>(
        &'a self,
        origin: &'a str,
        destination: &'a str,
    ) -> RepositoryFuture<'a, Vec<Flight>>;

    /// Flights departing exactly at `departure`.
    fn get_flights_by_departure(
        &self,
        departure: NaiveDateTime,
    ) -> RepositoryFuture<'_, Vec<Flight>>;

    /// Lock one flight for a read-then-replace update.
    ///
    /// Returns `None`, holding no lock, when the flight does not exist.
    fn lock_flight_for_update(
        &self,
        id: FlightId,
    ) -> RepositoryFuture<'_, Option<Box<dyn FlightUpdate>>>;

    /// Insert or fully replace the flight with `flight.id`.
    fn save_flight<'a>(&'a self, flight: &'a Flight) -> RepositoryFuture<'a, ()>;

    /// Remove the flight if present. Removing a missing flight is not an error.
    fn delete_flight_by_id(&self, id: FlightId) -> RepositoryFuture<'_, ()>;
}

/// Read/write access to stored aircraft and their seat inventories.
pub trait AircraftRepository: Send + Sync {
    /// Every aircraft, ordered by id.
    fn list_aircraft(&self) -> RepositoryFuture<'_, Vec<Aircraft>>;

    /// Load one aircraft with its seats.
    fn get_aircraft_by_id(&self, id: AircraftId) -> RepositoryFuture<'_, Option<Aircraft>>;

    /// Insert or fully replace the aircraft; its seat list replaces the stored one.
    fn save_aircraft<'a>(&'a self, aircraft: &'a Aircraft) -> RepositoryFuture<'a, ()>;

    /// Remove the aircraft and its seats if present.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] when a flight still references it.
    fn delete_aircraft_by_id(&self, id: AircraftId) -> RepositoryFuture<'_, ()>;
}
