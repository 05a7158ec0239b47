//! Flight and aircraft services.
//!
//! Services sit between the HTTP handlers and the injected collaborators
//! (repositories and the flight event publisher). [`FlightService::update`] is
//! the update orchestrator:
//!
//! 1. Lock the stored flight; refuse the update if there is none
//! 2. Detect status and aircraft changes
//! 3. Refuse a reassignment to an aircraft that is not stored
//! 4. Publish a notification per detected change, carrying the proposed flight
//! 5. Write the proposed flight and release the lock
//!
//! Steps 1 to 5 run in one unit of work, so concurrent updates of the same
//! flight are serialized. Notifications go out before the write. A publishing
//! failure aborts the update and the stored flight is left untouched.

use crate::metrics;
use flightdeck_core::seats::free_seats_in;
use flightdeck_core::{
    Aircraft, AircraftId, AircraftRepository, Flight, FlightChanges, FlightEventPublisher,
    FlightId, FlightRepository, NaiveDate, NaiveDateTime, PublishError, RepositoryError, Seat,
    SeatCategory, detect_changes,
};
use flightdeck_web::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Errors returned by the application services.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No flight is stored under this id.
    #[error("Flight {0} not found")]
    FlightNotFound(FlightId),

    /// No aircraft is stored under this id.
    #[error("Aircraft {0} not found")]
    AircraftNotFound(AircraftId),

    /// Persistence failed
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Notification dispatch failed
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::FlightNotFound(id) => Self::not_found("Flight", id),
            ServiceError::AircraftNotFound(id) => Self::not_found("Aircraft", id),
            ServiceError::Repository(e) => e.into(),
            ServiceError::Publish(e) => e.into(),
        }
    }
}

/// Flight operations.
#[derive(Clone)]
pub struct FlightService {
    flights: Arc<dyn FlightRepository>,
    aircraft: Arc<dyn AircraftRepository>,
    publisher: Arc<dyn FlightEventPublisher>,
}

impl FlightService {
    /// Create a flight service over the given collaborators.
    #[must_use]
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        aircraft: Arc<dyn AircraftRepository>,
        publisher: Arc<dyn FlightEventPublisher>,
    ) -> Self {
        Self {
            flights,
            aircraft,
            publisher,
        }
    }

    /// Load one flight. Absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] if the lookup fails.
    pub async fn find_by_id(&self, id: FlightId) -> Result<Option<Flight>, ServiceError> {
        let flight = self.flights.get_flight_by_id(id).await?;
        if flight.is_none() {
            tracing::warn!(flight_id = %id, "Flight not found");
        }
        Ok(flight)
    }

    /// Flights between `origin` and `destination` departing on `date`,
    /// whatever the time of day.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] if the lookup fails.
    pub async fn find_by_route_and_date(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Flight>, ServiceError> {
        let flights = self
            .flights
            .get_flights_by_route(origin, destination)
            .await?
            .into_iter()
            .filter(|flight| flight.departure.date() == date)
            .collect();
        Ok(flights)
    }

    /// Flights departing exactly at `departure`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] if the lookup fails.
    pub async fn find_by_departure(
        &self,
        departure: NaiveDateTime,
    ) -> Result<Vec<Flight>, ServiceError> {
        Ok(self.flights.get_flights_by_departure(departure).await?)
    }

    /// Insert or replace a flight without change detection.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] if the write fails, including a
    /// conflict when the referenced aircraft does not exist.
    pub async fn save(&self, flight: &Flight) -> Result<(), ServiceError> {
        self.flights.save_flight(flight).await?;
        tracing::info!(flight_id = %flight.id, "Flight saved");
        Ok(())
    }

    /// Apply a full replacement of a stored flight, notifying subscribers of
    /// status and aircraft changes before writing it.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::FlightNotFound`] if no flight has `proposed.id`; nothing
    ///   is published or written
    /// - [`ServiceError::AircraftNotFound`] if the flight is reassigned to an
    ///   aircraft that is not stored; nothing is published or written
    /// - [`ServiceError::Publish`] if a notification fails; nothing is written
    /// - [`ServiceError::Repository`] if the lookup or the write fails
    pub async fn update(&self, proposed: &Flight) -> Result<FlightChanges, ServiceError> {
        let started = Instant::now();

        let Some(update) = self.flights.lock_flight_for_update(proposed.id).await? else {
            tracing::warn!(flight_id = %proposed.id, "Update rejected: flight not found");
            return Err(ServiceError::FlightNotFound(proposed.id));
        };

        let changes = detect_changes(update.existing(), proposed);
        tracing::debug!(
            flight_id = %proposed.id,
            status_changed = changes.status_changed,
            aircraft_changed = changes.aircraft_changed,
            "Detected flight changes"
        );

        if changes.aircraft_changed {
            if let Some(aircraft_id) = proposed.aircraft_id {
                if self.aircraft.get_aircraft_by_id(aircraft_id).await?.is_none() {
                    tracing::warn!(
                        flight_id = %proposed.id,
                        aircraft_id = %aircraft_id,
                        "Update rejected: aircraft not found"
                    );
                    return Err(ServiceError::AircraftNotFound(aircraft_id));
                }
            }
        }

        if changes.status_changed {
            self.publisher.publish_status_changed(proposed).await?;
            metrics::record_event_published("status_changed");
        }
        if changes.aircraft_changed {
            self.publisher.publish_aircraft_reassigned(proposed).await?;
            metrics::record_event_published("aircraft_reassigned");
        }

        update.commit(proposed).await?;
        metrics::record_flight_update(started.elapsed().as_secs_f64());

        tracing::info!(
            flight_id = %proposed.id,
            status = %proposed.status,
            "Flight updated"
        );
        Ok(changes)
    }

    /// Remove a flight. Removing a missing flight is not an error and no
    /// notification is sent either way.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] if the delete fails.
    pub async fn delete_by_id(&self, id: FlightId) -> Result<(), ServiceError> {
        self.flights.delete_flight_by_id(id).await?;
        tracing::info!(flight_id = %id, "Flight deleted");
        Ok(())
    }

    /// Free seats on a flight's aircraft, optionally restricted to one category.
    ///
    /// A flight with no assigned aircraft has no free seats.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::FlightNotFound`] if the flight does not exist
    /// - [`ServiceError::AircraftNotFound`] if its aircraft no longer exists
    /// - [`ServiceError::Repository`] if a lookup fails
    pub async fn free_seats(
        &self,
        id: FlightId,
        category: Option<SeatCategory>,
    ) -> Result<Vec<Seat>, ServiceError> {
        let flight = self
            .flights
            .get_flight_by_id(id)
            .await?
            .ok_or(ServiceError::FlightNotFound(id))?;

        let Some(aircraft_id) = flight.aircraft_id else {
            return Ok(Vec::new());
        };

        let aircraft = self
            .aircraft
            .get_aircraft_by_id(aircraft_id)
            .await?
            .ok_or(ServiceError::AircraftNotFound(aircraft_id))?;

        Ok(free_seats_in(&aircraft.seats, category).cloned().collect())
    }
}

/// Aircraft operations.
#[derive(Clone)]
pub struct AircraftService {
    aircraft: Arc<dyn AircraftRepository>,
}

impl AircraftService {
    /// Create an aircraft service over `aircraft`.
    #[must_use]
    pub fn new(aircraft: Arc<dyn AircraftRepository>) -> Self {
        Self { aircraft }
    }

    /// Every aircraft, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] if the lookup fails.
    pub async fn list(&self) -> Result<Vec<Aircraft>, ServiceError> {
        Ok(self.aircraft.list_aircraft().await?)
    }

    /// Load one aircraft with its seats.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::AircraftNotFound`] if it does not exist.
    pub async fn get(&self, id: AircraftId) -> Result<Aircraft, ServiceError> {
        self.aircraft
            .get_aircraft_by_id(id)
            .await?
            .ok_or(ServiceError::AircraftNotFound(id))
    }

    /// Insert or replace an aircraft and its seat inventory.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] if the write fails.
    pub async fn create(&self, aircraft: &Aircraft) -> Result<(), ServiceError> {
        self.aircraft.save_aircraft(aircraft).await?;
        metrics::record_aircraft_operation("created");
        tracing::info!(
            aircraft_id = %aircraft.id,
            seats = aircraft.seats.len(),
            "Aircraft created"
        );
        Ok(())
    }

    /// Replace a stored aircraft and its seat inventory.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::AircraftNotFound`] if it does not exist, or
    /// [`ServiceError::Repository`] if the write fails.
    pub async fn update(&self, aircraft: &Aircraft) -> Result<(), ServiceError> {
        if self.aircraft.get_aircraft_by_id(aircraft.id).await?.is_none() {
            tracing::warn!(aircraft_id = %aircraft.id, "Update rejected: aircraft not found");
            return Err(ServiceError::AircraftNotFound(aircraft.id));
        }

        self.aircraft.save_aircraft(aircraft).await?;
        metrics::record_aircraft_operation("updated");
        tracing::info!(aircraft_id = %aircraft.id, "Aircraft updated");
        Ok(())
    }

    /// Remove an aircraft and return it as it was.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::AircraftNotFound`] if it does not exist
    /// - [`ServiceError::Repository`] with a conflict if a flight still uses it
    pub async fn delete(&self, id: AircraftId) -> Result<Aircraft, ServiceError> {
        let aircraft = self.get(id).await?;
        self.aircraft.delete_aircraft_by_id(id).await?;
        metrics::record_aircraft_operation("deleted");
        tracing::info!(aircraft_id = %id, "Aircraft deleted");
        Ok(aircraft)
    }
}
