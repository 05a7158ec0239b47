//! Fixture builders for flights, aircraft and seats.
//!
//! Timestamps are written as `"YYYY-MM-DDTHH:MM"` strings to keep test bodies
//! readable; a malformed literal is a bug in the test and panics.

#![allow(clippy::expect_used)] // Test infrastructure panics on malformed literals

use chrono::{NaiveDate, NaiveDateTime};
use flightdeck_core::{
    Aircraft, AircraftId, Flight, FlightId, FlightStatus, Seat, SeatCategory, SeatId,
};

/// Parse a `"YYYY-MM-DDTHH:MM"` literal.
///
/// # Panics
///
/// Panics if `literal` is not in that format.
#[must_use]
pub fn at(literal: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(literal, "%Y-%m-%dT%H:%M")
        .expect("timestamp literal should be YYYY-MM-DDTHH:MM")
}

/// Parse a `"YYYY-MM-DD"` literal.
///
/// # Panics
///
/// Panics if `literal` is not in that format.
#[must_use]
pub fn day(literal: &str) -> NaiveDate {
    NaiveDate::parse_from_str(literal, "%Y-%m-%d").expect("date literal should be YYYY-MM-DD")
}

/// A seat with explicit flags.
#[must_use]
pub const fn seat(id: i64, category: SeatCategory, is_registered: bool, is_sold: bool) -> Seat {
    Seat {
        id: SeatId::new(id),
        category,
        is_registered,
        is_sold,
    }
}

/// A free economy seat.
#[must_use]
pub const fn economy(id: i64) -> Seat {
    Seat::new(SeatId::new(id), SeatCategory::Economy)
}

/// A free business seat.
#[must_use]
pub const fn business(id: i64) -> Seat {
    Seat::new(SeatId::new(id), SeatCategory::Business)
}

/// An A320 with the given seats.
#[must_use]
pub fn aircraft(id: i64, seats: Vec<Seat>) -> Aircraft {
    Aircraft {
        id: AircraftId::new(id),
        model: "A320".to_string(),
        seats,
    }
}

/// Fluent [`Flight`] builder.
///
/// Defaults: NYC to LON departing 2024-05-01 10:00, scheduled, no aircraft.
///
/// ```
/// use flightdeck_core::FlightStatus;
/// use flightdeck_testing::fixtures::FlightBuilder;
///
/// let flight = FlightBuilder::new(7)
///     .route("BOS", "PAR")
///     .status(FlightStatus::Delayed)
///     .aircraft(3)
///     .build();
///
/// assert_eq!(flight.origin, "BOS");
/// ```
#[derive(Clone, Debug)]
pub struct FlightBuilder {
    flight: Flight,
}

impl FlightBuilder {
    /// Start a builder for flight `id`
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            flight: Flight {
                id: FlightId::new(id),
                departure: at("2024-05-01T10:00"),
                origin: "NYC".to_string(),
                destination: "LON".to_string(),
                status: FlightStatus::Scheduled,
                aircraft_id: None,
            },
        }
    }

    /// Set origin and destination
    #[must_use]
    pub fn route(mut self, origin: &str, destination: &str) -> Self {
        self.flight.origin = origin.to_string();
        self.flight.destination = destination.to_string();
        self
    }

    /// Set the departure from a `"YYYY-MM-DDTHH:MM"` literal
    #[must_use]
    pub fn departing(mut self, literal: &str) -> Self {
        self.flight.departure = at(literal);
        self
    }

    /// Set the status
    #[must_use]
    pub const fn status(mut self, status: FlightStatus) -> Self {
        self.flight.status = status;
        self
    }

    /// Assign an aircraft
    #[must_use]
    pub const fn aircraft(mut self, id: i64) -> Self {
        self.flight.aircraft_id = Some(AircraftId::new(id));
        self
    }

    /// Clear the aircraft assignment
    #[must_use]
    pub const fn without_aircraft(mut self) -> Self {
        self.flight.aircraft_id = None;
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Flight {
        self.flight
    }
}
