//! # Flightdeck Core
//!
//! Domain types and business rules for the Flightdeck airline-operations backend.
//!
//! This crate holds everything that does not perform I/O:
//!
//! - **Types**: [`Aircraft`](types::Aircraft), [`Flight`](types::Flight),
//!   [`Seat`](types::Seat) and their identifiers and enumerations
//! - **Seat filter**: free-seat views over an aircraft's seat inventory
//! - **Change detector**: stored-vs-proposed flight comparison
//! - **Collaborator traits**: persistence accessors, the flight event publisher,
//!   the event bus and the clock, all injected by the application
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌─────────────────────┐
//! │ HTTP surface │───▶│  FlightService   │───▶│   Change Detector   │
//! └──────────────┘    │  (orchestrator)  │    └─────────────────────┘
//!                     │                  │───▶ FlightEventPublisher ──▶ EventBus
//!                     │                  │───▶ FlightRepository (save)
//!                     └──────────────────┘
//! ```
//!
//! The orchestrator itself lives in the server crate; this crate only defines the
//! pieces it sequences.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod detector;
pub mod environment;
pub mod event;
pub mod event_bus;
pub mod publisher;
pub mod repository;
pub mod seats;
pub mod types;

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
pub use detector::{FlightChanges, detect_changes};
pub use publisher::{EventBusFlightPublisher, FlightEvent, FlightEventPublisher, PublishError};
pub use repository::{AircraftRepository, FlightRepository, FlightUpdate, RepositoryError};
pub use types::{
    Aircraft, AircraftId, Flight, FlightId, FlightStatus, Seat, SeatCategory, SeatId,
};
