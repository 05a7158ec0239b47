//! Application services: the operations the HTTP surface exposes.
//!
//! - [`FlightService`]: flight CRUD, the orchestrated update and seat queries
//! - [`AircraftService`]: aircraft CRUD

mod services;

pub use services::{AircraftService, FlightService, ServiceError};
