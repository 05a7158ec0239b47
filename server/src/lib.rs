//! Flightdeck server: the HTTP surface of the airline-operations backend.
//!
//! Wires the core domain to its collaborators and exposes it over HTTP:
//!
//! - **Aircraft** with their seat inventories (CRUD)
//! - **Flights** (CRUD, route/date search, exact departure lookup)
//! - **Orchestrated updates**: a flight update publishes status-change and
//!   aircraft-reassignment notifications before the new values are written
//! - **Free-seat queries** over a flight's aircraft
//!
//! # Architecture
//!
//! ```text
//!  HTTP (axum)
//!      │
//!      ▼
//! ┌──────────────┐   detect_changes   ┌──────────────────────┐
//! │ FlightService│───────────────────▶│ FlightEventPublisher │──▶ EventBus (Redpanda)
//! │ AircraftSvc  │                    └──────────────────────┘
//! └──────────────┘
//!      │ save / query
//!      ▼
//! FlightRepository / AircraftRepository (PostgreSQL)
//! ```
//!
//! Collaborators are injected as trait objects, so the router can be built on
//! in-memory repositories and a recording publisher in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod app;
pub mod config;
pub mod metrics;
pub mod server;

pub use app::{AircraftService, FlightService, ServiceError};
pub use config::{Config, ConfigError};
pub use server::{AppState, build_router};
