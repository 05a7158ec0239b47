//! Application state for the Flightdeck HTTP server.

use crate::app::{AircraftService, FlightService};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via `Arc`) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Flight operations
    pub flights: Arc<FlightService>,

    /// Aircraft operations
    pub aircraft: Arc<AircraftService>,

    /// Pool pinged by the readiness check; `None` when running on in-memory storage
    pub database: Option<PgPool>,

    /// Prometheus handle rendered at `/metrics`; `None` when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create application state without a readiness database or metrics endpoint.
    #[must_use]
    pub fn new(flights: FlightService, aircraft: AircraftService) -> Self {
        Self {
            flights: Arc::new(flights),
            aircraft: Arc::new(aircraft),
            database: None,
            metrics: None,
        }
    }

    /// Ping `pool` for readiness.
    #[must_use]
    pub fn with_database(mut self, pool: PgPool) -> Self {
        self.database = Some(pool);
        self
    }

    /// Serve `handle` at `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
