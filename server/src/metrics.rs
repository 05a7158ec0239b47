//! Business metrics for Flightdeck.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `flightdeck_flight_updates_total` - Orchestrated flight updates that were written
//! - `flightdeck_flight_events_published_total{kind}` - Notifications dispatched by kind
//! - `flightdeck_aircraft_operations_total{operation}` - Aircraft writes by operation
//!
//! ## Histograms
//! - `flightdeck_flight_update_duration_seconds` - Time from lookup to write of an update

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and register metric descriptions.
///
/// # Errors
///
/// Returns [`BuildError`] if a global recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

/// Register all metric descriptions.
///
/// Call once at startup, after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "flightdeck_flight_updates_total",
        "Total number of orchestrated flight updates written"
    );
    describe_counter!(
        "flightdeck_flight_events_published_total",
        "Total number of flight notifications published by kind (status_changed, aircraft_reassigned)"
    );
    describe_counter!(
        "flightdeck_aircraft_operations_total",
        "Total number of aircraft writes by operation (created, updated, deleted)"
    );
    describe_histogram!(
        "flightdeck_flight_update_duration_seconds",
        "Time taken by an orchestrated flight update, publishing included"
    );

    tracing::info!("Business metrics registered");
}

/// Record a written flight update.
pub fn record_flight_update(duration_secs: f64) {
    metrics::counter!("flightdeck_flight_updates_total").increment(1);
    metrics::histogram!("flightdeck_flight_update_duration_seconds").record(duration_secs);
    tracing::debug!(duration_secs, "Recorded flight_update metric");
}

/// Record a published flight notification.
pub fn record_event_published(kind: &'static str) {
    metrics::counter!("flightdeck_flight_events_published_total", "kind" => kind).increment(1);
}

/// Record an aircraft write.
pub fn record_aircraft_operation(operation: &'static str) {
    metrics::counter!("flightdeck_aircraft_operations_total", "operation" => operation)
        .increment(1);
}
