//! Router configuration for the Flightdeck server.

use super::health::{health_check, metrics_endpoint, readiness_check};
use super::state::AppState;
use crate::api::{aircraft, flights, seats};
use axum::{
    Router,
    routing::{get, post},
};
use flightdeck_web::correlation_id_layer;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Health and metrics endpoints sit at the root, the API under `/api`. Every
/// request is traced and carries a correlation ID.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Aircraft
        .route(
            "/aircraft",
            get(aircraft::list_aircraft)
                .post(aircraft::create_aircraft)
                .put(aircraft::update_aircraft),
        )
        .route(
            "/aircraft/:id",
            get(aircraft::get_aircraft).delete(aircraft::delete_aircraft),
        )
        // Flights
        .route(
            "/flights",
            post(flights::create_flight).put(flights::update_flight),
        )
        .route("/flights/search", get(flights::search_flights))
        .route("/flights/departures", get(flights::list_departures))
        .route(
            "/flights/:id",
            get(flights::get_flight).delete(flights::delete_flight),
        )
        // Seats
        .route("/flights/:id/seats/free", get(seats::free_seats))
        .route(
            "/flights/:id/seats/free/economy",
            get(seats::free_economy_seats),
        )
        .route(
            "/flights/:id/seats/free/business",
            get(seats::free_business_seats),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
