//! Free-seat queries for a flight's aircraft.
//!
//! - GET /api/flights/:id/seats/free
//! - GET /api/flights/:id/seats/free/economy
//! - GET /api/flights/:id/seats/free/business

use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use flightdeck_core::{FlightId, Seat, SeatCategory};
use flightdeck_web::AppError;

async fn free_seats_for(
    state: &AppState,
    id: i64,
    category: Option<SeatCategory>,
) -> Result<Json<Vec<Seat>>, AppError> {
    let seats = state.flights.free_seats(FlightId::new(id), category).await?;
    Ok(Json(seats))
}

/// All free seats on the flight.
///
/// # Errors
///
/// Returns 404 if the flight or its aircraft does not exist.
pub async fn free_seats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Seat>>, AppError> {
    free_seats_for(&state, id, None).await
}

/// Free Economy seats on the flight.
///
/// # Errors
///
/// Returns 404 if the flight or its aircraft does not exist.
pub async fn free_economy_seats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Seat>>, AppError> {
    free_seats_for(&state, id, Some(SeatCategory::Economy)).await
}

/// Free Business seats on the flight.
///
/// # Errors
///
/// Returns 404 if the flight or its aircraft does not exist.
pub async fn free_business_seats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Seat>>, AppError> {
    free_seats_for(&state, id, Some(SeatCategory::Business)).await
}
