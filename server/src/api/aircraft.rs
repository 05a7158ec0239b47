//! Aircraft API endpoints.
//!
//! - GET /api/aircraft - List every aircraft (404 when there are none)
//! - GET /api/aircraft/:id - Get one aircraft with its seats
//! - POST /api/aircraft - Create an aircraft
//! - PUT /api/aircraft - Replace a stored aircraft
//! - DELETE /api/aircraft/:id - Delete an aircraft, returning it as it was

use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use flightdeck_core::{Aircraft, AircraftId};
use flightdeck_web::{ApiJson, AppError};

/// List every aircraft.
///
/// # Errors
///
/// Returns 404 when no aircraft are stored.
pub async fn list_aircraft(State(state): State<AppState>) -> Result<Json<Vec<Aircraft>>, AppError> {
    let aircraft = state.aircraft.list().await?;
    if aircraft.is_empty() {
        return Err(AppError::no_results("No aircraft found"));
    }
    Ok(Json(aircraft))
}

/// Get one aircraft.
///
/// # Errors
///
/// Returns 404 if the aircraft does not exist.
pub async fn get_aircraft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Aircraft>, AppError> {
    Ok(Json(state.aircraft.get(AircraftId::new(id)).await?))
}

/// Create an aircraft.
///
/// # Errors
///
/// Returns 400 for a malformed body, 503 if the database is unavailable.
pub async fn create_aircraft(
    State(state): State<AppState>,
    ApiJson(aircraft): ApiJson<Aircraft>,
) -> Result<(StatusCode, Json<Aircraft>), AppError> {
    state.aircraft.create(&aircraft).await?;
    Ok((StatusCode::CREATED, Json(aircraft)))
}

/// Replace a stored aircraft.
///
/// # Errors
///
/// Returns 404 if the aircraft does not exist.
pub async fn update_aircraft(
    State(state): State<AppState>,
    ApiJson(aircraft): ApiJson<Aircraft>,
) -> Result<Json<Aircraft>, AppError> {
    state.aircraft.update(&aircraft).await?;
    Ok(Json(aircraft))
}

/// Delete an aircraft.
///
/// # Errors
///
/// Returns 404 if the aircraft does not exist, 409 if a flight still uses it.
pub async fn delete_aircraft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Aircraft>, AppError> {
    Ok(Json(state.aircraft.delete(AircraftId::new(id)).await?))
}
