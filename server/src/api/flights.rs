//! Flight API endpoints.
//!
//! - GET /api/flights/:id - Get one flight
//! - POST /api/flights - Create a flight
//! - PUT /api/flights - Orchestrated update (notifies, then writes)
//! - DELETE /api/flights/:id - Delete a flight
//! - GET /api/flights/search?from=&to=&date= - Flights on a route on a date
//! - GET /api/flights/departures?at= - Flights departing at an exact time

use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use flightdeck_core::{Flight, FlightId, NaiveDate, NaiveDateTime};
use flightdeck_web::{ApiJson, AppError};
use serde::Deserialize;

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for the route search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Origin code
    pub from: String,
    /// Destination code
    pub to: String,
    /// ISO calendar date (`YYYY-MM-DD`)
    pub date: String,
}

/// Query parameters for the departure lookup.
#[derive(Debug, Deserialize)]
pub struct DeparturesQuery {
    /// Local departure time (`YYYY-MM-DDTHH:MM[:SS]`)
    pub at: String,
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const DEPARTURE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

// chrono accepts unpadded fields; only the canonical zero-padded text is taken.
fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .filter(|date| date.format(DATE_FORMAT).to_string() == value)
        .ok_or_else(|| AppError::bad_request(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}

fn parse_departure(value: &str) -> Result<NaiveDateTime, AppError> {
    DEPARTURE_FORMATS
        .iter()
        .find_map(|format| {
            NaiveDateTime::parse_from_str(value, format)
                .ok()
                .filter(|departure| departure.format(format).to_string() == value)
        })
        .ok_or_else(|| {
            AppError::bad_request(format!(
                "Invalid departure time '{value}', expected YYYY-MM-DDTHH:MM[:SS]"
            ))
        })
}

fn query_rejection(rejection: &QueryRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

// ============================================================================
// Handlers
// ============================================================================

/// Get one flight.
///
/// # Errors
///
/// Returns 404 if the flight does not exist.
pub async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Flight>, AppError> {
    let id = FlightId::new(id);
    state
        .flights
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Flight", id))
}

/// Create a flight. No notifications are sent.
///
/// # Errors
///
/// Returns 409 if the referenced aircraft does not exist.
pub async fn create_flight(
    State(state): State<AppState>,
    ApiJson(flight): ApiJson<Flight>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    state.flights.save(&flight).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

/// Replace a stored flight, notifying status and aircraft changes first.
///
/// # Errors
///
/// Returns 404 if the flight does not exist, 503 if a notification cannot be
/// delivered (the flight is then left unchanged).
pub async fn update_flight(
    State(state): State<AppState>,
    ApiJson(flight): ApiJson<Flight>,
) -> Result<Json<Flight>, AppError> {
    state.flights.update(&flight).await?;
    Ok(Json(flight))
}

/// Delete a flight.
///
/// # Errors
///
/// Returns 503 if the database is unavailable.
pub async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.flights.delete_by_id(FlightId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flights between two places on a calendar date.
///
/// # Errors
///
/// Returns 400 for missing parameters or an invalid date.
pub async fn search_flights(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Flight>>, AppError> {
    let Query(query) = query.map_err(|e| query_rejection(&e))?;
    let date = parse_date(&query.date)?;

    let flights = state
        .flights
        .find_by_route_and_date(&query.from, &query.to, date)
        .await?;
    Ok(Json(flights))
}

/// Flights departing at an exact time.
///
/// # Errors
///
/// Returns 400 for a missing or invalid `at` parameter.
pub async fn list_departures(
    State(state): State<AppState>,
    query: Result<Query<DeparturesQuery>, QueryRejection>,
) -> Result<Json<Vec<Flight>>, AppError> {
    let Query(query) = query.map_err(|e| query_rejection(&e))?;
    let departure = parse_departure(&query.at)?;

    Ok(Json(state.flights.find_by_departure(departure).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn departure_accepts_minutes_or_seconds() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_departure("2024-05-01T10:30").unwrap(), expected);
        assert_eq!(parse_departure("2024-05-01T10:30:00").unwrap(), expected);
    }

    #[test]
    fn malformed_values_are_bad_requests() {
        assert_eq!(
            parse_departure("tomorrow").unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            parse_date("2024-13-01").unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn only_zero_padded_values_are_accepted() {
        assert_eq!(
            parse_date("2024-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        for unpadded in ["2024-5-1", "2024-05-1", "2024-5-01"] {
            assert_eq!(
                parse_date(unpadded).unwrap_err().status(),
                StatusCode::BAD_REQUEST,
                "{unpadded} should be rejected"
            );
        }
        assert!(parse_departure("2024-5-1T10:30").is_err());
        assert!(parse_departure("2024-05-01T9:30").is_err());
    }
}
