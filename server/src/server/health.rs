//! Health, readiness and metrics endpoints.

use super::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Liveness check.
///
/// Returns 200 OK while the process is serving requests; dependencies are not
/// checked.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Database connectivity
    pub database: bool,
}

/// Readiness check.
///
/// Pings the database when one is configured. Returns 503 if the ping fails.
///
/// ```bash
/// curl http://localhost:8080/ready
/// # {"ready":true,"database":true}
/// ```
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match &state.database {
        Some(pool) => match flightdeck_postgres::ping(pool).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Readiness check failed: database unreachable");
                false
            },
        },
        None => true,
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready: database,
            database,
        }),
    )
}

/// Prometheus text exposition.
///
/// Returns 404 when no recorder is installed.
pub async fn metrics_endpoint(State(state): State<AppState>) -> (StatusCode, String) {
    state.metrics.as_ref().map_or_else(
        || (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
        |handle| (StatusCode::OK, handle.render()),
    )
}
