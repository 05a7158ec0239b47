//! Axum integration for Flightdeck.
//!
//! HTTP plumbing shared by the server's handlers:
//!
//! - [`AppError`]: the single error type handlers return, with conversions from
//!   repository and publisher errors to the right status codes
//! - [`ApiJson`]: JSON body extractor whose rejections are [`AppError`]s
//! - [`correlation_id_layer`] and [`CorrelationId`]: per-request correlation IDs
//!   in tracing spans and response headers
//!
//! # Example
//!
//! ```ignore
//! use flightdeck_web::{ApiJson, AppError};
//!
//! async fn create_aircraft(
//!     State(state): State<AppState>,
//!     ApiJson(aircraft): ApiJson<Aircraft>,
//! ) -> Result<(StatusCode, Json<Aircraft>), AppError> {
//!     state.aircraft.create(&aircraft).await?;
//!     Ok((StatusCode::CREATED, Json(aircraft)))
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod middleware;

pub use error::AppError;
pub use extractors::{ApiJson, CorrelationId};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
