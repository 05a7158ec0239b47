//! HTTP API handlers.
//!
//! - [`aircraft`]: aircraft CRUD under `/api/aircraft`
//! - [`flights`]: flight CRUD and queries under `/api/flights`
//! - [`seats`]: free-seat queries under `/api/flights/:id/seats`

pub mod aircraft;
pub mod flights;
pub mod seats;
