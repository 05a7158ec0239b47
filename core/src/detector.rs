//! Flight change detection.
//!
//! Compares the stored flight with a proposed replacement and reports which
//! notification-worthy fields differ. The comparison is pure; fetching the stored
//! record (and refusing to proceed when it is missing) is the caller's job.

use crate::types::Flight;

/// Which notification-worthy fields differ between two versions of a flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlightChanges {
    /// The status variant differs
    pub status_changed: bool,
    /// The assigned aircraft differs (an absent reference equals only another absent one)
    pub aircraft_changed: bool,
}

impl FlightChanges {
    /// Whether neither field changed.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        !self.status_changed && !self.aircraft_changed
    }
}

/// Detect status and aircraft changes between `existing` and `proposed`.
///
/// The two flags are independent; both may be set by one update.
#[must_use]
pub fn detect_changes(existing: &Flight, proposed: &Flight) -> FlightChanges {
    FlightChanges {
        status_changed: existing.status != proposed.status,
        aircraft_changed: existing.aircraft_id != proposed.aircraft_id,
    }
}
