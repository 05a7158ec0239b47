//! Shared call journal.
//!
//! In-memory repositories and the recording publisher append to the same
//! [`Journal`], giving tests a single ordered view of what happened.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity

use flightdeck_core::{AircraftId, FlightId};
use std::sync::{Arc, Mutex};

/// One recorded call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JournalEntry {
    /// A flight was written
    FlightSaved(FlightId),
    /// A flight was deleted
    FlightDeleted(FlightId),
    /// An aircraft was written
    AircraftSaved(AircraftId),
    /// An aircraft was deleted
    AircraftDeleted(AircraftId),
    /// A status-change notification was published
    StatusChangedPublished(FlightId),
    /// An aircraft-reassignment notification was published
    AircraftReassignedPublished(FlightId),
}

impl JournalEntry {
    /// Whether this entry is a publisher call.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        matches!(
            self,
            Self::StatusChangedPublished(_) | Self::AircraftReassignedPublished(_)
        )
    }
}

/// Ordered, cloneable log of collaborator calls.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl Journal {
    /// Create an empty journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn record(&self, entry: JournalEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    /// Snapshot of all entries in call order
    #[must_use]
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Forget everything recorded so far (e.g. after seeding fixtures)
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}
