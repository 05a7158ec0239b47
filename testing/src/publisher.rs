//! Recording flight notification publisher.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity

use crate::journal::{Journal, JournalEntry};
use flightdeck_core::event_bus::EventBusError;
use flightdeck_core::publisher::PublishFuture;
use flightdeck_core::{Flight, FlightEventPublisher, PublishError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Which notification was published.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// `publish_status_changed`
    StatusChanged,
    /// `publish_aircraft_reassigned`
    AircraftReassigned,
}

/// One captured notification with the flight it carried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Notification kind
    pub kind: NotificationKind,
    /// Flight passed to the publisher
    pub flight: Flight,
}

/// Publisher that records every call instead of sending it anywhere.
///
/// # Example
///
/// ```
/// use flightdeck_core::FlightEventPublisher;
/// use flightdeck_testing::{fixtures::FlightBuilder, NotificationKind, RecordingPublisher};
///
/// # async fn example() -> Result<(), flightdeck_core::PublishError> {
/// let publisher = RecordingPublisher::new();
/// publisher.publish_status_changed(&FlightBuilder::new(1).build()).await?;
///
/// assert_eq!(publisher.kinds(), vec![NotificationKind::StatusChanged]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingPublisher {
    notifications: Arc<Mutex<Vec<Notification>>>,
    journal: Journal,
    failing: Arc<AtomicBool>,
}

impl RecordingPublisher {
    /// Create a publisher with its own journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a publisher recording into `journal`
    #[must_use]
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    /// Make every subsequent publish fail with a transport error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All captured notifications in call order
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Kinds of the captured notifications in call order
    #[must_use]
    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.kind)
            .collect()
    }

    /// Clear captured notifications
    pub fn clear(&self) {
        self.notifications.lock().unwrap().clear();
    }

    fn record(&self, kind: NotificationKind, flight: &Flight) -> Result<(), PublishError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PublishError::Bus(EventBusError::TransportError(
                "recording publisher set to fail".to_string(),
            )));
        }

        self.notifications.lock().unwrap().push(Notification {
            kind,
            flight: flight.clone(),
        });
        self.journal.record(match kind {
            NotificationKind::StatusChanged => JournalEntry::StatusChangedPublished(flight.id),
            NotificationKind::AircraftReassigned => {
                JournalEntry::AircraftReassignedPublished(flight.id)
            },
        });
        Ok(())
    }
}

impl FlightEventPublisher for RecordingPublisher {
    fn publish_status_changed<'a>(&'a self, flight: &'a Flight) -> PublishFuture<'a> {
        let result = self.record(NotificationKind::StatusChanged, flight);
        Box::pin(async move { result })
    }

    fn publish_aircraft_reassigned<'a>(&'a self, flight: &'a Flight) -> PublishFuture<'a> {
        let result = self.record(NotificationKind::AircraftReassigned, flight);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FlightBuilder;

    #[tokio::test]
    async fn failing_publisher_records_nothing() {
        let journal = Journal::new();
        let publisher = RecordingPublisher::with_journal(journal.clone());
        publisher.set_failing(true);

        let result = publisher
            .publish_aircraft_reassigned(&FlightBuilder::new(4).build())
            .await;

        assert!(result.is_err());
        assert!(publisher.notifications().is_empty());
        assert!(journal.entries().is_empty());
    }
}
