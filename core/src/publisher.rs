//! Flight event publishing.
//!
//! [`FlightEventPublisher`] is the notification sink the update orchestrator
//! calls when it detects a status change or an aircraft reassignment. Both
//! notifications carry the *proposed* flight, i.e. the post-change values, and
//! are dispatched before that flight is written: a subscriber must not expect to
//! read the new values back from the store yet.
//!
//! [`EventBusFlightPublisher`] is the production implementation: it wraps each
//! notification in a [`FlightEvent`], encodes it and publishes it to one topic of
//! an [`EventBus`].

use crate::environment::Clock;
use crate::event::{Event, EventMetadata, SerializedEvent};
use crate::event_bus::{EventBus, EventBusError};
use crate::types::Flight;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while publishing a flight notification.
#[derive(Error, Debug, Clone)]
pub enum PublishError {
    /// The event could not be encoded.
    #[error("Failed to encode flight event: {0}")]
    Encoding(String),

    /// The transport rejected or failed to accept the event.
    #[error(transparent)]
    Bus(#[from] EventBusError),
}

/// Boxed future returned by publisher methods.
pub type PublishFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + 'a>>;

/// Notification sink for flight state transitions.
pub trait FlightEventPublisher: Send + Sync {
    /// The flight's status differs from the stored one.
    fn publish_status_changed<'a>(&'a self, flight: &'a Flight) -> PublishFuture<'a>;

    /// The flight's assigned aircraft differs from the stored one.
    fn publish_aircraft_reassigned<'a>(&'a self, flight: &'a Flight) -> PublishFuture<'a>;
}

/// Notification payloads as they travel over the event bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightEvent {
    /// Status changed; `flight` holds the new values
    StatusChanged {
        /// Flight snapshot after the change
        flight: Flight,
        /// When the change was detected
        occurred_at: DateTime<Utc>,
    },
    /// Aircraft reassigned; `flight` holds the new values
    AircraftReassigned {
        /// Flight snapshot after the change
        flight: Flight,
        /// When the change was detected
        occurred_at: DateTime<Utc>,
    },
}

impl FlightEvent {
    /// The flight snapshot carried by the event.
    #[must_use]
    pub const fn flight(&self) -> &Flight {
        match self {
            Self::StatusChanged { flight, .. } | Self::AircraftReassigned { flight, .. } => flight,
        }
    }

    /// When the event was produced.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::StatusChanged { occurred_at, .. }
            | Self::AircraftReassigned { occurred_at, .. } => *occurred_at,
        }
    }
}

impl Event for FlightEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::StatusChanged { .. } => "FlightStatusChanged.v1",
            Self::AircraftReassigned { .. } => "FlightAircraftReassigned.v1",
        }
    }
}

/// Publishes flight notifications to a topic on an [`EventBus`].
#[derive(Clone)]
pub struct EventBusFlightPublisher {
    event_bus: Arc<dyn EventBus>,
    topic: String,
    clock: Arc<dyn Clock>,
}

impl EventBusFlightPublisher {
    /// Create a publisher writing to `topic`.
    #[must_use]
    pub fn new(event_bus: Arc<dyn EventBus>, topic: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            event_bus,
            topic: topic.into(),
            clock,
        }
    }

    /// The topic events are published to.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    async fn publish(&self, event: FlightEvent) -> Result<(), PublishError> {
        let metadata = EventMetadata {
            aggregate_id: event.flight().id.to_string(),
            occurred_at: event.occurred_at(),
        };
        let serialized = SerializedEvent::from_event(&event, Some(metadata))
            .map_err(|e| PublishError::Encoding(e.to_string()))?;

        self.event_bus.publish(&self.topic, &serialized).await?;

        tracing::debug!(
            topic = %self.topic,
            event_type = %serialized.event_type,
            flight_id = %event.flight().id,
            "Flight event published"
        );

        Ok(())
    }
}

impl FlightEventPublisher for EventBusFlightPublisher {
    fn publish_status_changed<'a>(&'a self, flight: &'a Flight) -> PublishFuture<'a> {
        let event = FlightEvent::StatusChanged {
            flight: flight.clone(),
            occurred_at: self.clock.now(),
        };
        Box::pin(self.publish(event))
    }

    fn publish_aircraft_reassigned<'a>(&'a self, flight: &'a Flight) -> PublishFuture<'a> {
        let event = FlightEvent::AircraftReassigned {
            flight: flight.clone(),
            occurred_at: self.clock.now(),
        };
        Box::pin(self.publish(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::EventStream;
    use crate::types::{AircraftId, FlightId, FlightStatus};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingBus {
        published: Mutex<Vec<(String, SerializedEvent)>>,
    }

    impl EventBus for CapturingBus {
        fn publish(
            &self,
            topic: &str,
            event: &SerializedEvent,
        ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>> {
            if let Ok(mut published) = self.published.lock() {
                published.push((topic.to_string(), event.clone()));
            }
            Box::pin(async { Ok(()) })
        }

        fn subscribe(
            &self,
            topics: &[&str],
        ) -> Pin<Box<dyn Future<Output = Result<EventStream, EventBusError>> + Send + '_>> {
            let topics = topics.iter().map(|t| (*t).to_string()).collect();
            Box::pin(async move {
                Err(EventBusError::SubscriptionFailed {
                    topics,
                    reason: "not supported".to_string(),
                })
            })
        }
    }

    struct StoppedClock(DateTime<Utc>);

    impl Clock for StoppedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[allow(clippy::unwrap_used)]
    fn flight() -> Flight {
        Flight {
            id: FlightId::new(12),
            departure: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            origin: "NYC".to_string(),
            destination: "LON".to_string(),
            status: FlightStatus::Boarding,
            aircraft_id: Some(AircraftId::new(3)),
        }
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn status_change_is_encoded_and_keyed_by_flight() {
        let bus = Arc::new(CapturingBus::default());
        let now = Utc::now();
        let publisher =
            EventBusFlightPublisher::new(bus.clone(), "flight-events", Arc::new(StoppedClock(now)));

        publisher.publish_status_changed(&flight()).await.unwrap();

        let published = bus.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let (topic, event) = &published[0];
        assert_eq!(topic, "flight-events");
        assert_eq!(event.event_type, "FlightStatusChanged.v1");
        assert_eq!(event.partition_key(), "12");

        let decoded = FlightEvent::from_bytes(&event.data).unwrap();
        assert_eq!(
            decoded,
            FlightEvent::StatusChanged {
                flight: flight(),
                occurred_at: now,
            }
        );
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn reassignment_uses_its_own_event_type() {
        let bus = Arc::new(CapturingBus::default());
        let publisher = EventBusFlightPublisher::new(
            bus.clone(),
            "flight-events",
            Arc::new(StoppedClock(Utc::now())),
        );

        publisher.publish_aircraft_reassigned(&flight()).await.unwrap();

        let published = bus.published.lock().unwrap();
        assert_eq!(published[0].1.event_type, "FlightAircraftReassigned.v1");
    }
}
