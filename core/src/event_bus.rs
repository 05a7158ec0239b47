//! Event bus abstraction for distributing flight notifications.
//!
//! The [`EventBus`] trait provides topic-based publish/subscribe. Flight
//! notifications are published to a single topic (`flight-events` by default) and
//! keyed by flight id so all events for one flight land on the same partition.
//!
//! # Implementations
//!
//! - `InMemoryEventBus` (in `flightdeck-testing`) - for tests
//! - `RedpandaEventBus` (in `flightdeck-redpanda`) - for production (Kafka-compatible)
//!
//! # Delivery
//!
//! - **At-least-once**: subscribers may see duplicates and must be idempotent
//! - **Ordered within partition**: events sharing a partition key keep their order

use crate::event::SerializedEvent;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during event bus operations.
#[derive(Error, Debug, Clone)]
pub enum EventBusError {
    /// Failed to connect to the event bus
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Failed to publish an event to a topic
    #[error("Publish failed for topic '{topic}': {reason}")]
    PublishFailed {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },

    /// Failed to subscribe to topics
    #[error("Subscription failed for topics {topics:?}: {reason}")]
    SubscriptionFailed {
        /// The topics that failed to subscribe
        topics: Vec<String>,
        /// The reason for failure
        reason: String,
    },

    /// Failed to deserialize an event
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Network or transport error
    #[error("Transport error: {0}")]
    TransportError(String),
}

/// Stream of events from subscriptions.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<SerializedEvent, EventBusError>> + Send>>;

/// Trait for event bus implementations.
///
/// Uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn` so the
/// trait stays dyn-compatible (`Arc<dyn EventBus>`).
pub trait EventBus: Send + Sync {
    /// Publish an event to a topic.
    ///
    /// Resolves once the transport has accepted the event; it does not wait for
    /// any subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::PublishFailed`] if the publish operation fails.
    fn publish(
        &self,
        topic: &str,
        event: &SerializedEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>>;

    /// Subscribe to one or more topics and receive a stream of events.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::SubscriptionFailed`] if subscription fails.
    fn subscribe(
        &self,
        topics: &[&str],
    ) -> Pin<Box<dyn Future<Output = Result<EventStream, EventBusError>> + Send + '_>>;
}
