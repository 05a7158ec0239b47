//! Event trait and wire envelope for published notifications.
//!
//! Events are facts about something that already happened. They are encoded with
//! `bincode` and wrapped in a [`SerializedEvent`] envelope before they reach the
//! event bus; the envelope itself is also `bincode`-encoded by transports.
//!
//! # Example
//!
//! ```
//! use flightdeck_core::event::Event;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! enum GateEvent {
//!     GateAssigned { gate: String },
//! }
//!
//! impl Event for GateEvent {
//!     fn event_type(&self) -> &'static str {
//!         match self {
//!             GateEvent::GateAssigned { .. } => "GateAssigned.v1",
//!         }
//!     }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use thiserror::Error;

/// Error types for event operations.
#[derive(Error, Debug)]
pub enum EventError {
    /// Failed to serialize event to bytes.
    #[error("Failed to serialize event: {0}")]
    SerializationError(String),

    /// Failed to deserialize event from bytes.
    #[error("Failed to deserialize event: {0}")]
    DeserializationError(String),
}

/// An event that can be published and decoded by subscribers.
///
/// `event_type()` returns a stable, versioned name such as
/// `"FlightStatusChanged.v1"`; subscribers route on it.
pub trait Event: Send + Sync + 'static {
    /// Returns the event type identifier for this event.
    fn event_type(&self) -> &'static str;

    /// Serialize this event to bincode bytes.
    ///
    /// # Errors
    ///
    /// Returns `EventError::SerializationError` if the event cannot be serialized.
    fn to_bytes(&self) -> Result<Vec<u8>, EventError>
    where
        Self: Serialize,
    {
        bincode::serialize(self).map_err(|e| EventError::SerializationError(e.to_string()))
    }

    /// Deserialize an event from bincode bytes.
    ///
    /// # Errors
    ///
    /// Returns `EventError::DeserializationError` if the bytes are corrupted or
    /// belong to a different event type.
    fn from_bytes(bytes: &[u8]) -> Result<Self, EventError>
    where
        Self: DeserializeOwned + Sized,
    {
        bincode::deserialize(bytes).map_err(|e| EventError::DeserializationError(e.to_string()))
    }
}

/// Envelope metadata carried alongside the event payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Identifier of the record the event is about; transports use it as the
    /// partition key so events for one record stay ordered
    pub aggregate_id: String,
    /// When the event was produced
    pub occurred_at: DateTime<Utc>,
}

/// A serialized event ready for transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEvent {
    /// The event type identifier (e.g., "FlightStatusChanged.v1").
    pub event_type: String,

    /// The bincode-serialized event data.
    pub data: Vec<u8>,

    /// Optional envelope metadata.
    pub metadata: Option<EventMetadata>,
}

impl SerializedEvent {
    /// Create a new serialized event.
    #[must_use]
    pub const fn new(event_type: String, data: Vec<u8>, metadata: Option<EventMetadata>) -> Self {
        Self {
            event_type,
            data,
            metadata,
        }
    }

    /// Create a serialized event from an [`Event`].
    ///
    /// # Errors
    ///
    /// Returns `EventError::SerializationError` if the event cannot be serialized.
    pub fn from_event<E: Event + Serialize>(
        event: &E,
        metadata: Option<EventMetadata>,
    ) -> Result<Self, EventError> {
        Ok(Self {
            event_type: event.event_type().to_string(),
            data: event.to_bytes()?,
            metadata,
        })
    }

    /// Key used by partitioned transports: the aggregate id when present,
    /// otherwise the event type.
    #[must_use]
    pub fn partition_key(&self) -> &str {
        self.metadata
            .as_ref()
            .map_or(self.event_type.as_str(), |m| m.aggregate_id.as_str())
    }
}

impl fmt::Display for SerializedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SerializedEvent {{ type: {}, size: {} bytes }}",
            self.event_type,
            self.data.len()
        )
    }
}
