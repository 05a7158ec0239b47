//! Redpanda event bus for Flightdeck.
//!
//! Implements the [`EventBus`] trait from `flightdeck-core` with rdkafka, so
//! flight notifications can be fanned out to downstream consumers (crew
//! scheduling, passenger messaging, gate displays) over any Kafka-compatible
//! broker.
//!
//! # Message layout
//!
//! - **Key**: [`SerializedEvent::partition_key`], i.e. the flight id for flight
//!   notifications. Every event about one flight lands on the same partition and
//!   keeps its publish order.
//! - **Payload**: the whole [`SerializedEvent`] envelope, bincode-encoded.
//!
//! # Delivery Semantics
//!
//! **At-least-once** with manual offset commits: an offset is committed only
//! after the event has been handed to the subscriber's channel. Consumers must
//! tolerate duplicates.
//!
//! # Example
//!
//! ```no_run
//! use flightdeck_redpanda::RedpandaEventBus;
//! use flightdeck_core::event_bus::EventBus;
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let event_bus = RedpandaEventBus::builder()
//!     .brokers("localhost:9092")
//!     .producer_acks("all")
//!     .build()?;
//!
//! let mut stream = event_bus.subscribe(&["flight-events"]).await?;
//! while let Some(result) = stream.next().await {
//!     match result {
//!         Ok(event) => println!("{} for flight {}", event.event_type, event.partition_key()),
//!         Err(e) => eprintln!("Error: {e}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use flightdeck_core::event::SerializedEvent;
use flightdeck_core::event_bus::{EventBus, EventBusError, EventStream};
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const DEFAULT_ACKS: &str = "1";
const DEFAULT_COMPRESSION: &str = "none";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_BUFFER_SIZE: usize = 1000;
const DEFAULT_OFFSET_RESET: &str = "latest";

/// Kafka-compatible [`EventBus`].
///
/// Construct with [`RedpandaEventBus::new`] for defaults or
/// [`RedpandaEventBus::builder`] to tune acks, compression, timeout, consumer
/// group, buffer size and offset reset policy.
pub struct RedpandaEventBus {
    producer: FutureProducer,
    brokers: String,
    timeout: Duration,
    consumer_group: Option<String>,
    buffer_size: usize,
    auto_offset_reset: String,
}

impl RedpandaEventBus {
    /// Create an event bus with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::ConnectionFailed`] if the producer cannot be created.
    pub fn new(brokers: &str) -> Result<Self, EventBusError> {
        Self::builder().brokers(brokers).build()
    }

    /// Start configuring an event bus.
    #[must_use]
    pub fn builder() -> RedpandaEventBusBuilder {
        RedpandaEventBusBuilder::default()
    }

    /// Bootstrap servers this bus talks to.
    #[must_use]
    pub fn brokers(&self) -> &str {
        &self.brokers
    }
}

/// Builder for [`RedpandaEventBus`].
#[derive(Default)]
pub struct RedpandaEventBusBuilder {
    brokers: Option<String>,
    producer_acks: Option<String>,
    compression: Option<String>,
    timeout: Option<Duration>,
    consumer_group: Option<String>,
    buffer_size: Option<usize>,
    auto_offset_reset: Option<String>,
}

impl RedpandaEventBusBuilder {
    /// Comma-separated bootstrap servers (e.g. `"localhost:9092"`).
    #[must_use]
    pub fn brokers(mut self, brokers: impl Into<String>) -> Self {
        self.brokers = Some(brokers.into());
        self
    }

    /// Producer acknowledgment mode: `"0"`, `"1"` or `"all"`. Default `"1"`.
    #[must_use]
    pub fn producer_acks(mut self, acks: impl Into<String>) -> Self {
        self.producer_acks = Some(acks.into());
        self
    }

    /// Compression codec: `"none"`, `"gzip"`, `"snappy"`, `"lz4"` or `"zstd"`.
    #[must_use]
    pub fn compression(mut self, compression: impl Into<String>) -> Self {
        self.compression = Some(compression.into());
        self
    }

    /// How long a publish may wait for broker acknowledgment. Default 5s.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Explicit consumer group for subscriptions.
    ///
    /// Instances sharing a group split the partitions between them. Without one,
    /// a group name is derived from the subscribed topics.
    #[must_use]
    pub fn consumer_group(mut self, consumer_group: impl Into<String>) -> Self {
        self.consumer_group = Some(consumer_group.into());
        self
    }

    /// Events buffered between the consumer task and the subscriber. Values
    /// below 1 are raised to 1.
    #[must_use]
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size.max(1));
        self
    }

    /// Where a new consumer group starts reading: `"earliest"`, `"latest"` or `"error"`.
    #[must_use]
    pub fn auto_offset_reset(mut self, policy: impl Into<String>) -> Self {
        self.auto_offset_reset = Some(policy.into());
        self
    }

    /// Create the producer and finish building.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::ConnectionFailed`] if brokers are not set or the
    /// producer configuration is rejected.
    pub fn build(self) -> Result<RedpandaEventBus, EventBusError> {
        let brokers = self
            .brokers
            .ok_or_else(|| EventBusError::ConnectionFailed("Brokers not configured".to_string()))?;
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let acks = self.producer_acks.as_deref().unwrap_or(DEFAULT_ACKS);
        let compression = self.compression.as_deref().unwrap_or(DEFAULT_COMPRESSION);

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &brokers)
            .set("message.timeout.ms", timeout.as_millis().to_string())
            .set("acks", acks)
            .set("compression.type", compression)
            .create()
            .map_err(|e| {
                EventBusError::ConnectionFailed(format!("Failed to create producer: {e}"))
            })?;

        let buffer_size = self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let auto_offset_reset = self
            .auto_offset_reset
            .unwrap_or_else(|| DEFAULT_OFFSET_RESET.to_string());

        tracing::info!(
            brokers = %brokers,
            acks,
            compression,
            timeout = ?timeout,
            buffer_size,
            auto_offset_reset = %auto_offset_reset,
            "Redpanda event bus created"
        );

        Ok(RedpandaEventBus {
            producer,
            brokers,
            timeout,
            consumer_group: self.consumer_group,
            buffer_size,
            auto_offset_reset,
        })
    }
}

/// Consumer group used when none was configured: derived from the sorted topic list.
fn default_consumer_group(topics: &[String]) -> String {
    let mut sorted = topics.to_vec();
    sorted.sort();
    format!("flightdeck-{}", sorted.join("-"))
}

/// Decode one message payload back into its envelope.
fn decode_payload(payload: Option<&[u8]>) -> Result<SerializedEvent, EventBusError> {
    let payload = payload
        .ok_or_else(|| EventBusError::DeserializationFailed("Message has no payload".to_string()))?;

    bincode::deserialize::<SerializedEvent>(payload)
        .map_err(|e| EventBusError::DeserializationFailed(format!("Failed to decode event: {e}")))
}

impl EventBus for RedpandaEventBus {
    fn publish(
        &self,
        topic: &str,
        event: &SerializedEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>> {
        let topic = topic.to_string();
        let event = event.clone();

        Box::pin(async move {
            let payload = bincode::serialize(&event).map_err(|e| EventBusError::PublishFailed {
                topic: topic.clone(),
                reason: format!("Failed to encode event: {e}"),
            })?;
            let key = event.partition_key();

            let record = FutureRecord::to(&topic).payload(&payload).key(key);

            match self.producer.send(record, Timeout::After(self.timeout)).await {
                Ok((partition, offset)) => {
                    tracing::debug!(
                        topic = %topic,
                        key,
                        partition,
                        offset,
                        event_type = %event.event_type,
                        "Event published"
                    );
                    Ok(())
                },
                Err((kafka_error, _)) => {
                    tracing::error!(
                        topic = %topic,
                        key,
                        event_type = %event.event_type,
                        error = %kafka_error,
                        "Failed to publish event"
                    );
                    Err(EventBusError::PublishFailed {
                        topic,
                        reason: kafka_error.to_string(),
                    })
                },
            }
        })
    }

    fn subscribe(
        &self,
        topics: &[&str],
    ) -> Pin<Box<dyn Future<Output = Result<EventStream, EventBusError>> + Send + '_>> {
        let topics: Vec<String> = topics.iter().map(|s| (*s).to_string()).collect();
        let brokers = self.brokers.clone();
        let consumer_group = self
            .consumer_group
            .clone()
            .unwrap_or_else(|| default_consumer_group(&topics));
        let buffer_size = self.buffer_size;
        let auto_offset_reset = self.auto_offset_reset.clone();

        Box::pin(async move {
            let consumer: StreamConsumer = ClientConfig::new()
                .set("bootstrap.servers", &brokers)
                .set("group.id", &consumer_group)
                .set("enable.auto.commit", "false")
                .set("auto.offset.reset", &auto_offset_reset)
                .set("session.timeout.ms", "6000")
                .set("enable.partition.eof", "false")
                .create()
                .map_err(|e| EventBusError::SubscriptionFailed {
                    topics: topics.clone(),
                    reason: format!("Failed to create consumer: {e}"),
                })?;

            let topic_refs: Vec<&str> = topics.iter().map(String::as_str).collect();
            consumer
                .subscribe(&topic_refs)
                .map_err(|e| EventBusError::SubscriptionFailed {
                    topics: topics.clone(),
                    reason: format!("Failed to subscribe to topics: {e}"),
                })?;

            tracing::info!(
                topics = ?topics,
                consumer_group = %consumer_group,
                buffer_size,
                auto_offset_reset = %auto_offset_reset,
                "Subscribed to topics"
            );

            let (tx, mut rx) = tokio::sync::mpsc::channel(buffer_size);

            // The task owns the consumer; it ends when the subscriber drops the stream
            tokio::spawn(async move {
                use futures::StreamExt;
                use rdkafka::consumer::CommitMode;

                let mut stream = consumer.stream();

                while let Some(msg_result) = stream.next().await {
                    let message = match msg_result {
                        Ok(message) => message,
                        Err(e) => {
                            let err = EventBusError::TransportError(format!(
                                "Failed to receive message: {e}"
                            ));
                            if tx.send(Err(err)).await.is_err() {
                                break;
                            }
                            continue;
                        },
                    };

                    let decoded = decode_payload(message.payload());
                    if let Ok(event) = &decoded {
                        tracing::trace!(
                            topic = message.topic(),
                            partition = message.partition(),
                            offset = message.offset(),
                            event_type = %event.event_type,
                            "Received event"
                        );
                    }

                    // Commit only once the subscriber has the event
                    if tx.send(decoded).await.is_err() {
                        tracing::debug!("Subscriber dropped, stopping consumer");
                        break;
                    }

                    if let Err(e) = consumer.commit_message(&message, CommitMode::Async) {
                        tracing::warn!(
                            topic = message.topic(),
                            partition = message.partition(),
                            offset = message.offset(),
                            error = %e,
                            "Failed to commit offset (message may be redelivered)"
                        );
                    }
                }

                tracing::debug!("Consumer task exiting");
            });

            let stream = async_stream::stream! {
                while let Some(result) = rx.recv().await {
                    yield result;
                }
            };

            Ok(Box::pin(stream) as EventStream)
        })
    }
}
