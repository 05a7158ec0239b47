//! In-memory event bus.
//!
//! Delivers published events synchronously to every live subscription whose
//! topic list contains the event's topic. A bus made with
//! [`InMemoryEventBus::new`] also keeps a history of everything published for
//! assertions; one made with [`InMemoryEventBus::without_history`] retains
//! nothing once delivery is done. Subscriptions only see events published after
//! they were created, as with a Kafka consumer starting at the latest offset.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity

use flightdeck_core::event::SerializedEvent;
use flightdeck_core::event_bus::{EventBus, EventBusError, EventStream};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

struct Subscription {
    topics: Vec<String>,
    sender: mpsc::UnboundedSender<SerializedEvent>,
}

/// Broker-free [`EventBus`].
#[derive(Clone)]
pub struct InMemoryEventBus {
    subscriptions: Arc<Mutex<Vec<Subscription>>>,
    published: Arc<Mutex<Vec<(String, SerializedEvent)>>>,
    keep_history: bool,
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventBus {
    /// Create an empty bus that records every published event
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Arc::default(),
            published: Arc::default(),
            keep_history: true,
        }
    }

    /// Create an empty bus that only forwards to live subscriptions.
    ///
    /// Memory use stays bounded by the subscribers' backlog, so this is the
    /// variant for a long-running process.
    #[must_use]
    pub fn without_history() -> Self {
        Self {
            keep_history: false,
            ..Self::new()
        }
    }

    /// Every `(topic, event)` published so far, in order
    #[must_use]
    pub fn published(&self) -> Vec<(String, SerializedEvent)> {
        self.published.lock().unwrap().clone()
    }

    /// Events published to `topic`, in order
    #[must_use]
    pub fn published_to(&self, topic: &str) -> Vec<SerializedEvent> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Number of live subscriptions
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        subscriptions.retain(|s| !s.sender.is_closed());
        subscriptions.len()
    }
}

impl EventBus for InMemoryEventBus {
    fn publish(
        &self,
        topic: &str,
        event: &SerializedEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>> {
        if self.keep_history {
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), event.clone()));
        }

        let mut subscriptions = self.subscriptions.lock().unwrap();
        subscriptions.retain(|s| !s.sender.is_closed());
        for subscription in subscriptions.iter() {
            if subscription.topics.iter().any(|t| t == topic) {
                // A receiver dropped between retain and send is harmless
                let _ = subscription.sender.send(event.clone());
            }
        }

        Box::pin(async { Ok(()) })
    }

    fn subscribe(
        &self,
        topics: &[&str],
    ) -> Pin<Box<dyn Future<Output = Result<EventStream, EventBusError>> + Send + '_>> {
        let topics: Vec<String> = topics.iter().map(|t| (*t).to_string()).collect();

        Box::pin(async move {
            if topics.is_empty() {
                return Err(EventBusError::SubscriptionFailed {
                    topics,
                    reason: "no topics given".to_string(),
                });
            }

            let (sender, mut receiver) = mpsc::unbounded_channel();
            self.subscriptions
                .lock()
                .unwrap()
                .push(Subscription { topics, sender });

            let stream = async_stream::stream! {
                while let Some(event) = receiver.recv().await {
                    yield Ok(event);
                }
            };

            Ok(Box::pin(stream) as EventStream)
        })
    }
}
