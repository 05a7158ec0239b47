//! # Flightdeck Testing
//!
//! Testing utilities for the Flightdeck workspace.
//!
//! This crate provides:
//! - [`FixedClock`]: deterministic time
//! - In-memory implementations of the persistence accessors
//! - [`RecordingPublisher`]: captures flight notifications
//! - [`InMemoryEventBus`]: topic-based pub/sub without a broker
//! - [`Journal`]: one ordered log shared by repositories and publishers, so a
//!   test can assert that notifications went out before the write
//! - Fixture builders for flights, aircraft and seats
//!
//! ## Example
//!
//! ```
//! use flightdeck_core::FlightRepository;
//! use flightdeck_testing::{fixtures::FlightBuilder, InMemoryFlightRepository, Journal, JournalEntry};
//!
//! # async fn example() -> Result<(), flightdeck_core::RepositoryError> {
//! let journal = Journal::new();
//! let repo = InMemoryFlightRepository::with_journal(journal.clone());
//!
//! let flight = FlightBuilder::new(1).route("NYC", "LON").build();
//! repo.save_flight(&flight).await?;
//!
//! assert_eq!(journal.entries(), vec![JournalEntry::FlightSaved(flight.id)]);
//! # Ok(())
//! # }
//! ```

pub mod event_bus;
pub mod fixtures;
pub mod journal;
pub mod publisher;
pub mod repositories;

use chrono::{DateTime, Utc};
use flightdeck_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use flightdeck_testing::mocks::FixedClock;
    /// use flightdeck_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which cannot happen.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use event_bus::InMemoryEventBus;
pub use journal::{Journal, JournalEntry};
pub use mocks::{FixedClock, test_clock};
pub use publisher::{Notification, NotificationKind, RecordingPublisher};
pub use repositories::{InMemoryAircraftRepository, InMemoryFlightRepository};
