//! In-memory persistence accessors.
//!
//! `BTreeMap`-backed stand-ins for the PostgreSQL repositories, with the same
//! insert-or-replace semantics. Both can be switched into an "unavailable" mode
//! to exercise infrastructure-failure paths.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity

use crate::journal::{Journal, JournalEntry};
use chrono::NaiveDateTime;
use flightdeck_core::repository::{RepositoryFuture, Result};
use flightdeck_core::{
    Aircraft, AircraftId, AircraftRepository, Flight, FlightId, FlightRepository, FlightUpdate,
    RepositoryError,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::{Mutex, OwnedMutexGuard};

fn unavailable() -> RepositoryError {
    RepositoryError::Database("in-memory store marked unavailable".to_string())
}

/// In-memory flight repository.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFlightRepository {
    flights: Arc<RwLock<BTreeMap<FlightId, Flight>>>,
    journal: Journal,
    unavailable: Arc<AtomicBool>,
    // One writer at a time, like a row lock on every flight
    update_lock: Arc<Mutex<()>>,
}

impl InMemoryFlightRepository {
    /// Create an empty repository with its own journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty repository recording into `journal`
    #[must_use]
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    /// Seed flights without touching the journal
    pub fn seed(&self, flights: impl IntoIterator<Item = Flight>) {
        let mut stored = self.flights.write().unwrap();
        for flight in flights {
            stored.insert(flight.id, flight);
        }
    }

    /// Current stored copy of a flight
    #[must_use]
    pub fn stored(&self, id: FlightId) -> Option<Flight> {
        self.flights.read().unwrap().get(&id).cloned()
    }

    /// Number of stored flights
    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.read().unwrap().len()
    }

    /// Whether no flights are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.read().unwrap().is_empty()
    }

    /// Make every subsequent call fail with [`RepositoryError::Database`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }

    fn write(&self, flight: &Flight) {
        self.flights.write().unwrap().insert(flight.id, flight.clone());
        self.journal.record(JournalEntry::FlightSaved(flight.id));
    }

    fn filtered(&self, predicate: impl Fn(&Flight) -> bool) -> Vec<Flight> {
        self.flights
            .read()
            .unwrap()
            .values()
            .filter(|f| predicate(f))
            .cloned()
            .collect()
    }
}

impl FlightRepository for InMemoryFlightRepository {
    fn get_flight_by_id(&self, id: FlightId) -> RepositoryFuture<'_, Option<Flight>> {
        let result = self.check().map(|()| self.stored(id));
        Box::pin(async move { result })
    }

    fn get_flights_by_route<'a>(
        &'a self,
        origin: &'a str,
        destination: &'a str,
    ) -> RepositoryFuture<'a, Vec<Flight>> {
        let result = self
            .check()
            .map(|()| self.filtered(|f| f.origin == origin && f.destination == destination));
        Box::pin(async move { result })
    }

    fn get_flights_by_departure(
        &self,
        departure: NaiveDateTime,
    ) -> RepositoryFuture<'_, Vec<Flight>> {
        let result = self
            .check()
            .map(|()| self.filtered(|f| f.departure == departure));
        Box::pin(async move { result })
    }

    fn lock_flight_for_update(
        &self,
        id: FlightId,
    ) -> RepositoryFuture<'_, Option<Box<dyn FlightUpdate>>> {
        Box::pin(async move {
            self.check()?;
            let guard = Arc::clone(&self.update_lock).lock_owned().await;
            let update = self.stored(id).map(|existing| {
                Box::new(InMemoryFlightUpdate {
                    _guard: guard,
                    existing,
                    repository: self.clone(),
                }) as Box<dyn FlightUpdate>
            });
            Ok(update)
        })
    }

    fn save_flight<'a>(&'a self, flight: &'a Flight) -> RepositoryFuture<'a, ()> {
        let result = self.check().map(|()| self.write(flight));
        Box::pin(async move { result })
    }

    fn delete_flight_by_id(&self, id: FlightId) -> RepositoryFuture<'_, ()> {
        let result = self.check().map(|()| {
            self.flights.write().unwrap().remove(&id);
            self.journal.record(JournalEntry::FlightDeleted(id));
        });
        Box::pin(async move { result })
    }
}

/// Locked flight handed out by [`InMemoryFlightRepository::lock_flight_for_update`].
struct InMemoryFlightUpdate {
    _guard: OwnedMutexGuard<()>,
    existing: Flight,
    repository: InMemoryFlightRepository,
}

impl FlightUpdate for InMemoryFlightUpdate {
    fn existing(&self) -> &Flight {
        &self.existing
    }

    fn commit<'a>(self: Box<Self>, proposed: &'a Flight) -> RepositoryFuture<'a, ()> {
        let result = self.repository.check().map(|()| self.repository.write(proposed));
        Box::pin(async move { result })
    }
}

/// In-memory aircraft repository.
///
/// Mirrors the PostgreSQL foreign key: deleting an aircraft that a flight in the
/// linked flight repository still references is a [`RepositoryError::Conflict`].
#[derive(Clone, Debug, Default)]
pub struct InMemoryAircraftRepository {
    aircraft: Arc<RwLock<BTreeMap<AircraftId, Aircraft>>>,
    flights: Option<InMemoryFlightRepository>,
    journal: Journal,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryAircraftRepository {
    /// Create an empty repository with its own journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty repository recording into `journal`
    #[must_use]
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    /// Enforce references held by flights in `flights` on delete
    #[must_use]
    pub fn referenced_by(mut self, flights: InMemoryFlightRepository) -> Self {
        self.flights = Some(flights);
        self
    }

    /// Seed aircraft without touching the journal
    pub fn seed(&self, aircraft: impl IntoIterator<Item = Aircraft>) {
        let mut stored = self.aircraft.write().unwrap();
        for a in aircraft {
            stored.insert(a.id, a);
        }
    }

    /// Current stored copy of an aircraft
    #[must_use]
    pub fn stored(&self, id: AircraftId) -> Option<Aircraft> {
        self.aircraft.read().unwrap().get(&id).cloned()
    }

    /// Make every subsequent call fail with [`RepositoryError::Database`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }

    fn delete(&self, id: AircraftId) -> Result<()> {
        self.check()?;
        let referenced = self.flights.as_ref().is_some_and(|flights| {
            !flights.filtered(|f| f.aircraft_id == Some(id)).is_empty()
        });
        if referenced {
            return Err(RepositoryError::Conflict(format!(
                "aircraft {id} is still assigned to a flight"
            )));
        }
        self.aircraft.write().unwrap().remove(&id);
        self.journal.record(JournalEntry::AircraftDeleted(id));
        Ok(())
    }
}

impl AircraftRepository for InMemoryAircraftRepository {
    fn list_aircraft(&self) -> RepositoryFuture<'_, Vec<Aircraft>> {
        let result = self
            .check()
            .map(|()| self.aircraft.read().unwrap().values().cloned().collect());
        Box::pin(async move { result })
    }

    fn get_aircraft_by_id(&self, id: AircraftId) -> RepositoryFuture<'_, Option<Aircraft>> {
        let result = self.check().map(|()| self.stored(id));
        Box::pin(async move { result })
    }

    fn save_aircraft<'a>(&'a self, aircraft: &'a Aircraft) -> RepositoryFuture<'a, ()> {
        let result = self.check().map(|()| {
            self.aircraft
                .write()
                .unwrap()
                .insert(aircraft.id, aircraft.clone());
            self.journal.record(JournalEntry::AircraftSaved(aircraft.id));
        });
        Box::pin(async move { result })
    }

    fn delete_aircraft_by_id(&self, id: AircraftId) -> RepositoryFuture<'_, ()> {
        let result = self.delete(id);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FlightBuilder, aircraft};

    #[tokio::test]
    async fn save_replaces_every_field() {
        let repo = InMemoryFlightRepository::new();
        let original = FlightBuilder::new(1).route("NYC", "LON").build();
        repo.save_flight(&original).await.unwrap();

        let replacement = FlightBuilder::new(1).route("BOS", "PAR").aircraft(9).build();
        repo.save_flight(&replacement).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.stored(FlightId::new(1)), Some(replacement));
    }

    #[tokio::test]
    async fn committed_update_replaces_locked_flight() {
        let repo = InMemoryFlightRepository::new();
        let original = FlightBuilder::new(1).build();
        repo.seed([original.clone()]);

        let update = repo.lock_flight_for_update(FlightId::new(1)).await.unwrap().unwrap();
        assert_eq!(update.existing(), &original);

        let replacement = FlightBuilder::new(1).route("BOS", "PAR").build();
        update.commit(&replacement).await.unwrap();
        assert_eq!(repo.stored(FlightId::new(1)), Some(replacement));
    }

    #[tokio::test]
    async fn dropped_update_writes_nothing_and_releases_lock() {
        let repo = InMemoryFlightRepository::new();
        let original = FlightBuilder::new(1).build();
        repo.seed([original.clone()]);

        let update = repo.lock_flight_for_update(FlightId::new(1)).await.unwrap();
        drop(update);

        assert_eq!(repo.stored(FlightId::new(1)), Some(original));
        assert!(repo.lock_flight_for_update(FlightId::new(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn second_update_waits_for_the_first() {
        let repo = InMemoryFlightRepository::new();
        repo.seed([FlightBuilder::new(1).build()]);

        let first = repo.lock_flight_for_update(FlightId::new(1)).await.unwrap().unwrap();
        let blocked = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            repo.lock_flight_for_update(FlightId::new(1)),
        )
        .await;
        assert!(blocked.is_err());

        first.commit(&FlightBuilder::new(1).route("BOS", "PAR").build()).await.unwrap();
        let second = repo.lock_flight_for_update(FlightId::new(1)).await.unwrap().unwrap();
        assert_eq!(second.existing().origin, "BOS");
    }

    #[tokio::test]
    async fn missing_flight_is_not_locked() {
        let repo = InMemoryFlightRepository::new();
        assert!(repo.lock_flight_for_update(FlightId::new(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unavailable_store_fails_reads() {
        let repo = InMemoryFlightRepository::new();
        repo.set_unavailable(true);

        let err = repo.get_flight_by_id(FlightId::new(1)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[tokio::test]
    async fn referenced_aircraft_cannot_be_deleted() {
        let flights = InMemoryFlightRepository::new();
        flights.seed([FlightBuilder::new(1).aircraft(5).build()]);
        let repo = InMemoryAircraftRepository::new().referenced_by(flights);
        repo.seed([aircraft(5, Vec::new())]);

        let err = repo.delete_aircraft_by_id(AircraftId::new(5)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(repo.stored(AircraftId::new(5)).is_some());
    }
}
