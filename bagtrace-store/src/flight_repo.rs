use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use bagtrace_core::models::Flight;
use bagtrace_core::repository::FlightRepository;
use bagtrace_core::{TrackingError, TrackingResult};

/// Read-mostly flight schedule, keyed by flight number. Schedule
/// management itself belongs to an external collaborator; `upsert` is the
/// seeding hook.
#[derive(Default)]
pub struct InMemoryFlightRepository {
    inner: RwLock<HashMap<String, Flight>>,
}

impl InMemoryFlightRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(flights: impl IntoIterator<Item = Flight>) -> Self {
        let map = flights
            .into_iter()
            .map(|f| (f.flight_number.clone(), f))
            .collect();
        Self {
            inner: RwLock::new(map),
        }
    }

    fn read(&self) -> TrackingResult<std::sync::RwLockReadGuard<'_, HashMap<String, Flight>>> {
        self.inner
            .read()
            .map_err(|_| TrackingError::StoreUnavailable("flight table lock poisoned".into()))
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn get(&self, flight_number: &str) -> TrackingResult<Option<Flight>> {
        Ok(self.read()?.get(flight_number).cloned())
    }

    async fn list(&self) -> TrackingResult<Vec<Flight>> {
        let mut flights: Vec<Flight> = self.read()?.values().cloned().collect();
        flights.sort_by(|a, b| a.flight_number.cmp(&b.flight_number));
        Ok(flights)
    }

    async fn upsert(&self, flight: Flight) -> TrackingResult<()> {
        let mut table = self
            .inner
            .write()
            .map_err(|_| TrackingError::StoreUnavailable("flight table lock poisoned".into()))?;
        table.insert(flight.flight_number.clone(), flight);
        Ok(())
    }
}
