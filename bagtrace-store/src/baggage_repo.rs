use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use bagtrace_core::models::{Baggage, BaggageStatus};
use bagtrace_core::repository::BaggageRepository;
use bagtrace_core::{TrackingError, TrackingResult};

#[derive(Default)]
struct BaggageTable {
    rows: HashMap<Uuid, Baggage>,
    // Secondary indices, maintained in the same critical section as the
    // row insert. pnr/flight keys are immutable post-registration.
    by_pnr: HashMap<String, Vec<Uuid>>,
    by_flight: HashMap<String, Vec<Uuid>>,
}

/// Reference in-memory entity store + lookup index. Critical sections are
/// short and never held across an await, so readers always observe whole
/// rows.
#[derive(Default)]
pub struct InMemoryBaggageRepository {
    inner: RwLock<BaggageTable>,
}

impl InMemoryBaggageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TrackingResult<std::sync::RwLockReadGuard<'_, BaggageTable>> {
        self.inner
            .read()
            .map_err(|_| TrackingError::StoreUnavailable("baggage table lock poisoned".into()))
    }

    fn write(&self) -> TrackingResult<std::sync::RwLockWriteGuard<'_, BaggageTable>> {
        self.inner
            .write()
            .map_err(|_| TrackingError::StoreUnavailable("baggage table lock poisoned".into()))
    }
}

#[async_trait]
impl BaggageRepository for InMemoryBaggageRepository {
    async fn insert(&self, baggage: &Baggage) -> TrackingResult<()> {
        let mut table = self.write()?;
        if table.rows.contains_key(&baggage.id) {
            return Err(TrackingError::Conflict(format!(
                "baggage {} already registered",
                baggage.id
            )));
        }
        table
            .by_pnr
            .entry(baggage.pnr.clone())
            .or_default()
            .push(baggage.id);
        table
            .by_flight
            .entry(baggage.flight_number.clone())
            .or_default()
            .push(baggage.id);
        table.rows.insert(baggage.id, baggage.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> TrackingResult<Option<Baggage>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn by_pnr(&self, pnr: &str) -> TrackingResult<Vec<Baggage>> {
        let table = self.read()?;
        let ids = table.by_pnr.get(pnr).map(Vec::as_slice).unwrap_or(&[]);
        Ok(ids
            .iter()
            .filter_map(|id| table.rows.get(id).cloned())
            .collect())
    }

    async fn by_flight(&self, flight_number: &str) -> TrackingResult<Vec<Baggage>> {
        let table = self.read()?;
        let ids = table
            .by_flight
            .get(flight_number)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        Ok(ids
            .iter()
            .filter_map(|id| table.rows.get(id).cloned())
            .collect())
    }

    async fn update_position(
        &self,
        id: Uuid,
        status: BaggageStatus,
        location: &str,
        updated_at: DateTime<Utc>,
    ) -> TrackingResult<()> {
        let mut table = self.write()?;
        let row = table
            .rows
            .get_mut(&id)
            .ok_or(TrackingError::BaggageNotFound(id))?;
        row.status = status;
        row.current_location = location.to_string();
        row.updated_at = updated_at;
        Ok(())
    }

    async fn count(&self) -> TrackingResult<u64> {
        Ok(self.read()?.rows.len() as u64)
    }

    async fn count_by_status(&self) -> TrackingResult<BTreeMap<BaggageStatus, u64>> {
        let table = self.read()?;
        let mut counts = BTreeMap::new();
        for row in table.rows.values() {
            *counts.entry(row.status).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
