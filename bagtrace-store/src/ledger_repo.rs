use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use bagtrace_core::models::{NewTrackingEvent, TrackingEvent};
use bagtrace_core::repository::TrackingLedger;
use bagtrace_core::{TrackingError, TrackingResult};

#[derive(Default)]
struct LedgerState {
    // Global append order; events for one baggage id appear in sequence
    // order within it.
    events: Vec<TrackingEvent>,
    next_sequence: HashMap<Uuid, u64>,
}

/// Reference in-memory append-only ledger. Events are never mutated or
/// deleted once written.
#[derive(Default)]
pub struct InMemoryTrackingLedger {
    inner: RwLock<LedgerState>,
}

impl InMemoryTrackingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TrackingResult<std::sync::RwLockReadGuard<'_, LedgerState>> {
        self.inner
            .read()
            .map_err(|_| TrackingError::StoreUnavailable("ledger lock poisoned".into()))
    }
}

#[async_trait]
impl TrackingLedger for InMemoryTrackingLedger {
    async fn append(&self, event: NewTrackingEvent) -> TrackingResult<TrackingEvent> {
        let mut ledger = self
            .inner
            .write()
            .map_err(|_| TrackingError::StoreUnavailable("ledger lock poisoned".into()))?;
        let sequence = ledger
            .next_sequence
            .entry(event.baggage_id)
            .and_modify(|s| *s += 1)
            .or_insert(1);
        let stored = TrackingEvent {
            id: Uuid::new_v4(),
            baggage_id: event.baggage_id,
            location: event.location,
            status: event.status,
            timestamp: event.timestamp,
            scanned_by: event.scanned_by,
            method: event.method,
            sequence: *sequence,
        };
        tracing::debug!(
            baggage_id = %stored.baggage_id,
            status = %stored.status,
            sequence = stored.sequence,
            "tracking event appended"
        );
        ledger.events.push(stored.clone());
        Ok(stored)
    }

    async fn list_by_baggage(&self, baggage_id: Uuid) -> TrackingResult<Vec<TrackingEvent>> {
        let ledger = self.read()?;
        Ok(ledger
            .events
            .iter()
            .filter(|e| e.baggage_id == baggage_id)
            .cloned()
            .collect())
    }

    async fn list_recent(&self, limit: usize) -> TrackingResult<Vec<TrackingEvent>> {
        let ledger = self.read()?;
        let mut events: Vec<TrackingEvent> = ledger.events.iter().cloned().collect();
        events.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then(b.sequence.cmp(&a.sequence))
        });
        events.truncate(limit);
        Ok(events)
    }
}
