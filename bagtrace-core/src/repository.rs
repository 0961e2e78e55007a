use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Baggage, BaggageStatus, Flight, NewTrackingEvent, TrackingEvent, User};
use crate::TrackingResult;

/// Entity store + lookup index for baggage rows.
///
/// Implementations must keep the pnr and flight secondary indices in the
/// same atomic unit as the row insert, and must apply `update_position` as
/// a single whole-row write so readers never observe status without the
/// matching location.
#[async_trait]
pub trait BaggageRepository: Send + Sync {
    async fn insert(&self, baggage: &Baggage) -> TrackingResult<()>;
    async fn get(&self, id: Uuid) -> TrackingResult<Option<Baggage>>;
    /// All bags checked in under a booking reference; exact match,
    /// case-sensitive as stored.
    async fn by_pnr(&self, pnr: &str) -> TrackingResult<Vec<Baggage>>;
    async fn by_flight(&self, flight_number: &str) -> TrackingResult<Vec<Baggage>>;
    /// Atomic status/location/updated_at write following a ledger append.
    async fn update_position(
        &self,
        id: Uuid,
        status: BaggageStatus,
        location: &str,
        updated_at: DateTime<Utc>,
    ) -> TrackingResult<()>;
    async fn count(&self) -> TrackingResult<u64>;
    async fn count_by_status(&self) -> TrackingResult<BTreeMap<BaggageStatus, u64>>;
}

/// Append-only tracking ledger, the source of truth for baggage status.
#[async_trait]
pub trait TrackingLedger: Send + Sync {
    /// Assigns the event id and the next per-baggage sequence number and
    /// persists. Never overwrites.
    async fn append(&self, event: NewTrackingEvent) -> TrackingResult<TrackingEvent>;
    /// Ordered history for one bag, oldest first; empty if none, never an
    /// error.
    async fn list_by_baggage(&self, baggage_id: Uuid) -> TrackingResult<Vec<TrackingEvent>>;
    /// Most recent events across all baggage, newest first, ties broken by
    /// sequence descending.
    async fn list_recent(&self, limit: usize) -> TrackingResult<Vec<TrackingEvent>>;
}

#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn get(&self, flight_number: &str) -> TrackingResult<Option<Flight>>;
    async fn list(&self) -> TrackingResult<Vec<Flight>>;
    async fn upsert(&self, flight: Flight) -> TrackingResult<()>;
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RoleCounts {
    pub users: u64,
    pub admins: u64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> TrackingResult<()>;
    async fn get(&self, id: Uuid) -> TrackingResult<Option<User>>;
    async fn by_email(&self, email: &str) -> TrackingResult<Option<User>>;
    async fn count_by_role(&self) -> TrackingResult<RoleCounts>;
}
