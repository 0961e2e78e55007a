use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use bagtrace_core::models::{BaggageStatus, ScanMethod};
use bagtrace_core::repository::{
    BaggageRepository, FlightRepository, TrackingLedger, UserRepository,
};
use bagtrace_core::TrackingResult;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    TrackingEvent,
}

/// One recent-feed entry: a ledger event joined against its baggage row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub id: Uuid,
    pub baggage_id: Uuid,
    pub passenger_name: String,
    pub pnr: String,
    pub status: BaggageStatus,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub flight_number: String,
    pub scanned_by: Option<String>,
    pub method: ScanMethod,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_baggage: u64,
    /// All seven status keys are always present, zero or not.
    pub status_counts: BTreeMap<BaggageStatus, u64>,
    pub recent_activities: Vec<RecentActivity>,
    pub total_flights: u64,
    pub total_users: u64,
    pub total_admins: u64,
}

/// Computes dashboard statistics fresh on every call from the entity store
/// and the ledger's recent slice.
pub struct StatsEngine {
    baggage: Arc<dyn BaggageRepository>,
    ledger: Arc<dyn TrackingLedger>,
    flights: Arc<dyn FlightRepository>,
    users: Arc<dyn UserRepository>,
    recent_limit: usize,
}

impl StatsEngine {
    pub fn new(
        baggage: Arc<dyn BaggageRepository>,
        ledger: Arc<dyn TrackingLedger>,
        flights: Arc<dyn FlightRepository>,
        users: Arc<dyn UserRepository>,
        recent_limit: usize,
    ) -> Self {
        Self {
            baggage,
            ledger,
            flights,
            users,
            recent_limit,
        }
    }

    pub async fn compute_stats(&self) -> TrackingResult<DashboardStats> {
        let total_baggage = self.baggage.count().await?;
        let mut status_counts = self.baggage.count_by_status().await?;
        for status in BaggageStatus::ALL {
            status_counts.entry(status).or_insert(0);
        }

        let mut recent_activities = Vec::new();
        for event in self.ledger.list_recent(self.recent_limit).await? {
            // A store implementation that prunes rows leaves orphan events;
            // skip those.
            let Some(bag) = self.baggage.get(event.baggage_id).await? else {
                continue;
            };
            recent_activities.push(RecentActivity {
                kind: ActivityKind::TrackingEvent,
                id: event.id,
                baggage_id: event.baggage_id,
                passenger_name: bag.passenger_name,
                pnr: bag.pnr,
                status: event.status,
                location: event.location,
                timestamp: event.timestamp,
                flight_number: bag.flight_number,
                scanned_by: event.scanned_by,
                method: event.method,
            });
        }

        let total_flights = self.flights.list().await?.len() as u64;
        let roles = self.users.count_by_role().await?;

        Ok(DashboardStats {
            total_baggage,
            status_counts,
            recent_activities,
            total_flights,
            total_users: roles.users,
            total_admins: roles.admins,
        })
    }
}
