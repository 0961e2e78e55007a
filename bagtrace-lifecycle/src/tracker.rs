use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use bagtrace_core::models::{
    Baggage, BaggageStatus, NewTrackingEvent, ScanMethod, TrackingEvent,
};
use bagtrace_core::repository::{BaggageRepository, FlightRepository, TrackingLedger};
use bagtrace_core::transitions::validate_transition;
use bagtrace_core::{TrackingError, TrackingResult};

/// Authenticated admin performing a mutation, as carried in the JWT claims.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BagSpec {
    pub weight: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBaggage {
    pub pnr: String,
    pub passenger_name: String,
    pub passenger_email: Option<String>,
    pub flight_number: String,
    pub bags: Vec<BagSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    BaggageId,
    Pnr,
}

/// A bag together with its full ledger history, the track-query result.
#[derive(Debug, Clone)]
pub struct TrackedBaggage {
    pub baggage: Baggage,
    pub history: Vec<TrackingEvent>,
}

/// Per-baggage-id mutual exclusion. The state read, transition validation,
/// ledger append and row update happen under one guard; different baggage
/// ids never contend.
#[derive(Default)]
struct LockRegistry {
    locks: StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    fn for_baggage(&self, id: Uuid) -> TrackingResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| TrackingError::StoreUnavailable("lock registry poisoned".into()))?;
        Ok(locks.entry(id).or_default().clone())
    }
}

/// The mutating half of the query façade: registration and event appends,
/// plus the lookup operations that never touch the state machine.
pub struct Tracker {
    baggage: Arc<dyn BaggageRepository>,
    ledger: Arc<dyn TrackingLedger>,
    flights: Arc<dyn FlightRepository>,
    default_location: String,
    locks: LockRegistry,
}

impl Tracker {
    pub fn new(
        baggage: Arc<dyn BaggageRepository>,
        ledger: Arc<dyn TrackingLedger>,
        flights: Arc<dyn FlightRepository>,
        default_location: String,
    ) -> Self {
        Self {
            baggage,
            ledger,
            flights,
            default_location,
            locks: LockRegistry::default(),
        }
    }

    /// Create one bag per element of `bags`, all under one booking
    /// reference, each with the initial `checked_in` ledger event.
    pub async fn register_baggage(
        &self,
        request: RegisterBaggage,
        actor: &Actor,
    ) -> TrackingResult<Vec<Baggage>> {
        if request.pnr.trim().is_empty() {
            return Err(TrackingError::Validation("pnr must not be empty".into()));
        }
        if request.passenger_name.trim().is_empty() {
            return Err(TrackingError::Validation(
                "passengerName must not be empty".into(),
            ));
        }
        if request.bags.is_empty() {
            return Err(TrackingError::Validation(
                "at least one bag is required".into(),
            ));
        }

        let flight = self
            .flights
            .get(&request.flight_number)
            .await?
            .ok_or_else(|| TrackingError::FlightNotFound(request.flight_number.clone()))?;

        let initial_location = if flight.origin.is_empty() {
            self.default_location.clone()
        } else {
            flight.origin.clone()
        };

        let mut registered = Vec::with_capacity(request.bags.len());
        for spec in &request.bags {
            let now = Utc::now();
            let bag = Baggage {
                id: Uuid::new_v4(),
                pnr: request.pnr.clone(),
                passenger_name: request.passenger_name.clone(),
                passenger_email: request.passenger_email.clone(),
                flight_number: flight.flight_number.clone(),
                origin: flight.origin.clone(),
                destination: flight.destination.clone(),
                status: BaggageStatus::CheckedIn,
                current_location: initial_location.clone(),
                weight: spec.weight,
                description: spec.description.clone(),
                created_at: now,
                updated_at: now,
            };
            self.baggage.insert(&bag).await?;
            self.ledger
                .append(NewTrackingEvent {
                    baggage_id: bag.id,
                    location: initial_location.clone(),
                    status: BaggageStatus::CheckedIn,
                    timestamp: now,
                    scanned_by: Some(actor.id.clone()),
                    method: ScanMethod::ManualEntry,
                })
                .await?;
            tracing::info!(baggage_id = %bag.id, pnr = %bag.pnr, flight = %bag.flight_number, "baggage registered");
            registered.push(bag);
        }
        Ok(registered)
    }

    /// QR checkpoint scan. Without an explicit status the bag advances one
    /// step in the canonical order; the location falls back to the
    /// scanner's registered location.
    pub async fn scan(
        &self,
        baggage_id: Uuid,
        location: Option<String>,
        status: Option<BaggageStatus>,
        actor: &Actor,
    ) -> TrackingResult<Baggage> {
        let location = location
            .or_else(|| actor.location.clone())
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| {
                TrackingError::Validation(
                    "scan location missing: provide one or set the scanner's location".into(),
                )
            })?;
        self.apply_event(baggage_id, status, Some(location), ScanMethod::QrScan, actor)
            .await
    }

    /// Manual status entry. The location defaults to the bag's current
    /// location when omitted.
    pub async fn update_status(
        &self,
        baggage_id: Uuid,
        status: BaggageStatus,
        location: Option<String>,
        actor: &Actor,
    ) -> TrackingResult<Baggage> {
        self.apply_event(
            baggage_id,
            Some(status),
            location,
            ScanMethod::ManualEntry,
            actor,
        )
        .await
    }

    async fn apply_event(
        &self,
        baggage_id: Uuid,
        proposed: Option<BaggageStatus>,
        location: Option<String>,
        method: ScanMethod,
        actor: &Actor,
    ) -> TrackingResult<Baggage> {
        let lock = self.locks.for_baggage(baggage_id)?;
        let _guard = lock.lock().await;

        // Re-read under the lock: the loser of a concurrent scan is
        // evaluated against the winner's state.
        let mut bag = self
            .baggage
            .get(baggage_id)
            .await?
            .ok_or(TrackingError::BaggageNotFound(baggage_id))?;

        let proposed = match proposed {
            Some(status) => status,
            None => bag
                .status
                .next()
                .ok_or(TrackingError::TerminalState(bag.status))?,
        };
        let location = match location {
            Some(l) if !l.trim().is_empty() => l,
            Some(_) => {
                return Err(TrackingError::Validation(
                    "location must not be empty".into(),
                ))
            }
            None => bag.current_location.clone(),
        };

        validate_transition(bag.status, proposed)?;

        let event = self
            .ledger
            .append(NewTrackingEvent {
                baggage_id,
                location: location.clone(),
                status: proposed,
                timestamp: Utc::now(),
                scanned_by: Some(actor.id.clone()),
                method,
            })
            .await?;
        self.baggage
            .update_position(baggage_id, proposed, &location, event.timestamp)
            .await?;

        tracing::info!(
            baggage_id = %baggage_id,
            from = %bag.status,
            to = %proposed,
            location = %location,
            sequence = event.sequence,
            "baggage status advanced"
        );

        bag.status = proposed;
        bag.current_location = location;
        bag.updated_at = event.timestamp;
        Ok(bag)
    }

    /// Lookup by baggage id or booking reference, each hit carrying its
    /// full ledger history. A malformed baggage id simply matches nothing.
    pub async fn track(
        &self,
        query: &str,
        query_type: QueryType,
    ) -> TrackingResult<Vec<TrackedBaggage>> {
        let bags = match query_type {
            QueryType::BaggageId => match Uuid::parse_str(query.trim()) {
                Ok(id) => self.baggage.get(id).await?.into_iter().collect(),
                Err(_) => Vec::new(),
            },
            QueryType::Pnr => self.baggage.by_pnr(query.trim()).await?,
        };

        let mut results = Vec::with_capacity(bags.len());
        for baggage in bags {
            let history = self.ledger.list_by_baggage(baggage.id).await?;
            results.push(TrackedBaggage { baggage, history });
        }
        Ok(results)
    }

    pub async fn flight_baggage(&self, flight_number: &str) -> TrackingResult<Vec<Baggage>> {
        self.baggage.by_flight(flight_number).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bagtrace_core::models::{Flight, FlightStatus};
    use bagtrace_store::{
        InMemoryBaggageRepository, InMemoryFlightRepository, InMemoryTrackingLedger,
    };
    use chrono::Duration;

    fn aa100() -> Flight {
        Flight {
            flight_number: "AA100".to_string(),
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            departure_time: Utc::now(),
            arrival_time: Utc::now() + Duration::hours(6),
            status: FlightStatus::Scheduled,
        }
    }

    fn tracker() -> Tracker {
        Tracker::new(
            Arc::new(InMemoryBaggageRepository::new()),
            Arc::new(InMemoryTrackingLedger::new()),
            Arc::new(InMemoryFlightRepository::with_schedule([aa100()])),
            "Check-in Desk".to_string(),
        )
    }

    fn agent() -> Actor {
        Actor {
            id: "agent-1".to_string(),
            location: Some("JFK-Security".to_string()),
        }
    }

    fn two_bags() -> RegisterBaggage {
        RegisterBaggage {
            pnr: "ABC123".to_string(),
            passenger_name: "Jane Doe".to_string(),
            passenger_email: None,
            flight_number: "AA100".to_string(),
            bags: vec![
                BagSpec {
                    weight: Some(23.0),
                    description: Some("Black suitcase".to_string()),
                },
                BagSpec {
                    weight: Some(12.5),
                    description: None,
                },
            ],
        }
    }

    #[tokio::test]
    async fn registration_creates_checked_in_bags_at_the_flight_origin() {
        let tracker = tracker();
        let bags = tracker.register_baggage(two_bags(), &agent()).await.unwrap();

        assert_eq!(bags.len(), 2);
        for bag in &bags {
            assert_eq!(bag.status, BaggageStatus::CheckedIn);
            assert_eq!(bag.current_location, "JFK");
            let history = tracker.ledger.list_by_baggage(bag.id).await.unwrap();
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].status, BaggageStatus::CheckedIn);
            assert_eq!(history[0].method, ScanMethod::ManualEntry);
            assert_eq!(history[0].scanned_by.as_deref(), Some("agent-1"));
        }
    }

    #[tokio::test]
    async fn registration_validates_inputs_and_flight() {
        let tracker = tracker();

        let mut missing_pnr = two_bags();
        missing_pnr.pnr = "  ".to_string();
        assert!(matches!(
            tracker.register_baggage(missing_pnr, &agent()).await,
            Err(TrackingError::Validation(_))
        ));

        let mut no_bags = two_bags();
        no_bags.bags.clear();
        assert!(matches!(
            tracker.register_baggage(no_bags, &agent()).await,
            Err(TrackingError::Validation(_))
        ));

        let mut unknown_flight = two_bags();
        unknown_flight.flight_number = "ZZ999".to_string();
        assert!(matches!(
            tracker.register_baggage(unknown_flight, &agent()).await,
            Err(TrackingError::FlightNotFound(f)) if f == "ZZ999"
        ));
    }

    #[tokio::test]
    async fn bare_scan_advances_one_step_and_records_the_scanner_location() {
        let tracker = tracker();
        let bags = tracker.register_baggage(two_bags(), &agent()).await.unwrap();
        let id = bags[0].id;

        let updated = tracker.scan(id, None, None, &agent()).await.unwrap();
        assert_eq!(updated.status, BaggageStatus::SecurityCleared);
        assert_eq!(updated.current_location, "JFK-Security");

        let history = tracker.ledger.list_by_baggage(id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].status, BaggageStatus::SecurityCleared);
        assert_eq!(history[1].method, ScanMethod::QrScan);
    }

    #[tokio::test]
    async fn scan_without_any_location_is_a_validation_error() {
        let tracker = tracker();
        let bags = tracker.register_baggage(two_bags(), &agent()).await.unwrap();
        let no_location = Actor {
            id: "agent-2".to_string(),
            location: None,
        };
        assert!(matches!(
            tracker.scan(bags[0].id, None, None, &no_location).await,
            Err(TrackingError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn status_mirrors_the_last_event_through_a_full_journey() {
        let tracker = tracker();
        let bags = tracker.register_baggage(two_bags(), &agent()).await.unwrap();
        let id = bags[0].id;

        for status in [
            BaggageStatus::SecurityCleared,
            BaggageStatus::LoadedOnAircraft,
            BaggageStatus::InTransit,
            BaggageStatus::ArrivedAtDestination,
            BaggageStatus::Delivered,
        ] {
            let bag = tracker
                .update_status(id, status, Some("LAX".to_string()), &agent())
                .await
                .unwrap();
            assert_eq!(bag.status, status);
            let history = tracker.ledger.list_by_baggage(id).await.unwrap();
            assert_eq!(history.last().unwrap().status, status);
            assert_eq!(bag.status, history.last().unwrap().status);
            assert!(bag.updated_at >= bag.created_at);
        }

        let history = tracker.ledger.list_by_baggage(id).await.unwrap();
        assert!(history.windows(2).all(|w| w[0].sequence < w[1].sequence));
    }

    #[tokio::test]
    async fn skips_are_allowed_but_regressions_and_terminal_appends_are_not() {
        let tracker = tracker();
        let bags = tracker.register_baggage(two_bags(), &agent()).await.unwrap();
        let id = bags[0].id;

        // checked_in -> in_transit skips two checkpoints
        tracker
            .update_status(id, BaggageStatus::InTransit, None, &agent())
            .await
            .unwrap();

        assert!(matches!(
            tracker
                .update_status(id, BaggageStatus::SecurityCleared, None, &agent())
                .await,
            Err(TrackingError::InvalidTransition {
                from: BaggageStatus::InTransit,
                to: BaggageStatus::SecurityCleared,
            })
        ));

        tracker
            .update_status(id, BaggageStatus::Delivered, Some("LAX".to_string()), &agent())
            .await
            .unwrap();
        assert!(matches!(
            tracker
                .update_status(id, BaggageStatus::SecurityCleared, None, &agent())
                .await,
            Err(TrackingError::TerminalState(BaggageStatus::Delivered))
        ));
        assert!(matches!(
            tracker.scan(id, None, None, &agent()).await,
            Err(TrackingError::TerminalState(BaggageStatus::Delivered))
        ));

        // the rejected attempts appended nothing
        let history = tracker.ledger.list_by_baggage(id).await.unwrap();
        assert_eq!(history.len(), 3);
    }

    #[tokio::test]
    async fn lost_is_reachable_until_terminal() {
        let tracker = tracker();
        let bags = tracker.register_baggage(two_bags(), &agent()).await.unwrap();

        let lost = tracker
            .update_status(bags[0].id, BaggageStatus::Lost, None, &agent())
            .await
            .unwrap();
        assert_eq!(lost.status, BaggageStatus::Lost);
        assert!(matches!(
            tracker
                .update_status(bags[0].id, BaggageStatus::Lost, None, &agent())
                .await,
            Err(TrackingError::TerminalState(BaggageStatus::Lost))
        ));
    }

    #[tokio::test]
    async fn scanning_unknown_baggage_fails() {
        let tracker = tracker();
        assert!(matches!(
            tracker.scan(Uuid::new_v4(), None, None, &agent()).await,
            Err(TrackingError::BaggageNotFound(_))
        ));
    }

    #[tokio::test]
    async fn track_by_pnr_and_by_id() {
        let tracker = tracker();
        let bags = tracker.register_baggage(two_bags(), &agent()).await.unwrap();
        tracker.scan(bags[0].id, None, None, &agent()).await.unwrap();

        let by_pnr = tracker.track("ABC123", QueryType::Pnr).await.unwrap();
        assert_eq!(by_pnr.len(), 2);
        let first = by_pnr.iter().find(|t| t.baggage.id == bags[0].id).unwrap();
        assert_eq!(first.history.len(), 2);

        let by_id = tracker
            .track(&bags[1].id.to_string(), QueryType::BaggageId)
            .await
            .unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].history.len(), 1);

        assert!(tracker.track("not-a-uuid", QueryType::BaggageId).await.unwrap().is_empty());
        assert!(tracker.track("NOPE00", QueryType::Pnr).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_scans_to_a_terminal_status_admit_exactly_one_winner() {
        let tracker = Arc::new(tracker());
        let bags = tracker.register_baggage(two_bags(), &agent()).await.unwrap();
        let id = bags[0].id;

        let a = {
            let tracker = tracker.clone();
            tokio::spawn(async move {
                tracker
                    .scan(id, Some("LAX".to_string()), Some(BaggageStatus::Delivered), &agent())
                    .await
            })
        };
        let b = {
            let tracker = tracker.clone();
            tokio::spawn(async move {
                tracker
                    .scan(id, Some("LAX".to_string()), Some(BaggageStatus::Delivered), &agent())
                    .await
            })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(TrackingError::TerminalState(BaggageStatus::Delivered)))));

        // initial check-in plus the single winning delivery
        let history = tracker.ledger.list_by_baggage(id).await.unwrap();
        assert_eq!(history.len(), 2);
    }
}
