use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Baggage lifecycle status. Declaration order is the canonical checkpoint
/// order; `lost` sits outside the chain and is reachable from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BaggageStatus {
    CheckedIn,
    SecurityCleared,
    LoadedOnAircraft,
    InTransit,
    ArrivedAtDestination,
    Delivered,
    Lost,
}

impl BaggageStatus {
    pub const ALL: [BaggageStatus; 7] = [
        BaggageStatus::CheckedIn,
        BaggageStatus::SecurityCleared,
        BaggageStatus::LoadedOnAircraft,
        BaggageStatus::InTransit,
        BaggageStatus::ArrivedAtDestination,
        BaggageStatus::Delivered,
        BaggageStatus::Lost,
    ];

    /// Position in the canonical forward order.
    pub fn ordinal(self) -> u8 {
        match self {
            BaggageStatus::CheckedIn => 0,
            BaggageStatus::SecurityCleared => 1,
            BaggageStatus::LoadedOnAircraft => 2,
            BaggageStatus::InTransit => 3,
            BaggageStatus::ArrivedAtDestination => 4,
            BaggageStatus::Delivered => 5,
            BaggageStatus::Lost => 6,
        }
    }

    /// Terminal statuses absorb: no further events are accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, BaggageStatus::Delivered | BaggageStatus::Lost)
    }

    /// Next status in the canonical order; `None` for terminal statuses.
    /// A bare QR scan advances one step using this.
    pub fn next(self) -> Option<BaggageStatus> {
        match self {
            BaggageStatus::CheckedIn => Some(BaggageStatus::SecurityCleared),
            BaggageStatus::SecurityCleared => Some(BaggageStatus::LoadedOnAircraft),
            BaggageStatus::LoadedOnAircraft => Some(BaggageStatus::InTransit),
            BaggageStatus::InTransit => Some(BaggageStatus::ArrivedAtDestination),
            BaggageStatus::ArrivedAtDestination => Some(BaggageStatus::Delivered),
            BaggageStatus::Delivered | BaggageStatus::Lost => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BaggageStatus::CheckedIn => "checked_in",
            BaggageStatus::SecurityCleared => "security_cleared",
            BaggageStatus::LoadedOnAircraft => "loaded_on_aircraft",
            BaggageStatus::InTransit => "in_transit",
            BaggageStatus::ArrivedAtDestination => "arrived_at_destination",
            BaggageStatus::Delivered => "delivered",
            BaggageStatus::Lost => "lost",
        }
    }
}

impl std::fmt::Display for BaggageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a tracking event was recorded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanMethod {
    QrScan,
    ManualEntry,
}

/// One bag. Created once at registration; status, location and updated_at
/// change only through appended tracking events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baggage {
    pub id: Uuid,
    pub pnr: String,
    pub passenger_name: String,
    pub passenger_email: Option<String>,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub status: BaggageStatus,
    pub current_location: String,
    pub weight: Option<f64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only ledger entry. `sequence` is assigned by the ledger,
/// monotonically increasing per baggage id starting at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub id: Uuid,
    pub baggage_id: Uuid,
    pub location: String,
    pub status: BaggageStatus,
    pub timestamp: DateTime<Utc>,
    pub scanned_by: Option<String>,
    pub method: ScanMethod,
    pub sequence: u64,
}

/// Event as submitted to the ledger, before id/sequence assignment.
#[derive(Debug, Clone)]
pub struct NewTrackingEvent {
    pub baggage_id: Uuid,
    pub location: String,
    pub status: BaggageStatus,
    pub timestamp: DateTime<Utc>,
    pub scanned_by: Option<String>,
    pub method: ScanMethod,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Scheduled,
    Boarding,
    Departed,
    Arrived,
}

/// Scheduled flight. Referenced by baggage through the flight number; a
/// weak reference, the flight may leave the active schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub status: FlightStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdminType {
    CheckIn,
    Security,
    Boarding,
    BaggageClaim,
    Supervisor,
}

/// Actor directory entry; the `scanned_by` reference on tracking events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub location: Option<String>,
    pub admin_type: Option<AdminType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_to_snake_case_wire_values() {
        let wire: Vec<String> = BaggageStatus::ALL
            .iter()
            .map(|s| serde_json::to_value(s).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            wire,
            vec![
                "checked_in",
                "security_cleared",
                "loaded_on_aircraft",
                "in_transit",
                "arrived_at_destination",
                "delivered",
                "lost",
            ]
        );
    }

    #[test]
    fn baggage_uses_camel_case_attribute_names() {
        let bag = Baggage {
            id: Uuid::new_v4(),
            pnr: "ABC123".to_string(),
            passenger_name: "Jane Doe".to_string(),
            passenger_email: None,
            flight_number: "AA100".to_string(),
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            status: BaggageStatus::CheckedIn,
            current_location: "JFK".to_string(),
            weight: Some(23.0),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&bag).unwrap();
        assert!(value.get("passengerName").is_some());
        assert!(value.get("flightNumber").is_some());
        assert!(value.get("currentLocation").is_some());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["status"], "checked_in");
    }

    #[test]
    fn next_walks_the_canonical_chain_and_stops_at_terminals() {
        assert_eq!(
            BaggageStatus::CheckedIn.next(),
            Some(BaggageStatus::SecurityCleared)
        );
        assert_eq!(
            BaggageStatus::ArrivedAtDestination.next(),
            Some(BaggageStatus::Delivered)
        );
        assert_eq!(BaggageStatus::Delivered.next(), None);
        assert_eq!(BaggageStatus::Lost.next(), None);
    }

    #[test]
    fn ordinals_follow_declaration_order() {
        for window in BaggageStatus::ALL.windows(2) {
            assert!(window[0].ordinal() < window[1].ordinal());
        }
    }
}
