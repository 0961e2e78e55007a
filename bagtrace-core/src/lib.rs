pub mod models;
pub mod repository;
pub mod transitions;

use models::BaggageStatus;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Flight not found: {0}")]
    FlightNotFound(String),
    #[error("Baggage not found: {0}")]
    BaggageNotFound(Uuid),
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BaggageStatus,
        to: BaggageStatus,
    },
    #[error("Baggage is in terminal status {0}; no further events accepted")]
    TerminalState(BaggageStatus),
    #[error("Concurrent update conflict: {0}")]
    Conflict(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type TrackingResult<T> = Result<T, TrackingError>;
