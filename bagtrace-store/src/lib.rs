pub mod app_config;
pub mod baggage_repo;
pub mod flight_repo;
pub mod ledger_repo;
pub mod user_repo;

pub use baggage_repo::InMemoryBaggageRepository;
pub use flight_repo::InMemoryFlightRepository;
pub use ledger_repo::InMemoryTrackingLedger;
pub use user_repo::InMemoryUserRepository;
