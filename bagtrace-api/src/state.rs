use std::sync::Arc;

use bagtrace_core::repository::{FlightRepository, UserRepository};
use bagtrace_lifecycle::{StatsEngine, Tracker};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Tracker>,
    pub stats: Arc<StatsEngine>,
    pub flights: Arc<dyn FlightRepository>,
    pub users: Arc<dyn UserRepository>,
    pub auth: AuthConfig,
}
