use std::net::SocketAddr;
use std::sync::Arc;

use bagtrace_api::{app, state::{AppState, AuthConfig}};
use bagtrace_core::models::{AdminType, Flight, FlightStatus, User, UserRole};
use bagtrace_core::repository::{FlightRepository, UserRepository};
use bagtrace_lifecycle::{StatsEngine, Tracker};
use bagtrace_store::{
    InMemoryBaggageRepository, InMemoryFlightRepository, InMemoryTrackingLedger,
    InMemoryUserRepository,
};
use chrono::{Duration, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

fn demo_schedule() -> Vec<Flight> {
    let now = Utc::now();
    [
        ("AA100", "JFK", "LAX", 6),
        ("BA200", "LHR", "JFK", 8),
        ("UA455", "SFO", "ORD", 4),
    ]
    .into_iter()
    .map(|(number, origin, destination, hours)| Flight {
        flight_number: number.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        departure_time: now + Duration::hours(2),
        arrival_time: now + Duration::hours(2 + hours),
        status: FlightStatus::Scheduled,
    })
    .collect()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bagtrace_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = bagtrace_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting bagtrace API on port {}", config.server.port);

    let baggage = Arc::new(InMemoryBaggageRepository::new());
    let ledger = Arc::new(InMemoryTrackingLedger::new());
    let flights: Arc<dyn FlightRepository> =
        Arc::new(InMemoryFlightRepository::with_schedule(demo_schedule()));
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());

    // Flight-schedule and account management live with external
    // collaborators; seed enough for the service to run standalone.
    users
        .insert(User {
            id: Uuid::new_v4(),
            email: "ops@bagtrace.test".to_string(),
            name: "Operations".to_string(),
            role: UserRole::Admin,
            location: Some("JFK".to_string()),
            admin_type: Some(AdminType::Supervisor),
        })
        .await
        .expect("Failed to seed admin user");

    let tracker = Arc::new(Tracker::new(
        baggage.clone(),
        ledger.clone(),
        flights.clone(),
        config.tracking.default_location.clone(),
    ));
    let stats = Arc::new(StatsEngine::new(
        baggage,
        ledger,
        flights.clone(),
        users.clone(),
        config.tracking.recent_activity_limit,
    ));

    let app_state = AppState {
        tracker,
        stats,
        flights,
        users,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
