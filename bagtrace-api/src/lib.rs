use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod baggage;
pub mod dashboard;
pub mod error;
pub mod flights;
pub mod middleware;
pub mod state;
pub mod track;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Lookup surface is public; everything that mutates or aggregates is
    // admin-gated per the transport contract.
    let public = Router::new()
        .route("/track", post(track::track_baggage))
        .route("/flights", get(flights::list_flights));

    let admin = Router::new()
        .route("/baggage", post(baggage::register_baggage))
        .route("/baggage/{baggage_id}", put(baggage::update_baggage_status))
        .route("/scan/{baggage_id}", post(baggage::scan_baggage))
        .route("/flight/{flight_number}/baggage", get(track::flight_baggage))
        .route("/dashboard/stats", get(dashboard::dashboard_stats))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::admin_auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
