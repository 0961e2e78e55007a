use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use bagtrace_core::models::{Baggage, TrackingEvent};
use bagtrace_lifecycle::QueryType;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub query: String,
    pub query_type: QueryType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedBaggageResponse {
    #[serde(flatten)]
    pub baggage: Baggage,
    pub tracking_history: Vec<TrackingEvent>,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub results: Vec<TrackedBaggageResponse>,
}

#[derive(Debug, Serialize)]
pub struct FlightBaggageResponse {
    pub flight: String,
    pub baggage: Vec<Baggage>,
    pub count: usize,
}

/// POST /track
/// Public lookup by baggage id or booking reference, history embedded.
pub async fn track_baggage(
    State(state): State<AppState>,
    Json(req): Json<TrackRequest>,
) -> Result<Json<TrackResponse>, AppError> {
    let results = state
        .tracker
        .track(&req.query, req.query_type)
        .await?
        .into_iter()
        .map(|t| TrackedBaggageResponse {
            baggage: t.baggage,
            tracking_history: t.history,
        })
        .collect();

    Ok(Json(TrackResponse { results }))
}

/// GET /flight/{flight_number}/baggage
pub async fn flight_baggage(
    State(state): State<AppState>,
    Path(flight_number): Path<String>,
) -> Result<Json<FlightBaggageResponse>, AppError> {
    let baggage = state.tracker.flight_baggage(&flight_number).await?;
    Ok(Json(FlightBaggageResponse {
        flight: flight_number,
        count: baggage.len(),
        baggage,
    }))
}
