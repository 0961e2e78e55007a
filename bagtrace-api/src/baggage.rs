use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bagtrace_core::models::{Baggage, BaggageStatus};
use bagtrace_core::{TrackingError, TrackingResult};
use bagtrace_lifecycle::{Actor, RegisterBaggage};

use crate::error::AppError;
use crate::middleware::auth::AdminClaims;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateBaggageResponse {
    pub message: String,
    pub baggage: Vec<Baggage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub location: Option<String>,
    pub status: Option<BaggageStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBaggageRequest {
    pub status: BaggageStatus,
    pub location: Option<String>,
}

/// Actor identity for event attribution. The claims carry the scanner's
/// checkpoint; when absent, fall back to the user directory record.
async fn resolve_actor(state: &AppState, claims: &AdminClaims) -> TrackingResult<Actor> {
    let location = match &claims.location {
        Some(l) => Some(l.clone()),
        None => match Uuid::parse_str(&claims.sub) {
            Ok(id) => state.users.get(id).await?.and_then(|u| u.location),
            Err(_) => None,
        },
    };
    Ok(Actor {
        id: claims.sub.clone(),
        location,
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /baggage
/// Register one or more bags under a booking reference.
pub async fn register_baggage(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
    Json(req): Json<RegisterBaggage>,
) -> Result<(StatusCode, Json<CreateBaggageResponse>), AppError> {
    let actor = resolve_actor(&state, &claims).await?;
    let baggage = state.tracker.register_baggage(req, &actor).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBaggageResponse {
            message: format!("Registered {} bag(s)", baggage.len()),
            baggage,
        }),
    ))
}

/// POST /scan/{baggage_id}
/// QR checkpoint scan. The body is optional: a bare scan advances one step
/// in the canonical order at the scanner's location.
pub async fn scan_baggage(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
    Path(baggage_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<Baggage>, AppError> {
    let req: ScanRequest = if body.is_empty() {
        ScanRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| TrackingError::Validation(format!("malformed scan body: {}", e)))?
    };

    let actor = resolve_actor(&state, &claims).await?;
    let baggage = state
        .tracker
        .scan(baggage_id, req.location, req.status, &actor)
        .await?;
    Ok(Json(baggage))
}

/// PUT /baggage/{baggage_id}
/// Manual status entry.
pub async fn update_baggage_status(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
    Path(baggage_id): Path<Uuid>,
    Json(req): Json<UpdateBaggageRequest>,
) -> Result<Json<Baggage>, AppError> {
    let actor = resolve_actor(&state, &claims).await?;
    let baggage = state
        .tracker
        .update_status(baggage_id, req.status, req.location, &actor)
        .await?;
    Ok(Json(baggage))
}
