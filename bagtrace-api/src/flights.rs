use axum::{extract::State, Json};

use bagtrace_core::models::Flight;

use crate::error::AppError;
use crate::state::AppState;

/// GET /flights
/// Public view of the active schedule (registration picks a flight here).
pub async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<Flight>>, AppError> {
    let flights = state.flights.list().await?;
    Ok(Json(flights))
}
