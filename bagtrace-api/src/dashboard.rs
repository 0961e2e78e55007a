use axum::{extract::State, Json};

use bagtrace_lifecycle::DashboardStats;

use crate::error::AppError;
use crate::state::AppState;

/// GET /dashboard/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = state.stats.compute_stats().await?;
    Ok(Json(stats))
}
