use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use bagtrace_core::TrackingError;

#[derive(Debug)]
pub enum AppError {
    Tracking(TrackingError),
    Internal(anyhow::Error),
}

impl From<TrackingError> for AppError {
    fn from(err: TrackingError) -> Self {
        Self::Tracking(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Tracking(err) => {
                let status = match &err {
                    TrackingError::Validation(_) => StatusCode::BAD_REQUEST,
                    TrackingError::FlightNotFound(_) | TrackingError::BaggageNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    // State machine rejections are reported, never coerced.
                    TrackingError::InvalidTransition { .. }
                    | TrackingError::TerminalState(_)
                    | TrackingError::Conflict(_) => StatusCode::CONFLICT,
                    TrackingError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, err.to_string())
            }
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
