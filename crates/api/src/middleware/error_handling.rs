//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so that every
//! handler reports failures the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use weekplan_core::errors::PlanError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use weekplan_api::middleware::error_handling::AppError;
/// use weekplan_core::errors::PlanError;
///
/// async fn handler(id: String) -> Result<Json<String>, AppError> {
///     Err(AppError(PlanError::NotFound(format!("Event with ID {} not found", id))))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub PlanError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PlanError::NotFound(_) => StatusCode::NOT_FOUND,
            PlanError::Validation(_) => StatusCode::BAD_REQUEST,
            PlanError::Authentication(_) => StatusCode::UNAUTHORIZED,
            PlanError::Authorization(_) => StatusCode::FORBIDDEN,
            PlanError::Upstream(_) => StatusCode::BAD_GATEWAY,
            PlanError::Database(_) | PlanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `PlanResult` inside handlers.
impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(PlanError::Database(err))
    }
}

pub fn map_error(err: PlanError) -> Response {
    AppError(err).into_response()
}
