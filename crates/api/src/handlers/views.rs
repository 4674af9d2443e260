use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::ApiState;

#[derive(Debug, Serialize)]
pub struct ViewCountResponse {
    pub count: i64,
}

/// Counts one page view. Never fails; see `ViewCountGateway::increment_and_get`.
pub async fn record_view(State(state): State<Arc<ApiState>>) -> Json<ViewCountResponse> {
    Json(ViewCountResponse {
        count: state.views.increment_and_get().await,
    })
}
