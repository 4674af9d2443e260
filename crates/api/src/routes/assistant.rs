use axum::{Router, routing::post};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/assistant/ask", post(handlers::assistant::ask))
        .route("/api/assistant/extract", post(handlers::assistant::extract))
}
