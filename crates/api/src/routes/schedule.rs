use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/agenda", get(handlers::agenda::get_agenda))
        .route(
            "/api/events",
            get(handlers::events::list_events).post(handlers::events::save_event),
        )
        .route("/api/events/:id", delete(handlers::events::delete_event))
        .route("/api/reports", get(handlers::reports::get_report))
        .route("/api/reports/export", get(handlers::reports::export_report))
}
