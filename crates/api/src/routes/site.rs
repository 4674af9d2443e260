use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/settings", get(handlers::settings::get_settings))
        .route(
            "/api/settings/registration",
            put(handlers::settings::set_registration),
        )
        .route("/api/settings/theme", put(handlers::settings::set_theme))
        .route("/api/views", post(handlers::views::record_view))
}
