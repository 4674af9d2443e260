use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/signup", post(handlers::auth::sign_up))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/status", get(handlers::auth::status))
        .route("/api/auth/reset", post(handlers::auth::request_password_reset))
        .route("/api/auth/reset/confirm", post(handlers::auth::confirm_password_reset))
        .route("/api/profiles/me", get(handlers::profiles::current_profile))
        .route("/api/profiles", get(handlers::profiles::list_profiles))
        .route("/api/sections", get(handlers::profiles::sections))
}
