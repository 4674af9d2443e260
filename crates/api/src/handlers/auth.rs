use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use weekplan_core::models::profile::{SessionGrant, UserProfile};

use crate::{ApiState, middleware::error_handling::AppError, middleware::session::Session};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email, or a bare user name completed with the login domain
    pub identifier: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub identifier: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub identifier: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetConfirmRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}

async fn session_response(state: &ApiState, grant: SessionGrant) -> SessionResponse {
    let profile = state.profiles.current_profile(Some(&grant.token)).await;
    SessionResponse {
        token: grant.token,
        expires_at: grant.expires_at,
        profile,
    }
}

pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let grant = state
        .profiles
        .login(&payload.identifier, &payload.password, payload.remember)
        .await?;
    Ok(Json(session_response(&state, grant).await))
}

pub async fn sign_up(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let grant = state
        .profiles
        .sign_up(&payload.identifier, &payload.password, &payload.full_name)
        .await?;
    Ok((StatusCode::CREATED, Json(session_response(&state, grant).await)))
}

/// Always succeeds, even without a session.
pub async fn logout(State(state): State<Arc<ApiState>>, session: Session) -> StatusCode {
    if let Some(token) = session.token() {
        state.profiles.logout(token).await;
    }
    StatusCode::NO_CONTENT
}

pub async fn status(State(state): State<Arc<ApiState>>, session: Session) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        authenticated: state.profiles.is_authenticated(session.token()).await,
    })
}

/// Answers 202 whether or not the account exists.
pub async fn request_password_reset(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ResetRequest>,
) -> Result<StatusCode, AppError> {
    state.profiles.request_password_reset(&payload.identifier).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn confirm_password_reset(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ResetConfirmRequest>,
) -> Result<StatusCode, AppError> {
    state
        .profiles
        .reset_password(&payload.token, &payload.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
