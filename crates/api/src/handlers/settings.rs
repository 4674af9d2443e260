use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use weekplan_core::models::settings::{SiteSettings, THEME_PRESETS, ThemePreset};

use crate::{ApiState, middleware::error_handling::AppError, middleware::session::Session};

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    #[serde(flatten)]
    pub settings: SiteSettings,
    pub theme_presets: &'static [ThemePreset],
}

#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme_color: String,
}

pub async fn get_settings(State(state): State<Arc<ApiState>>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        settings: state.settings.get_settings().await,
        theme_presets: &THEME_PRESETS,
    })
}

pub async fn set_registration(
    State(state): State<Arc<ApiState>>,
    session: Session,
    Json(payload): Json<RegistrationRequest>,
) -> Result<StatusCode, AppError> {
    state
        .settings
        .set_registration_enabled(session.caller, payload.enabled)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_theme(
    State(state): State<Arc<ApiState>>,
    session: Session,
    Json(payload): Json<ThemeRequest>,
) -> Result<Json<ThemeResponse>, AppError> {
    let theme_color = state.settings.set_theme_color(session.caller, &payload.color).await?;
    Ok(Json(ThemeResponse { theme_color }))
}
