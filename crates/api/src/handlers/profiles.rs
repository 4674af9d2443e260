use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;
use weekplan_core::{
    access::{Section, landing_section, visible_sections},
    errors::PlanError,
    models::profile::UserProfile,
};

use crate::{ApiState, middleware::error_handling::AppError, middleware::session::Session};

#[derive(Debug, Serialize)]
pub struct SectionsResponse {
    pub sections: Vec<Section>,
    pub landing: Option<Section>,
}

pub async fn current_profile(
    State(state): State<Arc<ApiState>>,
    session: Session,
) -> Result<Json<UserProfile>, AppError> {
    let token = session.require_token()?;
    state
        .profiles
        .current_profile(Some(token))
        .await
        .map(Json)
        .ok_or_else(|| AppError(PlanError::Authentication("Session expired or unknown".to_string())))
}

pub async fn list_profiles(
    State(state): State<Arc<ApiState>>,
    session: Session,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    Ok(Json(state.profiles.all_profiles(session.caller).await?))
}

/// Dashboard sections the caller may open.
pub async fn sections(session: Session) -> Json<SectionsResponse> {
    Json(SectionsResponse {
        sections: visible_sections(session.caller),
        landing: landing_section(session.caller),
    })
}
