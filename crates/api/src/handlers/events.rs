use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use weekplan_core::{
    access::Action,
    models::event::{EventDraft, ScheduleEvent},
};

use crate::{ApiState, middleware::error_handling::AppError, middleware::session::Session};

/// Full event list for the management table.
pub async fn list_events(
    State(state): State<Arc<ApiState>>,
    session: Session,
) -> Result<Json<Vec<ScheduleEvent>>, AppError> {
    session.require(Action::ManageEvents)?;
    Ok(Json(state.events.list().await))
}

/// Creates the event when the body has no id, otherwise updates it.
pub async fn save_event(
    State(state): State<Arc<ApiState>>,
    session: Session,
    Json(draft): Json<EventDraft>,
) -> Result<Json<ScheduleEvent>, AppError> {
    let saved = state.events.upsert(session.caller, draft).await?;
    state.refresh_agenda().await;
    Ok(Json(saved))
}

pub async fn delete_event(
    State(state): State<Arc<ApiState>>,
    session: Session,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.events.delete(session.caller, &id).await?;
    state.refresh_agenda().await;
    Ok(StatusCode::NO_CONTENT)
}
