use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use weekplan_core::{access::Action, errors::PlanError, models::event::EventDraft, services::Assistant};

use crate::{ApiState, middleware::error_handling::AppError, middleware::session::Session};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    /// Id of the event being edited, kept on the returned draft
    #[serde(default)]
    pub editing_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub draft: Option<EventDraft>,
}

fn assistant(state: &ApiState) -> Result<&Assistant, AppError> {
    state
        .assistant
        .as_ref()
        .ok_or_else(|| AppError(PlanError::Upstream("Assistant is not configured".to_string())))
}

/// Answers a question using the current agenda snapshot as context.
pub async fn ask(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(AppError(PlanError::Validation("Question must not be empty".to_string())));
    }

    let assistant = assistant(&state)?;
    let events = state.agenda.events().await;
    let answer = assistant.ask(&events, question).await;
    Ok(Json(AskResponse { answer }))
}

/// Suggests form values from free text. Nothing is saved.
pub async fn extract(
    State(state): State<Arc<ApiState>>,
    session: Session,
    Json(payload): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    session.require(Action::AutofillEvents)?;
    let draft = assistant(&state)?
        .extract_event(session.caller, &payload.text, payload.editing_id)
        .await?;
    Ok(Json(ExtractResponse { draft }))
}
