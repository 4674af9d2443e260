//! Date-range reports for admins and reporters.

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use weekplan_core::{
    access::Action,
    errors::PlanError,
    models::event::ScheduleEvent,
    report::{REPORT_FILE_NAME, build_report, export_csv},
    week::{canonical_date_key, parse_date_key, today_local},
};

use crate::{ApiState, middleware::error_handling::AppError, middleware::session::Session};

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub from: String,
    pub to: String,
    pub events: Vec<ScheduleEvent>,
}

impl ReportParams {
    /// Validated `(from, to)` keys; both default to today.
    pub fn range(&self) -> Result<(String, String), PlanError> {
        let today = canonical_date_key(today_local());
        let key = |raw: &Option<String>| match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_date_key(raw)
                .map(canonical_date_key)
                .ok_or_else(|| PlanError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw))),
            None => Ok(today.clone()),
        };
        Ok((key(&self.from)?, key(&self.to)?))
    }
}

async fn selected_events(state: &ApiState, params: &ReportParams) -> Result<(String, String, Vec<ScheduleEvent>), AppError> {
    let (from, to) = params.range()?;
    let events = state.events.list().await;
    let selected = build_report(&events, &from, &to);
    Ok((from, to, selected))
}

pub async fn get_report(
    State(state): State<Arc<ApiState>>,
    session: Session,
    Query(params): Query<ReportParams>,
) -> Result<Json<ReportResponse>, AppError> {
    session.require(Action::ViewReports)?;
    let (from, to, events) = selected_events(&state, &params).await?;
    Ok(Json(ReportResponse { from, to, events }))
}

pub async fn export_report(
    State(state): State<Arc<ApiState>>,
    session: Session,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    session.require(Action::ExportReports)?;
    let (_, _, events) = selected_events(&state, &params).await?;

    let disposition = format!("attachment; filename=\"{}\"", REPORT_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export_csv(&events),
    ))
}
