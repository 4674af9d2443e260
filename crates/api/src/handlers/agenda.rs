//! Public weekly agenda, served from the in-memory snapshot.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};
use weekplan_core::{
    agenda::{AgendaQuery, WeeklyAgenda, build_weekly_agenda, day_counts},
    errors::PlanError,
    models::event::Category,
    week::{parse_date_key, today_local},
};

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Default, Deserialize)]
pub struct AgendaParams {
    /// Any day of the wanted week, `YYYY-MM-DD`. Defaults to today.
    pub date: Option<String>,
    /// Case-insensitive search over title and location
    pub q: Option<String>,
    /// Comma-separated category labels or names
    pub categories: Option<String>,
}

impl AgendaParams {
    pub fn into_query(self) -> Result<AgendaQuery, PlanError> {
        let reference_date = match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_date_key(raw)
                .ok_or_else(|| PlanError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))?,
            None => today_local(),
        };

        let categories = self
            .categories
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::parse::<Category>)
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(AgendaQuery {
            reference_date,
            search_term: self.q.unwrap_or_default(),
            categories,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AgendaResponse {
    #[serde(flatten)]
    pub agenda: WeeklyAgenda,
    /// Events per day before search and category filters
    pub day_counts: BTreeMap<String, usize>,
}

pub async fn get_agenda(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<AgendaParams>,
) -> Result<Json<AgendaResponse>, AppError> {
    let query = params.into_query()?;
    let events = state.agenda.events().await;
    let agenda = build_weekly_agenda(&events, &query);
    let day_counts = day_counts(&events, &agenda.range);
    Ok(Json(AgendaResponse { agenda, day_counts }))
}
