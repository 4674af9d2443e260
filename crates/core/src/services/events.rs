use std::sync::Arc;

use tracing::{debug, error};

use crate::{
    access::{self, Action, Caller},
    errors::{PlanError, PlanResult},
    models::event::{EventDraft, ScheduleEvent},
    ports::EventRepository,
    week::date_key,
};

/// Event persistence with date normalization, ordering and access checks.
#[derive(Clone)]
pub struct EventGateway {
    repo: Arc<dyn EventRepository>,
}

impl EventGateway {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    /// All events ordered by date then start time. Failures propagate.
    pub async fn try_list(&self) -> PlanResult<Vec<ScheduleEvent>> {
        let mut events = self.repo.list().await.map_err(PlanError::Database)?;
        for event in &mut events {
            let key = date_key(&event.date);
            if key.len() != event.date.len() {
                event.date = key.to_string();
            }
        }
        events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.start_time.cmp(&b.start_time))
        });
        Ok(events)
    }

    /// Like [`try_list`](Self::try_list) but logs failures and yields an empty list.
    pub async fn list(&self) -> Vec<ScheduleEvent> {
        match self.try_list().await {
            Ok(events) => events,
            Err(e) => {
                error!("Failed to load events: {}", e);
                Vec::new()
            }
        }
    }

    /// Creates the event when the draft has no id, otherwise overwrites the stored one.
    pub async fn upsert(&self, caller: Caller, draft: EventDraft) -> PlanResult<ScheduleEvent> {
        access::ensure(caller, Action::ManageEvents)?;
        let event = draft.validate()?;

        match event.id.clone() {
            None => {
                debug!("Creating event '{}' on {}", event.title, event.date);
                self.repo.insert(&event).await.map_err(PlanError::Database)
            }
            Some(id) => {
                debug!("Updating event {}", id);
                self.repo
                    .update(&id, &event)
                    .await
                    .map_err(PlanError::Database)?
                    .ok_or_else(|| PlanError::NotFound(format!("Event with ID {} not found", id)))
            }
        }
    }

    pub async fn delete(&self, caller: Caller, id: &str) -> PlanResult<()> {
        access::ensure(caller, Action::ManageEvents)?;
        let id = id.trim();
        if id.is_empty() {
            return Err(PlanError::Validation("Missing event id".to_string()));
        }

        let removed = self.repo.delete(id).await.map_err(PlanError::Database)?;
        if removed {
            debug!("Deleted event {}", id);
            Ok(())
        } else {
            Err(PlanError::NotFound(format!("Event with ID {} not found", id)))
        }
    }
}
