//! In-memory copy of the event list used for the public agenda.
//!
//! Reloads may overlap (the periodic timer and a reload after each edit).
//! Every reload takes a ticket when it starts and its result is applied only
//! if no later-started reload has already been applied, so a slow, older
//! fetch never overwrites a newer one.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::RwLock, task::JoinHandle, time};
use tracing::{debug, info, warn};
use weekplan_core::{models::event::ScheduleEvent, services::EventGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Default)]
struct Applied {
    ticket: u64,
    events: Arc<Vec<ScheduleEvent>>,
}

#[derive(Default)]
pub struct AgendaSnapshot {
    issued: AtomicU64,
    applied: RwLock<Applied>,
}

impl AgendaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Arc<Vec<ScheduleEvent>> {
        self.applied.read().await.events.clone()
    }

    pub fn begin(&self) -> RefreshTicket {
        RefreshTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Stores `events` unless a newer ticket was applied first. Returns
    /// whether the snapshot changed.
    pub async fn complete(&self, ticket: RefreshTicket, events: Vec<ScheduleEvent>) -> bool {
        let mut applied = self.applied.write().await;
        if ticket.0 <= applied.ticket {
            debug!("Discarding stale agenda refresh #{}", ticket.0);
            return false;
        }
        applied.ticket = ticket.0;
        applied.events = Arc::new(events);
        true
    }

    /// Reloads from storage. Failures keep the previous snapshot.
    pub async fn refresh(&self, gateway: &EventGateway) -> bool {
        let ticket = self.begin();
        match gateway.try_list().await {
            Ok(events) => self.complete(ticket, events).await,
            Err(e) => {
                warn!("Agenda refresh failed, keeping previous snapshot: {}", e);
                false
            }
        }
    }
}

/// Reloads the snapshot immediately and then every `period`.
pub fn spawn_refresh_loop(
    snapshot: Arc<AgendaSnapshot>,
    gateway: EventGateway,
    period: Duration,
) -> JoinHandle<()> {
    info!("Refreshing agenda every {}s", period.as_secs());
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            snapshot.refresh(&gateway).await;
        }
    })
}
