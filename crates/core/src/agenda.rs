//! Weekly agenda: the events of one week, filtered and grouped per day.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    models::event::{Category, ScheduleEvent},
    week::{WeekRange, canonical_date_key, week_range_of},
};

#[derive(Debug, Clone, Default)]
pub struct AgendaQuery {
    pub reference_date: NaiveDate,
    pub search_term: String,
    /// Empty means every category.
    pub categories: BTreeSet<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyAgenda {
    pub range: WeekRange,
    /// One entry per day of the week, keyed by `YYYY-MM-DD`, each sorted by start time.
    pub days: BTreeMap<String, Vec<ScheduleEvent>>,
}

impl WeeklyAgenda {
    pub fn event_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

pub fn build_weekly_agenda(events: &[ScheduleEvent], query: &AgendaQuery) -> WeeklyAgenda {
    let range = week_range_of(query.reference_date);
    let start_key = range.start_key();
    let end_key = range.end_key();
    let needle = query.search_term.to_lowercase();

    let mut days: BTreeMap<String, Vec<ScheduleEvent>> = range
        .days()
        .map(|day| (canonical_date_key(day), Vec::new()))
        .collect();

    let matching = events.iter().filter(|event| {
        let key = event.date_key();
        key >= start_key.as_str()
            && key <= end_key.as_str()
            && matches_search(event, &needle)
            && (query.categories.is_empty() || query.categories.contains(&event.category))
    });

    for event in matching {
        // Unreachable after the range check above; kept so a bad key never creates a bucket.
        if let Some(bucket) = days.get_mut(event.date_key()) {
            bucket.push(event.clone());
        }
    }

    for bucket in days.values_mut() {
        bucket.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    }

    WeeklyAgenda { range, days }
}

/// Number of events per day of `range`, ignoring search and category filters.
pub fn day_counts(events: &[ScheduleEvent], range: &WeekRange) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = range
        .days()
        .map(|day| (canonical_date_key(day), 0))
        .collect();

    for event in events {
        if let Some(count) = counts.get_mut(event.date_key()) {
            *count += 1;
        }
    }
    counts
}

fn matches_search(event: &ScheduleEvent, needle: &str) -> bool {
    needle.is_empty()
        || event.title.to_lowercase().contains(needle)
        || event.location.to_lowercase().contains(needle)
}
