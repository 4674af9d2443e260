use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    errors::{PlanError, PlanResult},
    week::date_key,
};

/// Closed set of event tags. Serialized with the labels shown to users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "Họp", alias = "Meeting")]
    Meeting,
    #[serde(rename = "Công tác", alias = "FieldWork")]
    FieldWork,
    #[serde(rename = "Tiếp dân", alias = "CitizenReception")]
    CitizenReception,
    #[serde(rename = "Khác", alias = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Meeting,
        Category::FieldWork,
        Category::CitizenReception,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Meeting => "Họp",
            Category::FieldWork => "Công tác",
            Category::CitizenReception => "Tiếp dân",
            Category::Other => "Khác",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = PlanError;

    /// Accepts either the display label or the variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s || format!("{:?}", c).eq_ignore_ascii_case(s))
            .ok_or_else(|| PlanError::Validation(format!("Unknown category: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    /// Canonical `YYYY-MM-DD` key.
    pub date: String,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
}

impl ScheduleEvent {
    /// Date with any time component cut off.
    pub fn date_key(&self) -> &str {
        date_key(&self.date)
    }

    pub fn is_persisted(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// `08:00` or `08:00 - 11:00`.
    pub fn time_label(&self) -> String {
        match self.end_time.as_deref().filter(|t| !t.is_empty()) {
            Some(end) => format!("{} - {}", self.start_time, end),
            None => self.start_time.clone(),
        }
    }
}

/// Partially filled event coming from the edit form or from text extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub participants: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl EventDraft {
    /// Defaults offered when an admin starts a new entry.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            id: None,
            title: Some(String::new()),
            date: Some(today.format("%Y-%m-%d").to_string()),
            start_time: Some("08:00".to_string()),
            end_time: Some("11:00".to_string()),
            location: Some(String::new()),
            participants: Some(Vec::new()),
            description: Some(String::new()),
            category: Some(Category::Meeting),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.as_deref().is_none_or(str::is_empty)
    }

    /// Checks the required fields and produces a storable event.
    ///
    /// The date loses any time suffix and times are re-rendered as
    /// zero-padded `HH:mm` so that they keep sorting as text. A draft without
    /// a category is stored as [`Category::Meeting`], the form's default.
    pub fn validate(self) -> PlanResult<ScheduleEvent> {
        let title = required(self.title, "title")?;
        let raw_date = required(self.date, "date")?;
        let start_time = normalize_time(&required(self.start_time, "start_time")?)?;

        let date = date_key(&raw_date).to_string();
        NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| PlanError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw_date)))?;

        let end_time = match self.end_time.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => Some(normalize_time(t)?),
            _ => None,
        };

        Ok(ScheduleEvent {
            id: self.id.filter(|id| !id.is_empty()),
            title,
            date,
            start_time,
            end_time,
            location: self.location.unwrap_or_default(),
            participants: self
                .participants
                .unwrap_or_default()
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            category: self.category.unwrap_or_default(),
        })
    }
}

impl From<ScheduleEvent> for EventDraft {
    fn from(event: ScheduleEvent) -> Self {
        Self {
            id: event.id,
            title: Some(event.title),
            date: Some(event.date),
            start_time: Some(event.start_time),
            end_time: event.end_time,
            location: Some(event.location),
            participants: Some(event.participants),
            description: event.description,
            category: Some(event.category),
        }
    }
}

fn required(value: Option<String>, field: &str) -> PlanResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PlanError::Validation(format!("Missing required field: {}", field)))
}

fn normalize_time(raw: &str) -> PlanResult<String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| PlanError::Validation(format!("Invalid time '{}', expected HH:mm", raw)))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
