use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;
use weekplan_core::models::{
    event::{Category, ScheduleEvent},
    profile::{Identity, Role, UserProfile},
    settings::SiteSettings,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEvent {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub participants: Vec<String>,
    pub description: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbEvent> for ScheduleEvent {
    fn from(row: DbEvent) -> Self {
        let category = row.category.parse().unwrap_or_else(|_| {
            warn!("Event {} has unknown category '{}'", row.id, row.category);
            Category::Other
        });
        ScheduleEvent {
            id: Some(row.id.to_string()),
            title: row.title,
            date: row.date.format("%Y-%m-%d").to_string(),
            start_time: row.start_time,
            end_time: row.end_time,
            location: row.location.unwrap_or_default(),
            participants: row.participants,
            description: row.description,
            category,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbAccount> for Identity {
    fn from(row: DbAccount) -> Self {
        Identity {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            email_confirmed: row.email_confirmed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token_hash: String,
    pub account_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    /// Joined from `accounts`.
    pub email_confirmed: bool,
}

impl From<DbProfile> for UserProfile {
    fn from(row: DbProfile) -> Self {
        UserProfile {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: Role::parse(&row.role),
            created_at: row.created_at,
            email_confirmed: row.email_confirmed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSiteStats {
    pub id: i32,
    pub registration_enabled: bool,
    pub theme_color: String,
    pub view_count: i64,
}

impl From<DbSiteStats> for SiteSettings {
    fn from(row: DbSiteStats) -> Self {
        SiteSettings {
            registration_enabled: row.registration_enabled,
            theme_color: row.theme_color,
        }
    }
}
