//! Interfaces to the outside world: storage, identity, mail and the language model.
//!
//! Implementations live in `weekplan-db` and `weekplan-assistant`. With the
//! `mocks` feature every trait also gets a `mockall` double (`MockEventRepository`, …).

use async_trait::async_trait;
use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::{
    event::ScheduleEvent,
    profile::{Identity, PasswordReset, SessionGrant, UserProfile},
    settings::SiteSettings,
};

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<ScheduleEvent>>;
    async fn insert(&self, event: &ScheduleEvent) -> Result<ScheduleEvent>;
    /// `None` when no event has this id.
    async fn update(&self, id: &str, event: &ScheduleEvent) -> Result<Option<ScheduleEvent>>;
    /// `false` when no event has this id.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` when the credentials do not match an account.
    async fn sign_in(&self, email: &str, password: &str, remember: bool) -> Result<Option<SessionGrant>>;
    /// `None` when the email is already registered.
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<Option<SessionGrant>>;
    async fn resolve(&self, token: &str) -> Result<Option<Identity>>;
    async fn sign_out(&self, token: &str) -> Result<()>;
    /// `None` when no account has this email.
    async fn issue_password_reset(&self, email: &str) -> Result<Option<PasswordReset>>;
    /// Sets a new password and ends every session of the account. `None` when
    /// the token is unknown, used or expired.
    async fn redeem_password_reset(&self, token: &str, new_password: &str) -> Result<Option<Identity>>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<()>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<UserProfile>>;
    async fn insert(&self, profile: &UserProfile) -> Result<()>;
    /// Newest first.
    async fn list_all(&self) -> Result<Vec<UserProfile>>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn fetch(&self) -> Result<Option<SiteSettings>>;
    /// Returns the number of rows touched.
    async fn update_registration(&self, enabled: bool) -> Result<u64>;
    /// Returns the number of rows touched.
    async fn update_theme_color(&self, color: &str) -> Result<u64>;
    async fn insert(&self, settings: &SiteSettings) -> Result<()>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ViewCounter: Send + Sync {
    async fn increment(&self) -> Result<i64>;
    async fn current(&self) -> Result<i64>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    /// When set the model must answer with JSON matching this schema.
    pub response_schema: Option<Value>,
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
