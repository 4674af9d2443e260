use async_trait::async_trait;
use chrono::Utc;
use eyre::Result;
use uuid::Uuid;
use weekplan_core::{
    models::{
        event::ScheduleEvent,
        profile::{Identity, PasswordReset, SessionGrant, UserProfile},
        settings::SiteSettings,
    },
    ports::{EventRepository, IdentityProvider, ProfileRepository, SettingsRepository, ViewCounter},
};

use crate::{
    DbPool, credentials,
    models::DbAccount,
    repositories::{account, event, profile, site_stats},
};

/// PostgreSQL implementation of every storage port.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn open_session(&self, account: DbAccount, remember: bool) -> Result<SessionGrant> {
        let token = credentials::generate_session_token();
        let expires_at = Utc::now() + credentials::session_ttl(remember);
        account::create_session(&self.pool, &credentials::hash_token(&token), account.id, expires_at).await?;

        Ok(SessionGrant {
            token,
            expires_at,
            identity: account.into(),
        })
    }
}

/// Ids that are not UUIDs cannot name a stored event.
fn event_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

#[async_trait]
impl EventRepository for PgStore {
    async fn list(&self) -> Result<Vec<ScheduleEvent>> {
        let rows = event::list_events(&self.pool).await?;
        Ok(rows.into_iter().map(ScheduleEvent::from).collect())
    }

    async fn insert(&self, new_event: &ScheduleEvent) -> Result<ScheduleEvent> {
        Ok(event::create_event(&self.pool, new_event).await?.into())
    }

    async fn update(&self, id: &str, changes: &ScheduleEvent) -> Result<Option<ScheduleEvent>> {
        let Some(id) = event_id(id) else {
            return Ok(None);
        };
        Ok(event::update_event(&self.pool, id, changes).await?.map(ScheduleEvent::from))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        match event_id(id) {
            Some(id) => event::delete_event(&self.pool, id).await,
            None => Ok(false),
        }
    }
}

#[async_trait]
impl IdentityProvider for PgStore {
    async fn sign_in(&self, email: &str, password: &str, remember: bool) -> Result<Option<SessionGrant>> {
        let email = credentials::normalize_email(email);
        let Some(found) = account::get_account_by_email(&self.pool, &email).await? else {
            tracing::debug!("Sign-in for unknown account: {}", email);
            return Ok(None);
        };
        if !credentials::verify_password(&found.password_hash, password)? {
            tracing::debug!("Wrong password for account: {}", email);
            return Ok(None);
        }

        Ok(Some(self.open_session(found, remember).await?))
    }

    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<Option<SessionGrant>> {
        let email = credentials::normalize_email(email);
        let password_hash = credentials::hash_password(password)?;
        match account::create_account(&self.pool, &email, &password_hash, full_name).await? {
            Some(created) => Ok(Some(self.open_session(created, false).await?)),
            None => Ok(None),
        }
    }

    async fn resolve(&self, token: &str) -> Result<Option<Identity>> {
        let found = account::get_account_by_session(&self.pool, &credentials::hash_token(token)).await?;
        Ok(found.map(Identity::from))
    }

    async fn sign_out(&self, token: &str) -> Result<()> {
        account::delete_session(&self.pool, &credentials::hash_token(token)).await
    }

    async fn issue_password_reset(&self, email: &str) -> Result<Option<PasswordReset>> {
        let email = credentials::normalize_email(email);
        let Some(found) = account::get_account_by_email(&self.pool, &email).await? else {
            return Ok(None);
        };

        let token = credentials::generate_session_token();
        let expires_at = Utc::now() + credentials::reset_ttl();
        account::create_password_reset(&self.pool, &credentials::hash_token(&token), found.id, expires_at).await?;

        Ok(Some(PasswordReset {
            token,
            email: found.email,
            expires_at,
        }))
    }

    async fn redeem_password_reset(&self, token: &str, new_password: &str) -> Result<Option<Identity>> {
        let password_hash = credentials::hash_password(new_password)?;
        let account =
            account::redeem_password_reset(&self.pool, &credentials::hash_token(token), &password_hash).await?;
        Ok(account.map(Identity::from))
    }
}

#[async_trait]
impl ProfileRepository for PgStore {
    async fn find(&self, id: Uuid) -> Result<Option<UserProfile>> {
        Ok(profile::get_profile_by_id(&self.pool, id).await?.map(UserProfile::from))
    }

    async fn insert(&self, new_profile: &UserProfile) -> Result<()> {
        profile::create_profile(&self.pool, new_profile).await
    }

    async fn list_all(&self) -> Result<Vec<UserProfile>> {
        let rows = profile::list_profiles(&self.pool).await?;
        Ok(rows.into_iter().map(UserProfile::from).collect())
    }
}

#[async_trait]
impl SettingsRepository for PgStore {
    async fn fetch(&self) -> Result<Option<SiteSettings>> {
        Ok(site_stats::get_site_stats(&self.pool).await?.map(SiteSettings::from))
    }

    async fn update_registration(&self, enabled: bool) -> Result<u64> {
        site_stats::update_registration_enabled(&self.pool, enabled).await
    }

    async fn update_theme_color(&self, color: &str) -> Result<u64> {
        site_stats::update_theme_color(&self.pool, color).await
    }

    async fn insert(&self, settings: &SiteSettings) -> Result<()> {
        site_stats::insert_site_settings(&self.pool, settings.registration_enabled, &settings.theme_color).await
    }
}

#[async_trait]
impl ViewCounter for PgStore {
    async fn increment(&self) -> Result<i64> {
        site_stats::increment_view_count(&self.pool).await
    }

    async fn current(&self) -> Result<i64> {
        site_stats::get_view_count(&self.pool).await
    }
}
