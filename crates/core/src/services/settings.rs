use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::{
    access::{self, Action, Caller},
    errors::{PlanError, PlanResult},
    models::settings::{SiteSettings, validate_theme_color},
    ports::SettingsRepository,
};

/// Site-wide settings plus a watch channel carrying the latest known values.
///
/// Components that render with the theme hold a receiver from
/// [`subscribe`](Self::subscribe) instead of polling storage.
#[derive(Clone)]
pub struct SiteConfigGateway {
    repo: Arc<dyn SettingsRepository>,
    current: Arc<watch::Sender<SiteSettings>>,
}

impl SiteConfigGateway {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        let (current, _) = watch::channel(SiteSettings::default());
        Self {
            repo,
            current: Arc::new(current),
        }
    }

    /// Stored settings, or the defaults when they cannot be read.
    pub async fn get_settings(&self) -> SiteSettings {
        match self.repo.fetch().await {
            Ok(stored) => {
                let settings = stored.unwrap_or_default();
                self.current.send_replace(settings.clone());
                settings
            }
            Err(e) => {
                error!("Failed to load site settings: {}", e);
                SiteSettings::default()
            }
        }
    }

    pub fn current(&self) -> SiteSettings {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SiteSettings> {
        self.current.subscribe()
    }

    pub async fn set_registration_enabled(&self, caller: Caller, enabled: bool) -> PlanResult<()> {
        access::ensure(caller, Action::ManageSettings)?;

        let updated = self
            .repo
            .update_registration(enabled)
            .await
            .map_err(PlanError::Database)?;
        let fallback = SiteSettings {
            registration_enabled: enabled,
            ..self.current()
        };
        let next = self.after_write(updated, fallback).await?;

        info!("Registration {}", if enabled { "enabled" } else { "disabled" });
        self.current.send_replace(next);
        Ok(())
    }

    /// Stores a new theme colour and returns it in normalized form.
    pub async fn set_theme_color(&self, caller: Caller, color: &str) -> PlanResult<String> {
        access::ensure(caller, Action::ManageSettings)?;
        let color = validate_theme_color(color)?;

        let updated = self
            .repo
            .update_theme_color(&color)
            .await
            .map_err(PlanError::Database)?;
        let fallback = SiteSettings {
            theme_color: color.clone(),
            ..self.current()
        };
        let next = self.after_write(updated, fallback).await?;

        info!("Theme color set to {}", color);
        self.current.send_replace(next);
        Ok(color)
    }

    /// Settings to publish after a single-column update.
    ///
    /// An untouched row is created from `fallback`. An updated row is read
    /// back from storage, falling back to `fallback` if that fails.
    async fn after_write(&self, updated: u64, fallback: SiteSettings) -> PlanResult<SiteSettings> {
        if updated == 0 {
            self.repo.insert(&fallback).await.map_err(PlanError::Database)?;
            return Ok(fallback);
        }

        match self.repo.fetch().await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Ok(fallback),
            Err(e) => {
                warn!("Failed to re-read site settings after update: {}", e);
                Ok(fallback)
            }
        }
    }
}
