use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::{
    access::{self, Action, Caller},
    errors::{PlanError, PlanResult},
    models::profile::{AuthStateChange, Identity, PasswordReset, Role, SessionGrant, UserProfile},
    ports::{IdentityProvider, Mailer, ProfileRepository},
    services::settings::SiteConfigGateway,
};

pub const DEFAULT_LOGIN_DOMAIN: &str = "example.com";
const MIN_PASSWORD_LEN: usize = 6;
const RESET_EMAIL_SUBJECT: &str = "Đặt lại mật khẩu";

/// Sign-in, sign-up and profile lookups on top of the identity provider.
#[derive(Clone)]
pub struct ProfileGateway {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
    settings: SiteConfigGateway,
    login_domain: String,
    auth_events: broadcast::Sender<AuthStateChange>,
    mailer: Option<Arc<dyn Mailer>>,
    /// Page that accepts the `reset_token` query parameter.
    reset_url: String,
}

impl ProfileGateway {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileRepository>,
        settings: SiteConfigGateway,
        login_domain: impl Into<String>,
    ) -> Self {
        let (auth_events, _) = broadcast::channel(32);
        Self {
            identity,
            profiles,
            settings,
            login_domain: login_domain.into().to_lowercase(),
            auth_events,
            mailer: None,
            reset_url: String::new(),
        }
    }

    /// Enables password reset mails linking to `reset_url`.
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>, reset_url: impl Into<String>) -> Self {
        self.mailer = Some(mailer);
        self.reset_url = reset_url.into();
        self
    }

    /// Bare user names sign in as `<name>@<login domain>`. Emails are
    /// case-insensitive and always handled in lower case.
    pub fn normalize_identifier(&self, identifier: &str) -> String {
        let identifier = identifier.trim().to_lowercase();
        if identifier.contains('@') {
            identifier
        } else {
            format!("{}@{}", identifier, self.login_domain)
        }
    }

    pub async fn login(&self, identifier: &str, secret: &str, remember: bool) -> PlanResult<SessionGrant> {
        let email = self.normalize_identifier(identifier);
        let grant = self
            .identity
            .sign_in(&email, secret, remember)
            .await
            .map_err(PlanError::Database)?
            .ok_or_else(|| PlanError::Authentication("Invalid login credentials".to_string()))?;

        self.ensure_profile_exists(&grant.identity, Role::Admin).await?;
        info!("User {} signed in", grant.identity.id);
        self.notify(grant.identity.id, true);
        Ok(grant)
    }

    /// Self-service registration. New accounts are always reporters.
    pub async fn sign_up(&self, identifier: &str, secret: &str, display_name: &str) -> PlanResult<SessionGrant> {
        if !self.settings.get_settings().await.registration_enabled {
            return Err(PlanError::Authorization("Registration is disabled".to_string()));
        }
        check_password(secret)?;

        let email = self.normalize_identifier(identifier);
        let grant = self
            .identity
            .sign_up(&email, secret, display_name.trim())
            .await
            .map_err(PlanError::Database)?
            .ok_or_else(|| PlanError::Validation(format!("Account {} already exists", email)))?;

        self.ensure_profile_exists(&grant.identity, Role::Reporter).await?;
        info!("User {} registered", grant.identity.id);
        self.notify(grant.identity.id, true);
        Ok(grant)
    }

    /// Mails a reset link to the account. Unknown accounts get the same `Ok`.
    pub async fn request_password_reset(&self, identifier: &str) -> PlanResult<()> {
        let Some(mailer) = &self.mailer else {
            return Err(PlanError::Upstream("Password reset mail is not configured".to_string()));
        };

        let email = self.normalize_identifier(identifier);
        let Some(reset) = self
            .identity
            .issue_password_reset(&email)
            .await
            .map_err(PlanError::Database)?
        else {
            info!("Password reset requested for unknown account {}", email);
            return Ok(());
        };

        let body = reset_email_body(&self.reset_link(&reset), &reset);
        mailer
            .send(&reset.email, RESET_EMAIL_SUBJECT, &body)
            .await
            .map_err(|e| {
                error!("Failed to send password reset mail to {}: {}", reset.email, e);
                PlanError::Upstream("Could not send the password reset mail".to_string())
            })?;

        info!("Password reset mail sent to {}", reset.email);
        Ok(())
    }

    /// Redeems a reset token. All sessions of the account end.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> PlanResult<()> {
        check_password(new_password)?;
        let token = token.trim();
        if token.is_empty() {
            return Err(PlanError::Validation("Reset token is required".to_string()));
        }

        let identity = self
            .identity
            .redeem_password_reset(token, new_password)
            .await
            .map_err(PlanError::Database)?
            .ok_or_else(|| PlanError::Authentication("Reset link is invalid or has expired".to_string()))?;

        info!("Password reset for user {}", identity.id);
        self.notify(identity.id, false);
        Ok(())
    }

    fn reset_link(&self, reset: &PasswordReset) -> String {
        let separator = if self.reset_url.contains('?') { '&' } else { '?' };
        format!("{}{}reset_token={}", self.reset_url, separator, reset.token)
    }

    /// Creates the profile row on first sight of an identity.
    pub async fn ensure_profile_exists(&self, identity: &Identity, default_role: Role) -> PlanResult<UserProfile> {
        if let Some(profile) = self.profiles.find(identity.id).await.map_err(PlanError::Database)? {
            return Ok(profile);
        }

        let profile = UserProfile {
            id: identity.id,
            email: identity.email.clone(),
            full_name: identity.display_name(),
            role: default_role,
            created_at: Utc::now(),
            email_confirmed: identity.email_confirmed,
        };
        self.profiles.insert(&profile).await.map_err(PlanError::Database)?;
        info!("Created {} profile for {}", default_role.as_str(), profile.email);
        Ok(profile)
    }

    pub async fn current_profile(&self, token: Option<&str>) -> Option<UserProfile> {
        let identity = self.resolve(token?).await?;
        match self.profiles.find(identity.id).await {
            Ok(Some(mut profile)) => {
                profile.email_confirmed = identity.email_confirmed;
                Some(profile)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to load profile {}: {}", identity.id, e);
                None
            }
        }
    }

    /// Access level of whoever holds `token`.
    pub async fn caller(&self, token: Option<&str>) -> Caller {
        match self.current_profile(token).await {
            Some(profile) => Caller::Member(profile.role),
            None => Caller::Anonymous,
        }
    }

    pub async fn all_profiles(&self, caller: Caller) -> PlanResult<Vec<UserProfile>> {
        access::ensure(caller, Action::ViewUsers)?;
        match self.profiles.list_all().await {
            Ok(profiles) => Ok(profiles),
            Err(e) => {
                error!("Error fetching profiles: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Ends the session. Provider failures are logged, never returned.
    pub async fn logout(&self, token: &str) {
        let identity = self.resolve(token).await;
        if let Err(e) = self.identity.sign_out(token).await {
            error!("Sign-out failed: {}", e);
        }
        if let Some(identity) = identity {
            info!("User {} signed out", identity.id);
            self.notify(identity.id, false);
        }
    }

    pub async fn is_authenticated(&self, token: Option<&str>) -> bool {
        match token {
            Some(token) => self.resolve(token).await.is_some(),
            None => false,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthStateChange> {
        self.auth_events.subscribe()
    }

    async fn resolve(&self, token: &str) -> Option<Identity> {
        match self.identity.resolve(token).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Session lookup failed: {}", e);
                None
            }
        }
    }

    fn notify(&self, user_id: uuid::Uuid, authenticated: bool) {
        // No subscribers is fine.
        let _ = self.auth_events.send(AuthStateChange { user_id, authenticated });
    }
}

fn check_password(secret: &str) -> PlanResult<()> {
    if secret.chars().count() < MIN_PASSWORD_LEN {
        return Err(PlanError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn reset_email_body(link: &str, reset: &PasswordReset) -> String {
    format!(
        "<p>Xin chào,</p>\
         <p>Chúng tôi nhận được yêu cầu đặt lại mật khẩu cho tài khoản {}.</p>\
         <p><a href=\"{}\">Đặt lại mật khẩu</a></p>\
         <p>Liên kết có hiệu lực đến {} (UTC). Nếu bạn không yêu cầu, hãy bỏ qua email này.</p>",
        reset.email,
        link,
        reset.expires_at.format("%H:%M %d/%m/%Y")
    )
}
