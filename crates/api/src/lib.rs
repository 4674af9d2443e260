//! # Weekplan API
//!
//! HTTP server for the weekly work schedule: the public agenda, event
//! management, reports, accounts, site settings and the AI assistant.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Turn requests into calls on the core services
//! - **Middleware**: Session extraction and error mapping
//! - **Refresh**: The agenda snapshot and its background reload
//! - **Config**: Environment configuration

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Mail relay client for password reset mails
pub mod mailer;
/// Session extraction and error handling
pub mod middleware;
/// Agenda snapshot kept in memory and reloaded in the background
pub mod refresh;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::Result;
use tokio::{net::TcpListener, sync::broadcast::error::RecvError, task::JoinHandle};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;
use weekplan_core::{
    ports::{
        EventRepository, IdentityProvider, LanguageModel, Mailer, ProfileRepository, SettingsRepository, ViewCounter,
    },
    services::{Assistant, EventGateway, ProfileGateway, SiteConfigGateway, ViewCountGateway},
};

use crate::refresh::AgendaSnapshot;

/// Storage and model backends the server runs on.
pub struct Backends {
    pub events: Arc<dyn EventRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub views: Arc<dyn ViewCounter>,
    /// `None` switches the assistant endpoints off.
    pub language_model: Option<Arc<dyn LanguageModel>>,
    /// `None` switches password reset mails off.
    pub mailer: Option<Arc<dyn Mailer>>,
}

/// Account options taken from [`config::ApiConfig`].
#[derive(Debug, Clone)]
pub struct AccountOptions {
    pub login_domain: String,
    pub password_reset_url: String,
}

impl From<&config::ApiConfig> for AccountOptions {
    fn from(config: &config::ApiConfig) -> Self {
        Self {
            login_domain: config.login_domain.clone(),
            password_reset_url: config.password_reset_url.clone(),
        }
    }
}

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub events: EventGateway,
    pub profiles: ProfileGateway,
    pub settings: SiteConfigGateway,
    pub views: ViewCountGateway,
    pub assistant: Option<Assistant>,
    pub agenda: Arc<AgendaSnapshot>,
}

impl ApiState {
    pub fn new(backends: Backends, accounts: AccountOptions) -> Self {
        let settings = SiteConfigGateway::new(backends.settings);
        let mut profiles = ProfileGateway::new(
            backends.identity,
            backends.profiles,
            settings.clone(),
            accounts.login_domain,
        );
        if let Some(mailer) = backends.mailer {
            profiles = profiles.with_mailer(mailer, accounts.password_reset_url);
        }
        Self {
            events: EventGateway::new(backends.events),
            profiles,
            settings,
            views: ViewCountGateway::new(backends.views),
            assistant: backends.language_model.map(Assistant::new),
            agenda: Arc::new(AgendaSnapshot::new()),
        }
    }

    /// Reloads the agenda snapshot after an edit.
    pub async fn refresh_agenda(&self) {
        self.agenda.refresh(&self.events).await;
    }
}

/// Installs the global `tracing` subscriber at the given level.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the application router with all routes
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Agenda, events and reports
        .merge(routes::schedule::routes())
        // Sign-in, sessions and profiles
        .merge(routes::account::routes())
        // Site settings and view counter
        .merge(routes::site::routes())
        // Assistant endpoints
        .merge(routes::assistant::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Logs every sign-in and sign-out broadcast by the profile gateway.
pub fn spawn_auth_logger(profiles: &ProfileGateway) -> JoinHandle<()> {
    let mut changes = profiles.subscribe();
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) if change.authenticated => info!("Session opened for user {}", change.user_id),
                Ok(change) => info!("Session closed for user {}", change.user_id),
                Err(RecvError::Lagged(skipped)) => warn!("Auth log skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Starts the API server
///
/// Loads the settings and the agenda once, starts the background tasks and
/// serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let settings = state.settings.get_settings().await;
    info!(
        "Registration {}, theme {}",
        if settings.registration_enabled { "enabled" } else { "disabled" },
        settings.theme_color
    );
    if state.assistant.is_none() {
        info!("GEMINI_API_KEY not set, assistant endpoints disabled");
    }

    let _refresh = refresh::spawn_refresh_loop(state.agenda.clone(), state.events.clone(), config.refresh_interval);
    let _auth_log = spawn_auth_logger(&state.profiles);

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Request logging and timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .into_inner(),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
