use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::info;
use weekplan_api::{
    AccountOptions, ApiState, Backends,
    config::ApiConfig,
    mailer::{HttpMailer, MailConfig},
};
use weekplan_assistant::{AssistantConfig, GeminiClient};
use weekplan_core::ports::{LanguageModel, Mailer};
use weekplan_db::{PgStore, create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    weekplan_api::init_tracing(config.log_level)?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Optional assistant
    let language_model = match AssistantConfig::from_env() {
        Some(assistant_config) => {
            info!("Assistant enabled with model {}", assistant_config.model);
            Some(Arc::new(GeminiClient::new(assistant_config)?) as Arc<dyn LanguageModel>)
        }
        None => None,
    };

    // Optional mail relay for password resets
    let mailer = match MailConfig::from_env() {
        Some(mail_config) => Some(Arc::new(HttpMailer::new(mail_config)?) as Arc<dyn Mailer>),
        None => {
            info!("MAIL_API_URL or MAIL_API_KEY not set, password reset mails disabled");
            None
        }
    };

    let store = Arc::new(PgStore::new(db_pool));
    let accounts = AccountOptions::from(&config);
    let state = ApiState::new(
        Backends {
            events: store.clone(),
            identity: store.clone(),
            profiles: store.clone(),
            settings: store.clone(),
            views: store,
            language_model,
            mailer,
        },
        accounts,
    );

    // Start API server
    weekplan_api::start_server(config, Arc::new(state)).await?;

    Ok(())
}
