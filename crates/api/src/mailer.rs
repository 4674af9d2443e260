//! Outbound mail through an HTTP mail relay.
//!
//! The relay accepts `POST` requests with a JSON body
//! (`from_alias`, `to_addr`, `subject`, `html_body`) and a bearer key.

use std::{env, time::Duration};

use async_trait::async_trait;
use eyre::{Result, WrapErr, eyre};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};
use weekplan_core::ports::Mailer;

pub const DEFAULT_FROM_ALIAS: &str = "default";

/// Relay settings. Mail is switched off unless both `MAIL_API_URL` and
/// `MAIL_API_KEY` are set.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from_alias: String,
    pub request_timeout: Duration,
}

impl MailConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Some(Self {
            api_url: get("MAIL_API_URL")?,
            api_key: get("MAIL_API_KEY")?,
            from_alias: get("MAIL_FROM_ALIAS").unwrap_or_else(|| DEFAULT_FROM_ALIAS.to_string()),
            request_timeout: Duration::from_secs(15),
        })
    }
}

#[derive(Serialize)]
struct MailPayload<'a> {
    from_alias: &'a str,
    to_addr: &'a str,
    subject: &'a str,
    html_body: &'a str,
}

pub struct HttpMailer {
    client: Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<()> {
        let payload = MailPayload {
            from_alias: &self.config.from_alias,
            to_addr: recipient,
            subject,
            html_body,
        };

        let res = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Mail relay connection error: {}", e);
                eyre!("Mail relay connection error: {}", e)
            })?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            error!("Mail relay failed. Status: {}, Body: {}", status, text);
            return Err(eyre!("Mail relay failed: {} - {}", status, text));
        }

        debug!("Mail '{}' handed to relay for {}", subject, recipient);
        Ok(())
    }
}
