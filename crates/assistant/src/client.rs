use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, WrapErr, eyre};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use weekplan_core::ports::{GenerationRequest, LanguageModel};

use crate::config::AssistantConfig;

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

pub struct GeminiClient {
    client: Client,
    config: AssistantConfig,
}

impl GeminiClient {
    pub fn new(config: AssistantConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    async fn send_request_with_retry(&self, payload: &Value) -> Result<String> {
        let url = self.config.generate_url();
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            let res = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.config.api_key)
                .json(payload)
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: Value = response
                            .json()
                            .await
                            .wrap_err("Failed to parse Gemini response JSON")?;
                        return extract_text(&body);
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            error!("Gemini API failed after {} retries. Status: {}", retries, status);
                            let text = response.text().await.unwrap_or_default();
                            return Err(eyre!("AI provider error: {} - {}", status, text));
                        }
                        warn!("Gemini API transient error {}. Retrying in {}ms...", status, backoff);
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        error!("Gemini API terminal error {}: {}", status, text);
                        return Err(eyre!("AI request rejected: {} - {}", status, text));
                    }
                }
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("Gemini network error after {} retries: {:?}", retries, e);
                        return Err(eyre!("AI network error: {}", e));
                    }
                    warn!("Gemini network error. Retrying in {}ms... {:?}", backoff, e);
                }
            }

            sleep(Duration::from_millis(backoff)).await;
            retries += 1;
            backoff *= 2;
        }
    }
}

/// Request body for `models/{model}:generateContent`.
pub fn build_payload(request: &GenerationRequest) -> Value {
    let mut payload = json!({
        "contents": [{
            "parts": [{ "text": request.prompt }]
        }]
    });

    if let Some(instruction) = &request.system_instruction {
        payload["systemInstruction"] = json!({
            "parts": [{ "text": instruction }]
        });
    }
    if let Some(schema) = &request.response_schema {
        payload["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema
        });
    }
    payload
}

/// Text of the first candidate, without surrounding code fences.
pub fn extract_text(body: &Value) -> Result<String> {
    if let Some(first) = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
    {
        if let Some(reason) = first.get("finishReason").and_then(|s| s.as_str())
            && reason != "STOP"
        {
            warn!("AI generation stopped abnormally. Reason: {}", reason);
            if reason == "SAFETY" {
                return Err(eyre!("AI content generation blocked by safety filters"));
            }
        }

        if let Some(text) = first
            .pointer("/content/parts/0/text")
            .and_then(|t| t.as_str())
        {
            let cleaned = text
                .trim()
                .trim_start_matches("```json")
                .trim_start_matches("```")
                .trim_end_matches("```")
                .trim();
            return Ok(cleaned.to_string());
        }
    }

    error!("Unexpected response structure from Gemini: {:?}", body);
    Err(eyre!("AI response missing content"))
}

#[async_trait]
impl LanguageModel for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.config.model, prompt_len = request.prompt.len()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        info!("Sending generation request to Gemini...");
        let text = self.send_request_with_retry(&build_payload(request)).await?;
        info!("Received generated content.");
        Ok(text)
    }
}
