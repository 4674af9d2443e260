//! Gemini generative-language client behind the core `LanguageModel` port.

pub mod client;
pub mod config;

pub use client::GeminiClient;
pub use config::AssistantConfig;
