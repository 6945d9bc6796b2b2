//! Language model providers
//!
//! A prompt string goes in, generated text comes out. One call per
//! generation; no streaming and no retries.

pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{LlmConfig, LlmProvider};
use crate::errors::Result;

pub use ollama::OllamaGenerate;
pub use openai::OpenAiChat;

/// Prompt to text generator
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier sent to the provider
    fn model(&self) -> &str;
}

/// Build the configured backend
pub fn connect(config: &LlmConfig) -> Result<Arc<dyn LanguageModel>> {
    match config.provider {
        LlmProvider::OpenAi => Ok(Arc::new(OpenAiChat::from_config(config)?)),
        LlmProvider::Ollama => Ok(Arc::new(OllamaGenerate::from_config(config)?)),
    }
}
