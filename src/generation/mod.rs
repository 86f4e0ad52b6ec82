//! Text generation for course analyses.

mod openai;

pub use openai::OpenAIGenerator;

use crate::config::GenerationSettings;
use crate::error::Result;
use async_trait::async_trait;

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::from(&GenerationSettings::default())
    }
}

impl From<&GenerationSettings> for GenerationConfig {
    fn from(settings: &GenerationSettings) -> Self {
        Self {
            temperature: settings.temperature,
            top_p: settings.top_p,
            top_k: settings.top_k,
            max_output_tokens: settings.max_output_tokens,
        }
    }
}

/// A prompt handed to the model: an optional system message and the user turn.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

/// Trait for generative model backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`. May fail transiently.
    async fn generate(&self, prompt: &Prompt, config: &GenerationConfig) -> Result<String>;

    /// Identifier of the underlying model.
    fn model(&self) -> &str;
}
