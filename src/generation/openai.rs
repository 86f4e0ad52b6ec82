//! OpenAI chat completions backend.

use super::{GenerationConfig, Generator, Prompt};
use crate::config::GenerationSettings;
use crate::error::{CoursescoutError, Result};
use crate::openai::create_client_with_timeout;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Chat-completion based generator.
pub struct OpenAIGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIGenerator {
    /// Create a generator from the `[generation]` configuration section.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(Duration::from_secs(settings.timeout_secs))?,
            model: settings.model.clone(),
        })
    }

    fn build_messages(prompt: &Prompt) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);

        if let Some(system) = &prompt.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.clone())
                    .build()
                    .map_err(|e| CoursescoutError::GenerationService(e.to_string()))?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.user.clone())
                .build()
                .map_err(|e| CoursescoutError::GenerationService(e.to_string()))?
                .into(),
        );

        Ok(messages)
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt, config), fields(model = %self.model, prompt_len = prompt.user.len()))]
    async fn generate(&self, prompt: &Prompt, config: &GenerationConfig) -> Result<String> {
        // The chat completions API has no top-k sampling parameter.
        debug!("top_k={} not supported by chat completions; omitted", config.top_k);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::build_messages(prompt)?)
            .temperature(config.temperature)
            .top_p(config.top_p)
            .max_completion_tokens(config.max_output_tokens)
            .build()
            .map_err(|e| CoursescoutError::GenerationService(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            CoursescoutError::GenerationService(format!("Failed to generate response: {}", e))
        })?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CoursescoutError::GenerationService("Empty response from LLM".to_string()))?;

        debug!("Generated {} characters", text.len());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_system_when_present() {
        let prompt = Prompt {
            system: Some("advisor".to_string()),
            user: "question".to_string(),
        };
        assert_eq!(OpenAIGenerator::build_messages(&prompt).unwrap().len(), 2);

        let prompt = Prompt {
            system: None,
            user: "question".to_string(),
        };
        assert_eq!(OpenAIGenerator::build_messages(&prompt).unwrap().len(), 1);
    }

    #[test]
    fn test_generator_model_from_settings() {
        let generator = OpenAIGenerator::from_settings(&GenerationSettings::default()).unwrap();
        assert_eq!(generator.model(), "gpt-4o-mini");
    }
}
