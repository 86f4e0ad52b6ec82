//! Grounded analysis generation.

use super::context::format_courses_for_prompt;
use crate::config::Prompts;
use crate::error::Result;
use crate::generation::{GenerationConfig, Generator, Prompt};
use crate::resolver::ResolvedCourse;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Shown instead of an analysis when retrieval produced nothing to ground it.
pub const NO_MATCHES_MESSAGE: &str = "No matching courses found for your query.";

/// Outcome of an analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// Model output, returned as-is.
    Generated(String),
    /// Nothing was resolved; the model was not called.
    NoMatches,
}

impl Analysis {
    pub fn text(&self) -> &str {
        match self {
            Analysis::Generated(text) => text,
            Analysis::NoMatches => NO_MATCHES_MESSAGE,
        }
    }
}

/// Builds the advisor prompt from retrieved courses and calls the model once.
pub struct AnalysisGenerator {
    generator: Arc<dyn Generator>,
    prompts: Prompts,
    config: GenerationConfig,
}

impl AnalysisGenerator {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            prompts: Prompts::default(),
            config: GenerationConfig::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set sampling parameters.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Render the prompt for `query` over `courses`.
    pub fn build_prompt(&self, query: &str, courses: &[ResolvedCourse]) -> Prompt {
        let mut vars = HashMap::new();
        vars.insert("query".to_string(), query.to_string());
        vars.insert("courses".to_string(), format_courses_for_prompt(courses));

        let system = Some(self.prompts.analysis.system.clone()).filter(|s| !s.trim().is_empty());

        Prompt {
            system,
            user: self.prompts.render_with_custom(&self.prompts.analysis.user, &vars),
        }
    }

    /// Analyze the resolved courses for `query`.
    ///
    /// Returns [`Analysis::NoMatches`] without calling the model when
    /// `courses` is empty.
    #[instrument(skip(self, courses), fields(query = %query, courses = courses.len()))]
    pub async fn analyze(&self, query: &str, courses: &[ResolvedCourse]) -> Result<Analysis> {
        if courses.is_empty() {
            info!("No resolved courses; skipping generation");
            return Ok(Analysis::NoMatches);
        }

        let prompt = self.build_prompt(query, courses);
        debug!("Prompt is {} characters", prompt.user.len());

        let text = self.generator.generate(&prompt, &self.config).await?;
        Ok(Analysis::Generated(text))
    }
}
