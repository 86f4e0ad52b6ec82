//! Configuration module for Coursescout.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnalysisPrompts, Prompts};
pub use settings::{
    CatalogSettings, EmbeddingSettings, GeneralSettings, GenerationSettings, PromptSettings,
    ResolutionStrategy, SearchSettings, Settings,
};
