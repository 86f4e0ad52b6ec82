//! Error types for Coursescout.

use thiserror::Error;

/// Library-level error type for Coursescout operations.
#[derive(Error, Debug)]
pub enum CoursescoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load course catalog: {0}")]
    DataLoad(String),

    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    #[error("Generation service error: {0}")]
    GenerationService(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoursescoutError {
    /// Whether the caller may reasonably retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoursescoutError::EmbeddingService(_)
                | CoursescoutError::GenerationService(_)
                | CoursescoutError::Http(_)
        )
    }
}

/// Result type alias for Coursescout operations.
pub type Result<T> = std::result::Result<T, CoursescoutError>;
