//! Pre-flight checks before expensive operations.
//!
//! Validates that the API key and catalog are available before starting
//! operations that would otherwise fail midway through an index build.

use crate::config::Settings;
use crate::error::{CoursescoutError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Searching embeds the catalog and calls the model: API key and catalog.
    Search,
    /// Listing only reads the catalog.
    List,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Search => {
            check_api_key()?;
            check_catalog(settings)?;
        }
        Operation::List => {
            check_catalog(settings)?;
        }
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(CoursescoutError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(CoursescoutError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that the catalog file exists.
fn check_catalog(settings: &Settings) -> Result<()> {
    let path = settings.catalog_path();
    if path.is_file() {
        Ok(())
    } else {
        Err(CoursescoutError::DataLoad(format!(
            "catalog file not found: {} (set catalog.path or pass --catalog)",
            path.display()
        )))
    }
}
