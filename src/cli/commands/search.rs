//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::session::SearchSession;
use anyhow::Result;

/// Check requirements, create a session and build its index from the catalog.
pub(crate) async fn start_session(settings: Settings) -> Result<SearchSession> {
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'coursescout doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let session = SearchSession::initialize(settings)?;

    let spinner = Output::spinner("Building search index... This may take a moment.");
    let built = session.load_catalog().await;
    spinner.finish_and_clear();

    match built {
        Ok(summary) => {
            Output::success(&format!(
                "Indexed {} courses with {}",
                summary.courses_indexed, summary.embedding_model
            ));
            for (short, long) in &summary.overlapping_titles {
                Output::warning(&format!("'{}' is part of the title '{}'", short, long));
            }
            Ok(session)
        }
        Err(e) => {
            Output::error(&format!("Failed to build search index: {}", e));
            Err(e.into())
        }
    }
}

/// Run the search command.
pub async fn run_search(query: &str, k: Option<usize>, settings: Settings) -> Result<()> {
    let k = k.unwrap_or(settings.search.default_k);
    let session = start_session(settings).await?;

    let spinner = Output::spinner("Analyzing courses for you...");
    let result = session.search(query, k).await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            Output::search_outcome(&outcome);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            Err(e.into())
        }
    }
}
