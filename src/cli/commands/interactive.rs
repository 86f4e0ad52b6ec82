//! Interactive search loop over a single index build.

use super::search::start_session;
use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive command.
pub async fn run_interactive(k: Option<usize>, settings: Settings) -> anyhow::Result<()> {
    let k = k.unwrap_or(settings.search.default_k);
    let session = start_session(settings).await?;

    println!("\n{}", style("Coursescout").bold().cyan());
    println!(
        "{}\n",
        style("What would you like to learn? Type 'exit' to quit, 'reload' to rebuild the index.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("Search:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("reload") {
            let spinner = Output::spinner("Rebuilding search index...");
            let rebuilt = session.load_catalog().await;
            spinner.finish_and_clear();
            match rebuilt {
                Ok(summary) => Output::success(&format!("Indexed {} courses", summary.courses_indexed)),
                Err(e) => Output::error(&format!("Rebuild failed, keeping previous index: {}", e)),
            }
            continue;
        }

        let spinner = Output::spinner("Analyzing courses for you...");
        let result = session.search(input, k).await;
        spinner.finish_and_clear();

        match result {
            Ok(outcome) => Output::search_outcome(&outcome),
            Err(e) => Output::error(&format!("Search failed: {}", e)),
        }
    }

    Ok(())
}
