//! Coursescout CLI entry point.

use anyhow::Result;
use clap::Parser;
use coursescout::cli::{commands, Cli, Commands};
use coursescout::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config_path();
    let mut settings = Settings::load_from(Some(&config_path))?;

    if let Some(catalog) = &cli.catalog {
        settings.catalog.path = catalog.clone();
    }

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("coursescout={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match &cli.command {
        Commands::Search { query, k } => {
            commands::run_search(query, *k, settings).await?;
        }

        Commands::Interactive { k } => {
            commands::run_interactive(*k, settings).await?;
        }

        Commands::List => {
            commands::run_list(&settings)?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, &config_path)?;
        }
    }

    Ok(())
}
