//! Config command: inspect or edit the settings file in effect.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the config command against the file at `config_path`.
pub fn run_config(action: &ConfigAction, settings: &Settings, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            Output::header("Resolved settings");
            for (key, value) in resolved_summary(settings, config_path) {
                Output::kv(key, &value);
            }
            println!();

            let toml_str =
                toml::to_string_pretty(settings).context("Failed to serialize config")?;
            println!("{}", toml_str);
        }

        ConfigAction::Edit => {
            if write_default_if_missing(settings, config_path)? {
                Output::info(&format!("Created config at {}", config_path.display()));
            }

            let editor = editor_command(std::env::var("EDITOR").ok());
            Output::info(&format!("Opening {} in {}...", config_path.display(), editor));

            match std::process::Command::new(&editor).arg(config_path).status() {
                Ok(status) if status.success() => match Settings::load_from(Some(&config_path.to_path_buf())) {
                    Ok(_) => Output::success("Config saved and parses cleanly."),
                    Err(e) => Output::error(&format!("Config no longer parses: {}", e)),
                },
                Ok(_) => Output::warning("Editor exited with non-zero status."),
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {}", config_path.display()));
                }
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Values that are derived from the settings rather than written in them.
fn resolved_summary(settings: &Settings, config_path: &Path) -> Vec<(&'static str, String)> {
    let catalog = settings.catalog_path();
    let catalog_state = if catalog.exists() { "found" } else { "missing" };

    vec![
        (
            "Config file",
            format!(
                "{}{}",
                config_path.display(),
                if config_path.exists() { "" } else { " (defaults)" }
            ),
        ),
        ("Catalog", format!("{} ({})", catalog.display(), catalog_state)),
        ("Resolution", settings.search.resolution.to_string()),
        ("Default k", settings.search.default_k.to_string()),
        ("Embedding model", settings.embedding.model.clone()),
        ("Generation model", settings.generation.model.clone()),
    ]
}

/// Save `settings` to `path` unless a file is already there.
fn write_default_if_missing(settings: &Settings, path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    settings
        .save_to(&path.to_path_buf())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

fn editor_command(from_env: Option<String>) -> String {
    from_env
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}
