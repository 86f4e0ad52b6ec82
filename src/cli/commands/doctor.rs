//! Doctor command - verify configuration and required files.

use crate::catalog::{load_csv, overlapping_titles};
use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Coursescout Doctor");
    println!();
    println!("Checking configuration and catalog...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key(std::env::var("OPENAI_API_KEY").ok().as_deref());
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Catalog").bold());
    let catalog_checks = check_catalog(settings);
    for check in &catalog_checks {
        check.print();
    }
    checks.extend(catalog_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before searching.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Coursescout is ready to use.");
    }

    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key(key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if key.starts_with("sk-") && key.chars().count() > 20 => {
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", mask_key(key)))
        }
        Some("") => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Some(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        None => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// First seven and last four characters of `key`.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let head: String = chars.iter().take(7).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Check that the catalog exists, parses, and has resolvable titles.
fn check_catalog(settings: &Settings) -> Vec<CheckResult> {
    let path = settings.catalog_path();
    if !path.exists() {
        return vec![CheckResult::error(
            "Catalog file",
            &format!("{} not found", path.display()),
            "Set catalog.path in the config file or pass --catalog",
        )];
    }

    let mut results = vec![CheckResult::ok("Catalog file", &path.display().to_string())];

    match load_csv(&path) {
        Ok(courses) if courses.is_empty() => results.push(CheckResult::warning(
            "Courses",
            "catalog is empty",
            "Re-run the course crawler",
        )),
        Ok(courses) => {
            results.push(CheckResult::ok("Courses", &format!("{} loaded", courses.len())));

            let overlapping = overlapping_titles(&courses);
            if overlapping.is_empty() {
                results.push(CheckResult::ok("Titles", "no title contains another"));
            } else {
                let (short, long) = &overlapping[0];
                results.push(CheckResult::warning(
                    "Titles",
                    &format!(
                        "{} overlapping pair(s), e.g. '{}' in '{}'",
                        overlapping.len(),
                        short,
                        long
                    ),
                    "Keep search.resolution = \"metadata\" to avoid mismatched results",
                ));
            }
        }
        Err(e) => results.push(CheckResult::error(
            "Courses",
            &e.to_string(),
            "Check the CSV headers: Title, Link, Brief, Level, Duration, Description, Curriculum, What should enroll & takeaway",
        )),
    }

    results
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: coursescout config edit",
        )
    }
}
