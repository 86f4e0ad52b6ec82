//! List command implementation.

use crate::catalog::load_csv;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the list command.
pub fn run_list(settings: &Settings) -> Result<()> {
    preflight::check(Operation::List, settings)?;

    match load_csv(&settings.catalog_path()) {
        Ok(courses) => {
            if courses.is_empty() {
                Output::info("The catalog has no courses.");
            } else {
                Output::header(&format!("Courses ({})", courses.len()));
                println!();

                for course in &courses {
                    Output::course_line(course);
                }

                let with_curriculum = courses.iter().filter(|c| c.curriculum.is_available()).count();
                println!();
                Output::kv("Total courses", &courses.len().to_string());
                Output::kv("With curriculum", &with_curriculum.to_string());
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to load catalog: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
