//! CLI output formatting utilities.

use crate::catalog::CourseRecord;
use crate::session::{SearchOutcome, SearchStatus};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a one-line catalog entry.
    pub fn course_line(course: &CourseRecord) {
        println!(
            "  {} {} ({}, {})",
            style("*").cyan(),
            style(&course.title).bold(),
            course.level,
            course.duration
        );
    }

    /// Print a course card: title, level, duration, link and overview.
    pub fn course_card(course: &CourseRecord) {
        println!("\n{} {}", style(">>").green(), style(&course.title).bold());
        println!(
            "   {} {}   {} {}",
            style("Level:").dim(),
            course.level,
            style("Duration:").dim(),
            course.duration
        );
        println!("   {}", content_preview(&course.brief, 200));
        println!("   {} {}", style("Enroll:").dim(), style(&course.url).underlined());
    }

    /// Print a full search outcome.
    pub fn search_outcome(outcome: &SearchOutcome) {
        match outcome.status {
            SearchStatus::NotReady | SearchStatus::NoMatches => {
                Output::warning(&outcome.analysis);
                Output::info("Try different search terms.");
                return;
            }
            SearchStatus::Degraded => Output::warning(&outcome.analysis),
            SearchStatus::Complete => {
                Output::header("Course Analysis");
                println!("\n{}", outcome.analysis);
            }
        }

        Output::header("Recommended Courses");
        for course in &outcome.matched {
            Output::course_card(course);
        }
        println!();
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis, on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short\ntext", 20), "short text");
        assert_eq!(content_preview("abcdef", 3), "abc...");
        assert_eq!(content_preview("ééééé", 2), "éé...");
    }
}
