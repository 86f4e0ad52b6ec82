//! Context formatting for analysis prompts and terminal display.

use crate::resolver::ResolvedCourse;

/// Format resolved courses for inclusion in a prompt.
///
/// The full chunk text goes in, not just the title, so the model only has
/// the retrieved material to work from.
pub fn format_courses_for_prompt(courses: &[ResolvedCourse]) -> String {
    courses
        .iter()
        .enumerate()
        .map(|(i, course)| format!("---\n[{}] {}\n{}\n---", i + 1, course.record.title, course.chunk))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One line per course: title, level and score.
pub fn format_courses_for_display(courses: &[ResolvedCourse]) -> String {
    courses
        .iter()
        .map(|course| {
            format!(
                "{} [{}] (score: {:.2})\n  Link: {}",
                course.record.title, course.record.level, course.score, course.record.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
