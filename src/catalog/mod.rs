//! Course catalog model.
//!
//! A catalog is the ordered table of free courses produced by the crawler.
//! Each row becomes one immutable [`CourseRecord`]; the ordering is kept all
//! the way through indexing and resolution.

mod loader;

pub use loader::{load_csv, parse_catalog};

use crate::error::{CoursescoutError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

pub const NO_BRIEF: &str = "No brief available";
pub const NO_LEVEL: &str = "No level available";
pub const NO_DURATION: &str = "No duration available";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_CURRICULUM: &str = "No curriculum available";
pub const NO_AUDIENCE: &str = "No what should enroll & takeaway available";

/// A list-valued catalog column: either the items, or the crawler's
/// "not available" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ListField {
    Items(Vec<String>),
    #[default]
    Unavailable,
}

impl ListField {
    /// Parse a raw cell value.
    ///
    /// Accepts a JSON array, a Python-style list literal (`['a', "b's"]`),
    /// the crawler's `No ... available` sentinel, or a plain string which is
    /// taken as a single item.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || is_sentinel(raw) {
            return ListField::Unavailable;
        }

        if raw.starts_with('[') && raw.ends_with(']') {
            let items = serde_json::from_str::<Vec<String>>(raw)
                .unwrap_or_else(|_| parse_python_list(raw));
            return ListField::from(items);
        }

        ListField::Items(vec![raw.to_string()])
    }

    pub fn items(&self) -> &[String] {
        match self {
            ListField::Items(items) => items,
            ListField::Unavailable => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ListField::Items(_))
    }

    /// Render the items on one line, or `placeholder` when unavailable.
    pub fn render(&self, placeholder: &str) -> String {
        match self {
            ListField::Items(items) => items.join("; "),
            ListField::Unavailable => placeholder.to_string(),
        }
    }
}

impl From<Vec<String>> for ListField {
    fn from(items: Vec<String>) -> Self {
        let items: Vec<String> = items
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        if items.is_empty() {
            ListField::Unavailable
        } else {
            ListField::Items(items)
        }
    }
}

fn is_sentinel(raw: &str) -> bool {
    raw.starts_with("No ") && raw.ends_with(" available")
}

fn python_item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)""#).expect("valid list item regex")
    })
}

fn parse_python_list(raw: &str) -> Vec<String> {
    python_item_regex()
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().replace("\\'", "'").replace("\\\"", "\"").replace("\\\\", "\\"))
        .collect()
}

/// One free course, as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Course title. Unique within a catalog snapshot.
    pub title: String,
    pub brief: String,
    pub level: String,
    pub duration: String,
    pub description: String,
    /// Absolute enrolment URL.
    pub url: String,
    pub curriculum: ListField,
    pub audience_and_takeaways: ListField,
}

impl CourseRecord {
    /// Create a record with placeholder text for every optional field.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            brief: NO_BRIEF.to_string(),
            level: NO_LEVEL.to_string(),
            duration: NO_DURATION.to_string(),
            description: NO_DESCRIPTION.to_string(),
            url: url.into(),
            curriculum: ListField::Unavailable,
            audience_and_takeaways: ListField::Unavailable,
        }
    }

    pub fn with_brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = brief.into();
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_curriculum(mut self, curriculum: ListField) -> Self {
        self.curriculum = curriculum;
        self
    }

    pub fn with_audience(mut self, audience: ListField) -> Self {
        self.audience_and_takeaways = audience;
        self
    }

    /// Check the record's own invariants: a non-empty title and an absolute URL.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CoursescoutError::DataLoad("course has an empty title".to_string()));
        }

        let parsed = url::Url::parse(&self.url).map_err(|e| {
            CoursescoutError::DataLoad(format!(
                "course '{}' has an invalid URL '{}': {}",
                self.title, self.url, e
            ))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(CoursescoutError::DataLoad(format!(
                "course '{}' URL is not absolute: {}",
                self.title, self.url
            )));
        }

        Ok(())
    }
}

/// Reject catalogs where two records share a title.
///
/// Titles are the resolution key, so duplicates would make two courses
/// indistinguishable after retrieval.
pub fn ensure_unique_titles(records: &[CourseRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.title.as_str()) {
            return Err(CoursescoutError::DataLoad(format!(
                "duplicate course title: {}",
                record.title
            )));
        }
    }
    Ok(())
}

/// Pairs `(a, b)` where title `a` is contained in title `b`.
///
/// Title-based resolution can bind a chunk of `b` to `a` when `a` comes
/// first in the catalog.
pub fn overlapping_titles(records: &[CourseRecord]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for a in records {
        for b in records {
            if a.title != b.title && b.title.contains(&a.title) {
                pairs.push((a.title.clone(), b.title.clone()));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_field_parses_python_literal() {
        let field = ListField::parse(r#"['Introduction', "Let's build a model", 'Wrap-up']"#);
        assert_eq!(
            field.items(),
            &["Introduction", "Let's build a model", "Wrap-up"]
        );
    }

    #[test]
    fn test_list_field_parses_json_array() {
        let field = ListField::parse(r#"["Data analysts", "Students"]"#);
        assert_eq!(field.items(), &["Data analysts", "Students"]);
    }

    #[test]
    fn test_list_field_sentinels() {
        assert_eq!(ListField::parse(NO_CURRICULUM), ListField::Unavailable);
        assert_eq!(ListField::parse(NO_AUDIENCE), ListField::Unavailable);
        assert_eq!(ListField::parse("   "), ListField::Unavailable);
        assert_eq!(ListField::parse("[]"), ListField::Unavailable);
    }

    #[test]
    fn test_list_field_plain_string_is_single_item() {
        let field = ListField::parse("Just one lesson");
        assert_eq!(field.items(), &["Just one lesson"]);
        assert_eq!(field.render(NO_CURRICULUM), "Just one lesson");
        assert_eq!(ListField::Unavailable.render(NO_CURRICULUM), NO_CURRICULUM);
    }

    #[test]
    fn test_validate_requires_absolute_url() {
        let ok = CourseRecord::new("Intro to SQL", "https://courses.example.com/sql");
        assert!(ok.validate().is_ok());

        let relative = CourseRecord::new("Intro to SQL", "/courses/sql");
        assert!(matches!(relative.validate(), Err(CoursescoutError::DataLoad(_))));

        let untitled = CourseRecord::new("  ", "https://courses.example.com/x");
        assert!(untitled.validate().is_err());
    }

    #[test]
    fn test_duplicate_titles_rejected() {
        let records = vec![
            CourseRecord::new("Git for Beginners", "https://e.com/a"),
            CourseRecord::new("Git for Beginners", "https://e.com/b"),
        ];
        assert!(ensure_unique_titles(&records).is_err());
        assert!(ensure_unique_titles(&records[..1]).is_ok());
    }

    #[test]
    fn test_overlapping_titles_detected() {
        let records = vec![
            CourseRecord::new("Python", "https://e.com/py"),
            CourseRecord::new("Python for Data Science", "https://e.com/pyds"),
            CourseRecord::new("Intro to SQL", "https://e.com/sql"),
        ];
        assert_eq!(
            overlapping_titles(&records),
            vec![("Python".to_string(), "Python for Data Science".to_string())]
        );
    }

    #[test]
    fn test_list_field_json_shape() {
        let json = serde_json::to_string(&ListField::parse("['a', 'b']")).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        assert_eq!(serde_json::to_string(&ListField::Unavailable).unwrap(), "null");
    }
}
