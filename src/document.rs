//! Flattens a course record into the text block that gets embedded.
//!
//! The template is fixed. The title is written verbatim on the first line so
//! that title-based resolution can find it again by substring search.

use crate::catalog::{CourseRecord, NO_AUDIENCE, NO_CURRICULUM};

/// Render a course as a single embeddable document.
pub fn format_course(record: &CourseRecord) -> String {
    format!(
        "TITLE: {}\n\
         BRIEF: {}\n\
         LEVEL: {}\n\
         DURATION: {}\n\
         DESCRIPTION: {}\n\
         URL: {}\n\
         CURRICULUM: {}\n\
         TARGET AUDIENCE AND BENEFITS: {}",
        record.title,
        record.brief,
        record.level,
        record.duration,
        record.description,
        record.url,
        record.curriculum.render(NO_CURRICULUM),
        record.audience_and_takeaways.render(NO_AUDIENCE),
    )
}
