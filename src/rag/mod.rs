//! RAG (Retrieval-Augmented Generation) for course recommendations.
//!
//! Turns resolved search hits into a single grounded prompt and returns the
//! model's analysis.

mod analysis;
pub mod context;

pub use analysis::{Analysis, AnalysisGenerator, NO_MATCHES_MESSAGE};
pub use context::{format_courses_for_display, format_courses_for_prompt};
