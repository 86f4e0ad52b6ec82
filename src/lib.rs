//! Coursescout - semantic search over free online courses
//!
//! Builds a vector index over a course catalog, retrieves the courses closest
//! to a natural-language query, and asks a language model for an analysis
//! grounded only in those courses.
//!
//! # Architecture
//!
//! - `catalog` - Course records and CSV catalog loading
//! - `document` - Flattening a record into embeddable text
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory vector index and similarity search
//! - `resolver` - Mapping retrieved chunks back to course records
//! - `generation` - Generative model backends
//! - `rag` - Grounded analysis prompts
//! - `session` - Index lifecycle and the search entry point
//! - `config` - Configuration management
//!
//! # Example
//!
//! ```rust,no_run
//! use coursescout::config::Settings;
//! use coursescout::session::SearchSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let session = SearchSession::initialize(settings)?;
//!     session.load_catalog().await?;
//!
//!     let outcome = session.search("machine learning for beginners", 3).await?;
//!     println!("{}", outcome.analysis);
//!     for course in &outcome.matched {
//!         println!("{} - {}", course.title, course.url);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod openai;
pub mod rag;
pub mod resolver;
pub mod session;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{CoursescoutError, Result};
