//! Deterministic stand-ins for the embedding and generation services.

use crate::catalog::{CourseRecord, ListField};
use crate::embedding::Embedder;
use crate::error::{CoursescoutError, Result};
use crate::generation::{GenerationConfig, Generator, Prompt};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Embeds text as keyword counts over a fixed vocabulary.
pub struct KeywordEmbedder {
    vocabulary: Vec<String>,
    pub calls: AtomicUsize,
    pub fail: bool,
    pub drop_last: bool,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_lowercase()).collect(),
            calls: AtomicUsize::new(0),
            fail: false,
            drop_last: false,
        }
    }

    /// Vocabulary that separates the three sample courses.
    pub fn for_sample_catalog() -> Self {
        Self::new(&["sql", "query", "neural", "network", "deep", "git", "version", "python", "data"])
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&["x"])
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        self.vocabulary
            .iter()
            .map(|term| lower.matches(term.as_str()).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| CoursescoutError::EmbeddingService("no vector".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoursescoutError::EmbeddingService("service unavailable".to_string()));
        }
        let mut vectors: Vec<Vec<f32>> = texts.iter().map(|t| self.vectorize(t)).collect();
        if self.drop_last {
            vectors.pop();
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    fn model(&self) -> &str {
        "keyword-test"
    }
}

/// Returns a fixed-shape analysis and remembers the last prompt it saw.
#[derive(Default)]
pub struct EchoGenerator {
    pub last_prompt: Mutex<Option<Prompt>>,
    pub last_config: Mutex<Option<GenerationConfig>>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &Prompt, config: &GenerationConfig) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.clone());
        *self.last_config.lock().unwrap() = Some(config.clone());
        Ok("1. Query Analysis\n2. Course Recommendations\n3. Best Match\n4. Learning Path".to_string())
    }

    fn model(&self) -> &str {
        "echo-test"
    }
}

/// Always fails, as an unreachable model service would.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &Prompt, _config: &GenerationConfig) -> Result<String> {
        Err(CoursescoutError::GenerationService("quota exceeded".to_string()))
    }

    fn model(&self) -> &str {
        "failing-test"
    }
}

/// The three-course catalog used across tests.
pub fn sample_catalog() -> Vec<CourseRecord> {
    vec![
        CourseRecord::new("Intro to SQL", "https://courses.example.com/intro-to-sql")
            .with_brief("Write your first SQL query")
            .with_level("Beginner")
            .with_duration("2 Hours")
            .with_description("SELECT, WHERE and JOIN for querying relational data")
            .with_curriculum(ListField::Items(vec!["Tables".into(), "Joins".into()])),
        CourseRecord::new("Deep Learning Basics", "https://courses.example.com/deep-learning")
            .with_brief("Neural networks from first principles")
            .with_level("Intermediate")
            .with_duration("6 Hours")
            .with_description("Build and train neural network models with backpropagation")
            .with_curriculum(ListField::Items(vec!["Perceptrons".into(), "Deep networks".into()])),
        CourseRecord::new("Git for Beginners", "https://courses.example.com/git")
            .with_brief("Version control essentials")
            .with_level("Beginner")
            .with_duration("1 Hour")
            .with_description("Commits, branches and merges with git"),
    ]
}
