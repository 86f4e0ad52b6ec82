//! Search session: owns the services and the current index.
//!
//! A session is built explicitly and handed to whoever serves queries. The
//! index is immutable once built; rebuilding creates a new index and swaps
//! the session's reference, so searches already running keep the index they
//! started with.

use crate::catalog::{load_csv, overlapping_titles, CourseRecord};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{CoursescoutError, Result};
use crate::generation::{GenerationConfig, Generator, OpenAIGenerator};
use crate::rag::{Analysis, AnalysisGenerator};
use crate::resolver::{resolve, ResolvedCourse};
use crate::vector_store::VectorIndex;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, instrument, warn};

/// Shown when a search arrives before any index has been built.
pub const NOT_READY_MESSAGE: &str = "Search index not initialized.";

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Courses found and analyzed.
    Complete,
    /// Retrieval resolved nothing.
    NoMatches,
    /// No index has been built yet.
    NotReady,
    /// Courses found, but the analysis could not be generated.
    Degraded,
}

/// Result of one search call.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Analysis text, or an explanatory message for non-complete outcomes.
    pub analysis: String,
    /// Matched courses in retrieval order, without duplicates.
    pub matched: Vec<CourseRecord>,
    /// The same courses with the chunk text and score that matched.
    pub resolved: Vec<ResolvedCourse>,
    pub status: SearchStatus,
}

impl SearchOutcome {
    fn empty(status: SearchStatus, message: &str) -> Self {
        Self {
            analysis: message.to_string(),
            matched: Vec::new(),
            resolved: Vec::new(),
            status,
        }
    }
}

/// Summary of an index build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub courses_indexed: usize,
    pub embedding_model: String,
    /// Title pairs where one title contains the other.
    pub overlapping_titles: Vec<(String, String)>,
}

/// The main entry point for course search.
pub struct SearchSession {
    settings: Settings,
    embedder: Arc<dyn Embedder>,
    analyzer: AnalysisGenerator,
    index: RwLock<Option<Arc<VectorIndex>>>,
}

impl SearchSession {
    /// Create a session backed by the configured OpenAI services.
    pub fn initialize(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding)?);
        let generator: Arc<dyn Generator> =
            Arc::new(OpenAIGenerator::from_settings(&settings.generation)?);

        info!(
            "Using {} for embeddings and {} for analysis",
            embedder.model(),
            generator.model()
        );

        Ok(Self::with_components(settings, prompts, embedder, generator))
    }

    /// Create a session with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let analyzer = AnalysisGenerator::new(generator)
            .with_prompts(prompts)
            .with_config(GenerationConfig::from(&settings.generation));

        Self {
            settings,
            embedder,
            analyzer,
            index: RwLock::new(None),
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current index, if one has been built.
    pub fn index(&self) -> Option<Arc<VectorIndex>> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_ready(&self) -> bool {
        self.index().is_some()
    }

    /// Build a fresh index over `records` and make it current.
    ///
    /// On failure the previous index, if any, stays in place.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn build_index(&self, records: Vec<CourseRecord>) -> Result<BuildSummary> {
        let overlapping = overlapping_titles(&records);
        for (short, long) in &overlapping {
            warn!(
                "Title '{}' is contained in '{}'; title-based resolution may confuse them",
                short, long
            );
        }

        let index = VectorIndex::build(self.embedder.clone(), records).await?;
        let summary = BuildSummary {
            courses_indexed: index.len(),
            embedding_model: index.embedding_model().to_string(),
            overlapping_titles: overlapping,
        };

        *self.index.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(index));
        info!("Search index ready with {} courses", summary.courses_indexed);

        Ok(summary)
    }

    /// Load the configured catalog file and build the index from it.
    pub async fn load_catalog(&self) -> Result<BuildSummary> {
        let records = load_csv(&self.settings.catalog_path())?;
        self.build_index(records).await
    }

    /// Drop the current index. Searches report not-ready until the next build.
    pub fn clear(&self) {
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Search with the configured default `k`.
    pub async fn search_default(&self, query: &str) -> Result<SearchOutcome> {
        self.search(query, self.settings.search.default_k).await
    }

    /// Retrieve the `k` closest courses for `query` and analyze them.
    ///
    /// Embedding failures are returned as errors. Generation failures are
    /// not: the outcome is [`SearchStatus::Degraded`] and still carries the
    /// matched courses.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &str, k: usize) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoursescoutError::InvalidInput("query must not be empty".to_string()));
        }
        if k == 0 {
            return Err(CoursescoutError::InvalidInput("k must be at least 1".to_string()));
        }

        let Some(index) = self.index() else {
            return Ok(SearchOutcome::empty(SearchStatus::NotReady, NOT_READY_MESSAGE));
        };

        let chunks = index.search(query, k).await?;
        let resolved = resolve(&chunks, index.records(), self.settings.search.resolution);
        info!("Retrieved {} chunks, resolved {} courses", chunks.len(), resolved.len());

        let (analysis, status) = match self.analyzer.analyze(query, &resolved).await {
            Ok(Analysis::Generated(text)) => (text, SearchStatus::Complete),
            Ok(Analysis::NoMatches) => (Analysis::NoMatches.text().to_string(), SearchStatus::NoMatches),
            Err(e) => {
                warn!("Analysis generation failed: {}", e);
                (
                    format!(
                        "Course analysis is unavailable right now ({}). The matching courses are listed below.",
                        e
                    ),
                    SearchStatus::Degraded,
                )
            }
        };

        Ok(SearchOutcome {
            analysis,
            matched: resolved.iter().map(|r| r.record.clone()).collect(),
            resolved,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ListField;
    use crate::config::ResolutionStrategy;
    use crate::rag::NO_MATCHES_MESSAGE;
    use crate::testing::{sample_catalog, EchoGenerator, FailingGenerator, KeywordEmbedder};
    use std::sync::atomic::Ordering;

    fn session_with(embedder: Arc<KeywordEmbedder>, generator: Arc<dyn Generator>) -> SearchSession {
        SearchSession::with_components(Settings::default(), Prompts::default(), embedder, generator)
    }

    #[tokio::test]
    async fn test_end_to_end_neural_networks() {
        let session = session_with(
            Arc::new(KeywordEmbedder::for_sample_catalog()),
            Arc::new(EchoGenerator::default()),
        );
        let summary = session.build_index(sample_catalog()).await.unwrap();
        assert_eq!(summary.courses_indexed, 3);

        let outcome = session.search("neural networks", 3).await.unwrap();
        assert_eq!(outcome.status, SearchStatus::Complete);
        assert_eq!(outcome.matched[0].title, "Deep Learning Basics");
        assert!(!outcome.analysis.is_empty());
        assert_eq!(outcome.matched.len(), outcome.resolved.len());
    }

    #[tokio::test]
    async fn test_degraded_when_generation_fails() {
        let session = session_with(
            Arc::new(KeywordEmbedder::for_sample_catalog()),
            Arc::new(FailingGenerator),
        );
        session.build_index(sample_catalog()).await.unwrap();

        let outcome = session.search("neural networks", 3).await.unwrap();
        assert_eq!(outcome.status, SearchStatus::Degraded);
        assert!(!outcome.matched.is_empty());
        assert!(outcome.analysis.contains("unavailable"));
        assert!(outcome.analysis.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_not_ready_before_build() {
        let session = session_with(
            Arc::new(KeywordEmbedder::for_sample_catalog()),
            Arc::new(EchoGenerator::default()),
        );

        let outcome = session.search("sql", 3).await.unwrap();
        assert_eq!(outcome.status, SearchStatus::NotReady);
        assert_eq!(outcome.analysis, NOT_READY_MESSAGE);
        assert!(outcome.matched.is_empty());
    }

    #[tokio::test]
    async fn test_empty_catalog_reports_no_matches() {
        let generator = Arc::new(EchoGenerator::default());
        let session = session_with(Arc::new(KeywordEmbedder::for_sample_catalog()), generator.clone());
        session.build_index(Vec::new()).await.unwrap();

        let outcome = session.search("sql", 3).await.unwrap();
        assert_eq!(outcome.status, SearchStatus::NoMatches);
        assert_eq!(outcome.analysis, NO_MATCHES_MESSAGE);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_index_is_built_once_and_reused() {
        let embedder = Arc::new(KeywordEmbedder::for_sample_catalog());
        let session = session_with(embedder.clone(), Arc::new(EchoGenerator::default()));
        session.build_index(sample_catalog()).await.unwrap();
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);

        session.search("sql", 3).await.unwrap();
        session.search("git", 3).await.unwrap();
        // One batch call for the build, then one per query.
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_k_limits_and_clamps_matches() {
        let session = session_with(
            Arc::new(KeywordEmbedder::for_sample_catalog()),
            Arc::new(EchoGenerator::default()),
        );
        session.build_index(sample_catalog()).await.unwrap();

        assert_eq!(session.search("git", 1).await.unwrap().matched.len(), 1);
        assert_eq!(session.search("git", 10).await.unwrap().matched.len(), 3);
        assert_eq!(session.search_default("git").await.unwrap().matched.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_inputs_rejected() {
        let session = session_with(
            Arc::new(KeywordEmbedder::for_sample_catalog()),
            Arc::new(EchoGenerator::default()),
        );
        assert!(matches!(
            session.search("   ", 3).await,
            Err(CoursescoutError::InvalidInput(_))
        ));
        assert!(matches!(
            session.search("sql", 0).await,
            Err(CoursescoutError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_rebuild_keeps_previous_index() {
        let session = session_with(
            Arc::new(KeywordEmbedder::for_sample_catalog()),
            Arc::new(EchoGenerator::default()),
        );
        session.build_index(sample_catalog()).await.unwrap();
        let before = session.index().unwrap();

        let mut duplicate = sample_catalog();
        duplicate.push(CourseRecord::new("Intro to SQL", "https://courses.example.com/dup"));
        assert!(matches!(
            session.build_index(duplicate).await,
            Err(CoursescoutError::DataLoad(_))
        ));

        assert!(Arc::ptr_eq(&before, &session.index().unwrap()));
    }

    #[tokio::test]
    async fn test_build_rejects_empty_title() {
        let session = session_with(
            Arc::new(KeywordEmbedder::for_sample_catalog()),
            Arc::new(EchoGenerator::default()),
        );
        let mut records = vec![CourseRecord::new("", "https://courses.example.com/blank")];
        records.extend(sample_catalog());

        let err = session.build_index(records).await.unwrap_err();
        assert!(matches!(err, CoursescoutError::DataLoad(_)));
        assert!(!session.is_ready());
    }

    #[tokio::test]
    async fn test_rebuild_swaps_without_touching_held_index() {
        let session = session_with(
            Arc::new(KeywordEmbedder::for_sample_catalog()),
            Arc::new(EchoGenerator::default()),
        );
        session.build_index(sample_catalog()).await.unwrap();
        let held = session.index().unwrap();

        let smaller: Vec<_> = sample_catalog().into_iter().take(1).collect();
        session.build_index(smaller).await.unwrap();

        assert_eq!(held.len(), 3);
        assert_eq!(session.index().unwrap().len(), 1);

        session.clear();
        assert!(!session.is_ready());
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates_from_build() {
        let session = session_with(
            Arc::new(KeywordEmbedder::failing()),
            Arc::new(EchoGenerator::default()),
        );
        let err = session.build_index(sample_catalog()).await.unwrap_err();
        assert!(matches!(err, CoursescoutError::EmbeddingService(_)));
        assert!(!session.is_ready());
    }

    #[tokio::test]
    async fn test_build_reports_overlapping_titles() {
        let session = session_with(
            Arc::new(KeywordEmbedder::for_sample_catalog()),
            Arc::new(EchoGenerator::default()),
        );
        let records = vec![
            CourseRecord::new("Python", "https://courses.example.com/python"),
            CourseRecord::new("Python for Data Science", "https://courses.example.com/python-ds")
                .with_curriculum(ListField::Items(vec!["pandas".into()])),
        ];

        let summary = session.build_index(records).await.unwrap();
        assert_eq!(summary.overlapping_titles.len(), 1);

        // Metadata resolution keeps the longer title bound to its own record.
        assert_eq!(session.settings().search.resolution, ResolutionStrategy::Metadata);
        let outcome = session.search("python data", 2).await.unwrap();
        let titles: Vec<_> = outcome.matched.iter().map(|r| r.title.as_str()).collect();
        assert!(titles.contains(&"Python for Data Science"));
        assert!(titles.contains(&"Python"));
    }

    #[tokio::test]
    async fn test_load_catalog_from_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.csv");
        std::fs::write(
            &path,
            "Title,Link,Description\nGit for Beginners,https://courses.example.com/git,version control\n",
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.catalog.path = path.to_string_lossy().to_string();
        let session = SearchSession::with_components(
            settings,
            Prompts::default(),
            Arc::new(KeywordEmbedder::for_sample_catalog()),
            Arc::new(EchoGenerator::default()),
        );

        let summary = session.load_catalog().await.unwrap();
        assert_eq!(summary.courses_indexed, 1);
        assert_eq!(summary.embedding_model, "keyword-test");
    }
}
