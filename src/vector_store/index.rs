//! Brute-force cosine index with a parallel record sequence.

use super::{cosine_similarity, IndexEntry, RetrievedChunk};
use crate::catalog::{ensure_unique_titles, CourseRecord};
use crate::document::format_course;
use crate::embedding::Embedder;
use crate::error::{CoursescoutError, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Vector index over a catalog snapshot.
///
/// `entries[i]` and `records[i]` always describe the same course. The index
/// owns the embedder it was built with, and queries are embedded with that
/// same embedder.
pub struct VectorIndex {
    embedder: Arc<dyn Embedder>,
    entries: Vec<IndexEntry>,
    records: Vec<CourseRecord>,
}

impl VectorIndex {
    /// An index with nothing in it. Searching it yields no chunks.
    pub fn empty(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Format, embed and index every record, preserving input order.
    ///
    /// Every record must validate and titles must be unique. Any embedding
    /// failure aborts the build; there is no partial index.
    #[instrument(skip_all, fields(records = records.len(), model = %embedder.model()))]
    pub async fn build(embedder: Arc<dyn Embedder>, records: Vec<CourseRecord>) -> Result<Self> {
        records.iter().try_for_each(CourseRecord::validate)?;
        ensure_unique_titles(&records)?;

        if records.is_empty() {
            return Ok(Self::empty(embedder));
        }

        let documents: Vec<String> = records.iter().map(format_course).collect();
        let embeddings = embedder.embed_batch(&documents).await?;

        if embeddings.len() != documents.len() {
            return Err(CoursescoutError::EmbeddingService(format!(
                "embedding service returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        let dimensions = embeddings[0].len();
        if dimensions == 0 || embeddings.iter().any(|e| e.len() != dimensions) {
            return Err(CoursescoutError::EmbeddingService(
                "embedding service returned vectors of inconsistent dimensions".to_string(),
            ));
        }

        let entries: Vec<IndexEntry> = documents
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(record_id, (content, embedding))| IndexEntry {
                record_id,
                content,
                embedding,
            })
            .collect();

        info!("Indexed {} courses ({} dimensions)", entries.len(), dimensions);

        Ok(Self {
            embedder,
            entries,
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source records, in catalog order.
    pub fn records(&self) -> &[CourseRecord] {
        &self.records
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Vector width of the stored documents, or `None` when empty.
    pub fn dimensions(&self) -> Option<usize> {
        self.entries.first().map(|e| e.embedding.len())
    }

    /// Model the index was embedded with.
    pub fn embedding_model(&self) -> &str {
        self.embedder.model()
    }

    /// Embed `query` and return the `k` most similar documents.
    ///
    /// An empty index returns no chunks without calling the embedder.
    #[instrument(skip(self), fields(size = self.len()))]
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        self.search_embedding(&query_embedding, k)
    }

    /// Rank stored documents against an already-embedded query.
    ///
    /// Ordered by descending score; equal scores keep insertion order. A
    /// query whose width differs from the stored vectors is an
    /// `EmbeddingService` error.
    pub fn search_embedding(&self, query_embedding: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        if let Some(dimensions) = self.dimensions() {
            if query_embedding.len() != dimensions {
                return Err(CoursescoutError::EmbeddingService(format!(
                    "query embedding has {} dimensions, index has {}",
                    query_embedding.len(),
                    dimensions
                )));
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let score = cosine_similarity(query_embedding, &entry.embedding);
                (i, if score.is_nan() { f32::NEG_INFINITY } else { score })
            })
            .collect();

        // Stable sort: ties stay in insertion order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        debug!(
            "Top scores: {:?}",
            scored.iter().map(|(_, s)| *s).collect::<Vec<_>>()
        );

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(rank, (i, score))| {
                let entry = &self.entries[i];
                RetrievedChunk {
                    rank: rank + 1,
                    content: entry.content.clone(),
                    score,
                    record_id: Some(entry.record_id),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_catalog, KeywordEmbedder};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_build_keeps_parallel_order() {
        let records = sample_catalog();
        let index = VectorIndex::build(Arc::new(KeywordEmbedder::for_sample_catalog()), records.clone())
            .await
            .unwrap();

        assert_eq!(index.len(), records.len());
        assert_eq!(index.records().len(), index.entries().len());
        for (i, (entry, record)) in index.entries().iter().zip(index.records()).enumerate() {
            assert_eq!(entry.record_id, i);
            assert_eq!(record, &records[i]);
            assert!(entry.content.contains(&record.title));
        }
    }

    #[tokio::test]
    async fn test_build_aborts_on_embedding_failure() {
        let result = VectorIndex::build(Arc::new(KeywordEmbedder::failing()), sample_catalog()).await;
        assert!(matches!(result, Err(CoursescoutError::EmbeddingService(_))));
    }

    #[tokio::test]
    async fn test_build_rejects_short_batch() {
        let mut embedder = KeywordEmbedder::for_sample_catalog();
        embedder.drop_last = true;
        let result = VectorIndex::build(Arc::new(embedder), sample_catalog()).await;
        assert!(matches!(result, Err(CoursescoutError::EmbeddingService(_))));
    }

    #[tokio::test]
    async fn test_search_ranks_relevant_course_first() {
        let index = VectorIndex::build(Arc::new(KeywordEmbedder::for_sample_catalog()), sample_catalog())
            .await
            .unwrap();

        let chunks = index.search("neural networks", 3).await.unwrap();
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].content.contains("Deep Learning Basics"));
        assert_eq!(chunks[0].rank, 1);
        assert_eq!(chunks[0].record_id, Some(1));
        assert!(chunks.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_search_respects_k_and_clamps() {
        let index = VectorIndex::build(Arc::new(KeywordEmbedder::for_sample_catalog()), sample_catalog())
            .await
            .unwrap();

        assert_eq!(index.search("git", 1).await.unwrap().len(), 1);
        assert_eq!(index.search("git", 2).await.unwrap().len(), 2);
        assert_eq!(index.search("git", 50).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_index_returns_nothing_without_embedding() {
        let embedder = Arc::new(KeywordEmbedder::for_sample_catalog());
        let index = VectorIndex::build(embedder.clone(), Vec::new()).await.unwrap();

        assert!(index.search("anything", 3).await.unwrap().is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let index = VectorIndex::build(Arc::new(KeywordEmbedder::new(&["zzz"])), sample_catalog())
            .await
            .unwrap();

        // Every document scores 0.0 against an all-zero query.
        let chunks = index.search_embedding(&[0.0], 3).unwrap();
        let ids: Vec<_> = chunks.iter().map(|c| c.record_id.unwrap()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_query_width_mismatch_is_an_error() {
        let index = VectorIndex::build(Arc::new(KeywordEmbedder::for_sample_catalog()), sample_catalog())
            .await
            .unwrap();

        assert_eq!(index.dimensions(), Some(9));
        let result = index.search_embedding(&[1.0, 0.0], 3);
        assert!(matches!(result, Err(CoursescoutError::EmbeddingService(_))));
    }

    #[tokio::test]
    async fn test_build_rejects_empty_title() {
        let embedder = Arc::new(KeywordEmbedder::for_sample_catalog());
        let mut records = vec![CourseRecord::new("", "https://example.com/blank")];
        records.extend(sample_catalog());

        let result = VectorIndex::build(embedder.clone(), records).await;
        assert!(matches!(result, Err(CoursescoutError::DataLoad(_))));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_build_rejects_zero_dimension_vectors() {
        let result = VectorIndex::build(Arc::new(KeywordEmbedder::new(&[])), sample_catalog()).await;
        assert!(result.is_err());
    }
}
