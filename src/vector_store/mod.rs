//! In-memory vector index over formatted course documents.
//!
//! The index is built wholesale from a catalog snapshot and never mutated
//! afterwards; a catalog change means building a new index.

mod index;

pub use index::VectorIndex;

/// One stored document: its text, its embedding, and the position of the
/// course record it was formatted from.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Position of the source record in the index's record sequence.
    pub record_id: usize,
    /// Formatted document text.
    pub content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

/// A document returned by similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    /// 1-based position in the result list.
    pub rank: usize,
    /// Formatted document text.
    pub content: String,
    /// Similarity score (higher is better).
    pub score: f32,
    /// Source record position, when the producer attached it.
    pub record_id: Option<usize>,
}

impl RetrievedChunk {
    /// A chunk that carries only text, as a plain text-only vector store would return.
    pub fn text_only(rank: usize, content: impl Into<String>) -> Self {
        Self {
            rank,
            content: content.into(),
            score: 0.0,
            record_id: None,
        }
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
