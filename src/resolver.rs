//! Maps retrieved chunks back to the course records they were built from.
//!
//! Two strategies are supported. `Metadata` trusts the record position the
//! index stores next to each embedding. `Title` is a linear content match:
//! the first record (in catalog order) whose title occurs in the chunk text
//! wins. Title matching mis-binds when one title is a substring of another
//! and the shorter one comes first; `Metadata` falls back to it only for
//! chunks that carry no usable position.

use crate::catalog::CourseRecord;
use crate::config::ResolutionStrategy;
use crate::vector_store::RetrievedChunk;
use std::collections::HashSet;
use tracing::{debug, warn};

/// A retrieved chunk paired with the course it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCourse {
    pub record: CourseRecord,
    /// Full text of the chunk that matched.
    pub chunk: String,
    pub rank: usize,
    pub score: f32,
}

/// Resolve chunks to records, in chunk order, with no repeated titles.
///
/// Chunks that match no record are skipped.
pub fn resolve(
    chunks: &[RetrievedChunk],
    records: &[CourseRecord],
    strategy: ResolutionStrategy,
) -> Vec<ResolvedCourse> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut resolved = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        let record = match strategy {
            ResolutionStrategy::Metadata => chunk
                .record_id
                .and_then(|id| records.get(id))
                .or_else(|| find_by_title(&chunk.content, records)),
            ResolutionStrategy::Title => find_by_title(&chunk.content, records),
        };

        let Some(record) = record else {
            warn!("Skipping unresolved chunk at rank {}", chunk.rank);
            continue;
        };

        if !seen.insert(record.title.as_str()) {
            debug!("Chunk at rank {} repeats '{}'", chunk.rank, record.title);
            continue;
        }

        resolved.push(ResolvedCourse {
            record: record.clone(),
            chunk: chunk.content.clone(),
            rank: chunk.rank,
            score: chunk.score,
        });
    }

    resolved
}

/// Resolve purely by title containment.
pub fn resolve_by_title(chunks: &[RetrievedChunk], records: &[CourseRecord]) -> Vec<ResolvedCourse> {
    resolve(chunks, records, ResolutionStrategy::Title)
}

/// First record, in catalog order, whose title occurs in `text`.
fn find_by_title<'a>(text: &str, records: &'a [CourseRecord]) -> Option<&'a CourseRecord> {
    records.iter().find(|r| text.contains(r.title.as_str()))
}
