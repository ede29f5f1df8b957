//! Types for synthesized query responses and their citations.

use std::cmp::Ordering;

use crate::pinecone::{ChunkMetadata, ScoredMatch};

/// A retrieved chunk that contributed context to an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceNode {
    /// Chunk identifier assigned at ingestion time
    id: String,
    /// Similarity score reported by the index (higher is better)
    score: f32,
    /// Metadata stored alongside the chunk
    metadata: ChunkMetadata,
}

impl SourceNode {
    /// Creates a new source node.
    pub fn new(id: String, score: f32, metadata: ChunkMetadata) -> Self {
        Self {
            id,
            score,
            metadata,
        }
    }

    /// Returns the chunk identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the similarity score.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Returns the source page label, if one was stored.
    pub fn page_label(&self) -> Option<&str> {
        self.metadata.page_label.as_deref()
    }

    /// Returns the source file name, if one was stored.
    pub fn file_name(&self) -> Option<&str> {
        self.metadata.file_name.as_deref()
    }

    /// Returns the chunk's stored text, if any.
    pub fn text(&self) -> Option<&str> {
        self.metadata.text.as_deref()
    }
}

impl From<ScoredMatch> for SourceNode {
    fn from(m: ScoredMatch) -> Self {
        Self {
            id: m.id,
            score: m.score,
            metadata: m.metadata,
        }
    }
}

/// A synthesized answer together with the sources it was grounded in.
///
/// Created per request, consumed once by the renderer, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    /// The synthesized answer text
    answer: String,
    /// Contributing sources, best match first
    sources: Vec<SourceNode>,
}

impl QueryResponse {
    /// Creates a new query response.
    ///
    /// Sources are ordered by descending similarity score regardless of the
    /// order they are supplied in, so the citation policy below stays
    /// deterministic.
    pub fn new(answer: String, mut sources: Vec<SourceNode>) -> Self {
        sources.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(Ordering::Equal)
        });
        Self { answer, sources }
    }

    /// Returns the answer text.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns the contributing sources, best match first.
    pub fn sources(&self) -> &[SourceNode] {
        &self.sources
    }

    /// Returns the representative source for citation.
    ///
    /// Policy: the highest-scoring source that carries a page label. An
    /// answer whose sources carry no page label has no citation and is
    /// rendered without a source caption.
    pub fn cited_source(&self) -> Option<&SourceNode> {
        self.sources.iter().find(|s| s.page_label().is_some())
    }

    /// Returns the rendered source caption, e.g. `Source: page 7`.
    ///
    /// `None` when no source carries a page label.
    pub fn source_caption(&self) -> Option<String> {
        self.cited_source()
            .and_then(SourceNode::page_label)
            .map(|label| format!("Source: page {}", label))
    }
}
