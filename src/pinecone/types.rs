//! Wire types for the Pinecone API.

use serde::Deserialize;

/// Control-plane description of an index.
///
/// Returned by `GET /indexes/{name}`. Only the fields this application
/// consumes are modeled; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexDescription {
    /// Index name.
    pub name: String,
    /// Data-plane host the index is served from (without scheme).
    pub host: String,
    /// Embedding dimension, when reported.
    #[serde(default)]
    pub dimension: Option<u32>,
    /// Distance metric, when reported.
    #[serde(default)]
    pub metric: Option<String>,
}

/// A single nearest-neighbor match returned by a query.
///
/// Matches arrive ranked by similarity, best first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoredMatch {
    /// Chunk identifier assigned at ingestion time.
    pub id: String,
    /// Similarity score; higher is more similar.
    #[serde(default)]
    pub score: f32,
    /// Metadata stored alongside the vector at ingestion time.
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

/// Per-chunk metadata stored in the index.
///
/// The ingestion pipeline stores the source page label, the originating file
/// name, and the chunk's text. All fields are optional on the wire; a chunk
/// upserted without them still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChunkMetadata {
    /// Page number label of the source document ("7", "iv", ...).
    pub page_label: Option<String>,
    /// Name of the source file the chunk came from.
    pub file_name: Option<String>,
    /// The chunk's stored text, used as synthesis context.
    pub text: Option<String>,
}

/// Data-plane query response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResults {
    #[serde(default)]
    pub matches: Vec<ScoredMatch>,
}
