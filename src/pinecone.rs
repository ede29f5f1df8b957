/// Pinecone HTTP client module.
///
/// This module provides a blocking HTTP client for the Pinecone vector
/// database: control-plane index resolution at startup and per-query
/// nearest-neighbor search against the index's data plane.
mod client;
mod types;

pub use client::{
    PineconeClient, PineconeClientBuilder, PineconeError, PineconeIndex, PineconeIndexTrait,
};
pub use types::{ChunkMetadata, IndexDescription, ScoredMatch};
