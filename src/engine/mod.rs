//! Query engine orchestrating retrieval and answer synthesis.
//!
//! This module provides the `QueryEngine` struct which embeds a free-text
//! question, retrieves the nearest chunks from the bound vector index, and
//! asks the language model for an answer grounded in the retrieved text.

mod query_engine;
mod types;

pub use query_engine::{QueryEngine, QueryEngineBuilder, QueryError};
pub use types::{QueryResponse, SourceNode};
