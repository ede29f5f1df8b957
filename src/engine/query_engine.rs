//! Query dispatch: embed, retrieve, synthesize.

use std::sync::Arc;

use thiserror::Error;

use crate::openai::{OpenAiClientTrait, OpenAiError};
use crate::pinecone::{PineconeError, PineconeIndexTrait, ScoredMatch};

use super::types::{QueryResponse, SourceNode};

/// Prompt template for grounded answer synthesis.
const PROMPT_TEMPLATE: &str = r#"Context information from a document index is below.
---------------------
{context}
---------------------
Given the context information and not prior knowledge, answer the query.
If the context does not contain the answer, say so.

Query: {query}
Answer:"#;

/// Number of chunks retrieved per query unless overridden.
const DEFAULT_TOP_K: usize = 3;

/// Retrieved chunks longer than this are truncated before prompting.
const MAX_CHUNK_CHARS: usize = 1500;

/// Errors that can occur while dispatching a query.
///
/// The taxonomy is deliberately narrow: each variant names the pipeline
/// stage that failed, so transient service failures stay distinguishable
/// from programming defects.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query string was empty or blank
    #[error("Query cannot be empty")]
    EmptyQuery,

    /// Embedding the query failed
    #[error("Failed to embed query: {0}")]
    Embedding(#[source] OpenAiError),

    /// The nearest-neighbor search failed
    #[error("Vector index query failed: {0}")]
    Retrieval(#[source] PineconeError),

    /// Answer synthesis failed
    #[error("Answer synthesis failed: {0}")]
    Synthesis(#[source] OpenAiError),
}

/// Builder for constructing `QueryEngine` instances.
#[derive(Default)]
pub struct QueryEngineBuilder {
    llm: Option<Arc<dyn OpenAiClientTrait>>,
    index: Option<Arc<dyn PineconeIndexTrait>>,
    top_k: Option<usize>,
}

impl QueryEngineBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language model client to use.
    pub fn llm(mut self, llm: Arc<dyn OpenAiClientTrait>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Sets the bound index to retrieve from.
    pub fn index(mut self, index: Arc<dyn PineconeIndexTrait>) -> Self {
        self.index = Some(index);
        self
    }

    /// Sets the number of chunks retrieved per query.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Builds the `QueryEngine`.
    ///
    /// # Panics
    ///
    /// Panics if `llm()` or `index()` was not called.
    #[must_use]
    pub fn build(self) -> QueryEngine {
        QueryEngine {
            llm: self.llm.expect("llm must be set via llm() method"),
            index: self.index.expect("index must be set via index() method"),
            top_k: self.top_k.unwrap_or(DEFAULT_TOP_K).max(1),
        }
    }
}

/// Answers free-text questions over a remote vector index.
///
/// Stateless between calls; each dispatch is a single best-effort attempt
/// with no retry loop. At most one query is in flight at a time because the
/// caller drives dispatch synchronously.
pub struct QueryEngine {
    llm: Arc<dyn OpenAiClientTrait>,
    index: Arc<dyn PineconeIndexTrait>,
    top_k: usize,
}

impl QueryEngine {
    /// Creates a new `QueryEngine` with the default retrieval depth.
    #[must_use]
    pub fn new(llm: Arc<dyn OpenAiClientTrait>, index: Arc<dyn PineconeIndexTrait>) -> Self {
        Self {
            llm,
            index,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Answers a question.
    ///
    /// Pipeline: embed the question, retrieve the `top_k` nearest chunks,
    /// build a grounded prompt from their stored text, and ask the language
    /// model for an answer.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(response))` - answer plus ranked sources
    /// * `Ok(None)` - the index returned zero matches; no synthesis call
    ///   is made
    /// * `Err(_)` - the failing pipeline stage
    pub fn answer(&self, query: &str) -> Result<Option<QueryResponse>, QueryError> {
        if query.trim().is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let embedding = self.llm.embed(query).map_err(QueryError::Embedding)?;

        let matches = self
            .index
            .query(&embedding, self.top_k)
            .map_err(QueryError::Retrieval)?;

        if matches.is_empty() {
            return Ok(None);
        }

        let context = format_context(&matches);
        let prompt = PROMPT_TEMPLATE
            .replace("{context}", &context)
            .replace("{query}", query);

        let answer = self.llm.complete(&prompt).map_err(QueryError::Synthesis)?;

        let sources = matches.into_iter().map(SourceNode::from).collect();
        Ok(Some(QueryResponse::new(answer, sources)))
    }
}

/// Formats retrieved chunks into the context section of the prompt.
fn format_context(matches: &[ScoredMatch]) -> String {
    matches
        .iter()
        .map(|m| {
            let mut header = format!("[chunk {}", m.id);
            if let Some(ref file) = m.metadata.file_name {
                header.push_str(&format!(", file {}", file));
            }
            if let Some(ref page) = m.metadata.page_label {
                header.push_str(&format!(", page {}", page));
            }
            header.push(']');

            let text = m.metadata.text.as_deref().unwrap_or("(no stored text)");
            format!("{}\n{}", header, truncate_chars(text, MAX_CHUNK_CHARS))
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// Truncates a string to at most `max` characters, on a character boundary.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
