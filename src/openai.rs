/// OpenAI HTTP client module.
///
/// This module provides a blocking HTTP client for the OpenAI API: query
/// embedding, chat-completion answer synthesis, and model listing for
/// health checks.
mod client;

pub use client::{OpenAiClient, OpenAiClientBuilder, OpenAiClientTrait, OpenAiError};
