pub mod config;
pub mod doctor;
pub mod engine;
pub mod openai;
pub mod pinecone;
pub mod tui;

pub use config::{Config, ConfigError};
pub use engine::{QueryEngine, QueryEngineBuilder, QueryError, QueryResponse, SourceNode};
pub use openai::{OpenAiClient, OpenAiClientBuilder, OpenAiClientTrait, OpenAiError};
pub use pinecone::{
    ChunkMetadata, PineconeClient, PineconeClientBuilder, PineconeError, PineconeIndex,
    PineconeIndexTrait, ScoredMatch,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_accessible_from_crate_root() {
        let metadata = ChunkMetadata {
            page_label: Some("7".to_string()),
            file_name: None,
            text: None,
        };
        let source = SourceNode::new("doc1".to_string(), 0.9, metadata);
        let response = QueryResponse::new("answer".to_string(), vec![source]);
        assert_eq!(response.source_caption().as_deref(), Some("Source: page 7"));
    }

    #[test]
    fn client_builders_accessible_from_crate_root() {
        let openai = OpenAiClientBuilder::new().api_key("sk-test").build();
        assert!(openai.is_ok());

        let pinecone = PineconeClientBuilder::new().api_key("pc-test").build();
        assert!(pinecone.is_ok());
    }
}
