// file: src/engine/mod.rs
// description: query engine abstraction and implementations
// reference: internal module structure

pub mod prompts;
pub mod router;
pub mod vector;

pub use router::{QueryEngineChoice, RouterQueryEngine, Selection, parse_selection};
pub use vector::VectorQueryEngine;

use crate::error::Result;
use crate::models::NodeWithScore;
use async_trait::async_trait;
use std::fmt;

/// Answers a natural-language query.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn query(&self, query: &str) -> Result<EngineResponse>;
}

#[derive(Debug, Clone)]
pub struct EngineResponse {
    pub response: String,
    pub source_nodes: Vec<NodeWithScore>,
}

impl EngineResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            response: text.into(),
            source_nodes: Vec::new(),
        }
    }
}

impl fmt::Display for EngineResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response)
    }
}
