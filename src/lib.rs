// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod agent;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod server;
pub mod utils;

#[cfg(test)]
mod testing;

pub use agent::{AgentResponse, FunctionTool, OpenAiAgent, QueryEngineTool, Tool, ToolMetadata};
pub use config::{Config, QueryMode, SourceConfig};
pub use engine::{EngineResponse, QueryEngine, RouterQueryEngine, VectorQueryEngine};
pub use error::{Result, ServerError};
pub use index::{SentenceSplitter, VectorStoreIndex};
pub use llm::{ChatModel, Embedder, OpenAiClient};
pub use models::{Document, Node, NodeWithScore, QueryRequest, QueryResponse};
pub use pipeline::QueryPipeline;
pub use reader::DirectoryReader;
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};

