// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod api;
pub mod document;
pub mod search_result;

pub use api::{ErrorResponse, QueryRequest, QueryResponse};
pub use document::{Document, Node};
pub use search_result::NodeWithScore;
