// file: src/index/mod.rs
// description: chunking and vector indexing module exports
// reference: internal module structure

pub mod splitter;
pub mod vector_store;

pub use splitter::SentenceSplitter;
pub use vector_store::{VectorStoreIndex, cosine_similarity};
