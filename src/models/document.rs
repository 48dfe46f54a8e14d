// file: src/models/document.rs
// description: loaded documents and the chunk nodes indexed from them
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub file_path: String,
    pub text: String,
    pub content_hash: String,
}

impl Document {
    pub fn new(file_path: String, text: String) -> Self {
        let content_hash = Self::compute_hash(&text);
        let id = Self::compute_hash(&format!("{}:{}", file_path, content_hash));

        Self {
            id,
            file_path,
            text,
            content_hash,
        }
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// A chunk of a document together with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub document_id: String,
    pub file_path: String,
    pub text: String,
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

impl Node {
    pub fn new(document: &Document, position: usize, text: String) -> Self {
        Self {
            id: format!("{}-{}", &document.id[..16], position),
            document_id: document.id.clone(),
            file_path: document.file_path.clone(),
            text,
            embedding: Vec::new(),
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}
