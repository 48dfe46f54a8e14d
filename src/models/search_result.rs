// file: src/models/search_result.rs
// description: retrieved node with its similarity score
// reference: Used for vector similarity search results

use crate::models::Node;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeWithScore {
    pub node: Node,

    /// Cosine similarity (higher is more similar, -1.0 to 1.0)
    pub score: f32,
}

impl NodeWithScore {
    pub fn new(node: Node, score: f32) -> Self {
        Self { node, score }
    }

    /// Format as a summary string for logs and CLI output
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let content_preview = if self.node.text.chars().count() > max_content_len {
            let truncated: String = self.node.text.chars().take(max_content_len).collect();
            format!("{}...", truncated)
        } else {
            self.node.text.clone()
        };

        format!(
            "Score: {:.4} | {}\n{}\n",
            self.score, self.node.file_path, content_preview
        )
    }
}
