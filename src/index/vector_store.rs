// file: src/index/vector_store.rs
// description: in-memory vector index built from documents for the lifetime of a request
// reference: cosine similarity retrieval over embedded chunks

use crate::error::{Result, ServerError};
use crate::index::SentenceSplitter;
use crate::llm::Embedder;
use crate::models::{Document, Node, NodeWithScore};
use crate::utils::OperationTimer;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

const MAX_CONCURRENT_EMBED_REQUESTS: usize = 4;

pub struct VectorStoreIndex {
    nodes: Vec<Node>,
    embedder: Arc<dyn Embedder>,
}

impl VectorStoreIndex {
    /// Chunks `documents`, embeds every chunk in batches of `batch_size` and
    /// keeps the resulting nodes in insertion order.
    pub async fn from_documents(
        documents: &[Document],
        splitter: &SentenceSplitter,
        embedder: Arc<dyn Embedder>,
        batch_size: usize,
    ) -> Result<Self> {
        let timer = OperationTimer::new("build vector index");

        let nodes: Vec<Node> = documents
            .iter()
            .flat_map(|document| {
                splitter
                    .split_text(&document.text)
                    .into_iter()
                    .enumerate()
                    .map(move |(position, text)| Node::new(document, position, text))
            })
            .collect();

        let texts: Vec<String> = nodes.iter().map(|node| node.text.clone()).collect();
        let batches: Vec<Vec<String>> = texts
            .chunks(batch_size.max(1))
            .map(|batch| batch.to_vec())
            .collect();

        let embeddings: Vec<Vec<Vec<f32>>> = stream::iter(batches.into_iter().map(|batch| {
            let embedder = Arc::clone(&embedder);
            async move { embedder.embed(&batch).await }
        }))
        .buffered(MAX_CONCURRENT_EMBED_REQUESTS)
        .try_collect()
        .await?;

        let embeddings: Vec<Vec<f32>> = embeddings.into_iter().flatten().collect();

        if embeddings.len() != nodes.len() {
            return Err(ServerError::Embedding(format!(
                "expected {} embeddings, received {}",
                nodes.len(),
                embeddings.len()
            )));
        }

        let nodes: Vec<Node> = nodes
            .into_iter()
            .zip(embeddings)
            .map(|(node, embedding)| node.with_embedding(embedding))
            .collect();

        timer.finish_with_count(nodes.len());

        Ok(Self { nodes, embedder })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the `top_k` nodes most similar to `query`, best first.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<NodeWithScore>> {
        if self.nodes.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed_query(query).await?;
        self.retrieve_by_embedding(&query_embedding, top_k)
    }

    pub fn retrieve_by_embedding(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<NodeWithScore>> {
        let mut scored = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let score = cosine_similarity(query_embedding, &node.embedding).ok_or_else(|| {
                ServerError::Embedding(format!(
                    "dimension mismatch: query {} vs node {}",
                    query_embedding.len(),
                    node.embedding.len()
                ))
            })?;
            scored.push(NodeWithScore::new(node.clone(), score));
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        debug!(
            "Retrieved {} nodes (best score {:?})",
            scored.len(),
            scored.first().map(|n| n.score)
        );
        Ok(scored)
    }
}

/// Cosine similarity, `None` when dimensions differ. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }

    Some(dot / (norm_a * norm_b))
}
