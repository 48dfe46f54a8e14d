// file: src/engine/vector.rs
// description: retrieve-then-synthesize query engine over a vector index

use crate::engine::prompts::{context_from_nodes, text_qa_prompt};
use crate::engine::{EngineResponse, QueryEngine};
use crate::error::Result;
use crate::index::VectorStoreIndex;
use crate::llm::ChatModel;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct VectorQueryEngine {
    index: VectorStoreIndex,
    llm: Arc<dyn ChatModel>,
    similarity_top_k: usize,
}

impl VectorQueryEngine {
    pub fn new(index: VectorStoreIndex, llm: Arc<dyn ChatModel>, similarity_top_k: usize) -> Self {
        Self {
            index,
            llm,
            similarity_top_k,
        }
    }
}

#[async_trait]
impl QueryEngine for VectorQueryEngine {
    async fn query(&self, query: &str) -> Result<EngineResponse> {
        let source_nodes = self.index.retrieve(query, self.similarity_top_k).await?;
        debug!(
            "Synthesizing answer from {} retrieved nodes",
            source_nodes.len()
        );
        for node in &source_nodes {
            debug!("{}", node.format_summary(80));
        }

        let prompt = text_qa_prompt(&context_from_nodes(&source_nodes), query);
        let response = self.llm.complete(&prompt).await?;

        Ok(EngineResponse {
            response,
            source_nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SentenceSplitter;
    use crate::models::Document;
    use crate::testing::{ScriptedChat, UnitEmbedder};

    #[tokio::test]
    async fn test_query_stuffs_context_into_prompt() {
        let docs = vec![Document::new(
            "zig.txt".to_string(),
            "Zig Jackson is a photographer.".to_string(),
        )];
        let index = VectorStoreIndex::from_documents(
            &docs,
            &SentenceSplitter::new(64, 0),
            Arc::new(UnitEmbedder),
            10,
        )
        .await
        .unwrap();
        let llm = Arc::new(ScriptedChat::answering("A photographer."));
        let engine = VectorQueryEngine::new(index, llm.clone(), 2);

        let response = engine.query("Who is Zig?").await.unwrap();

        assert_eq!(response.response, "A photographer.");
        assert_eq!(response.source_nodes.len(), 1);
        let prompts = llm.prompts();
        assert!(prompts[0].contains("Zig Jackson is a photographer."));
        assert!(prompts[0].contains("Query: Who is Zig?"));
    }

    #[tokio::test]
    async fn test_empty_index_still_asks_model() {
        let index = VectorStoreIndex::from_documents(
            &[],
            &SentenceSplitter::new(64, 0),
            Arc::new(UnitEmbedder),
            10,
        )
        .await
        .unwrap();
        let llm = Arc::new(ScriptedChat::answering("I don't know."));
        let engine = VectorQueryEngine::new(index, llm, 2);

        let response = engine.query("Anything?").await.unwrap();

        assert_eq!(response.to_string(), "I don't know.");
        assert!(response.source_nodes.is_empty());
    }
}
