// file: src/testing.rs
// description: in-process fakes for the chat and embedding clients used by unit tests

use crate::error::{Result, ServerError};
use crate::llm::{ChatMessage, ChatModel, ChatResponse, Embedder, ToolCall, ToolDefinition};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Every text embeds to the same unit vector, so every node scores 1.0.
pub struct UnitEmbedder;

#[async_trait]
impl Embedder for UnitEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

/// Replays queued responses, then falls back to a fixed answer (or fails).
pub struct ScriptedChat {
    script: Mutex<VecDeque<ChatResponse>>,
    fallback: Option<String>,
    calls: Mutex<Vec<(Vec<ChatMessage>, Vec<ToolDefinition>)>>,
}

impl ScriptedChat {
    pub fn answering(text: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn scripted(responses: Vec<ChatResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn then_answering(mut self, text: &str) -> Self {
        self.fallback = Some(text.to_string());
        self
    }

    pub fn failing() -> Self {
        Self::scripted(Vec::new())
    }

    /// Content of the last message of every request, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(messages, _)| {
                messages
                    .last()
                    .and_then(|m| m.content.clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, Vec<ToolDefinition>)> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn tool_call(id: &str, name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), tools.to_vec()));

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return Ok(next);
        }

        match &self.fallback {
            Some(text) => Ok(ChatResponse::Content(text.clone())),
            None => Err(ServerError::Llm("connection refused".to_string())),
        }
    }
}
