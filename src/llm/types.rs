// file: src/llm/types.rs
// description: chat/embedding abstractions shared by engines and the agent
// reference: OpenAI chat completions message model

use crate::error::{Result, ServerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Assistant turn that requested tools instead of answering.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: None,
            tool_calls,
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// Tool call request from the model, arguments already decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Function declaration advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A model turn is either an answer or a batch of tool calls.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatResponse {
    Content(String),
    ToolCalls(Vec<ToolCall>),
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;

    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolDefinition])
    -> Result<ChatResponse>;

    /// Single-prompt completion without tools.
    async fn complete(&self, prompt: &str) -> Result<String> {
        match self.chat(&[ChatMessage::user(prompt)], &[]).await? {
            ChatResponse::Content(text) => Ok(text),
            ChatResponse::ToolCalls(calls) => Err(ServerError::Llm(format!(
                "model requested {} tool calls on a plain completion",
                calls.len()
            ))),
        }
    }
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds `texts` in order; the result has one vector per input.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServerError::Embedding("no embedding returned for query".to_string()))
    }
}
