// file: src/llm/openai.rs
// description: OpenAI API integration for embeddings and tool-calling chat completions
// reference: https://platform.openai.com/docs/api-reference

use crate::config::OpenAiConfig;
use crate::error::{Result, ServerError};
use crate::llm::types::{
    ChatMessage, ChatModel, ChatResponse, ChatRole, Embedder, ToolCall, ToolDefinition,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: ChatRole,
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: &'a ToolDefinition,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

fn function_type() -> String {
    "function".to_string()
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            tool_calls: message
                .tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.id.clone(),
                    call_type: function_type(),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.to_string(),
                    },
                })
                .collect(),
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

impl From<WireToolCall> for ToolCall {
    fn from(call: WireToolCall) -> Self {
        let arguments = serde_json::from_str(&call.function.arguments)
            .unwrap_or_else(|_| serde_json::json!({}));
        Self {
            id: call.id,
            name: call.function.name,
            arguments,
        }
    }
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ServerError::Config("No OpenAI API key provided".to_string()))?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
        })
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ServerError::Llm(format!("Failed to send OpenAI request: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServerError::Llm(format!("Failed to read OpenAI response: {}", e)))?;

        if !status.is_success() {
            return Err(ServerError::Llm(format!(
                "OpenAI request to {} failed with status {}: {}",
                path, status, text
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Requesting {} embeddings from {}",
            texts.len(),
            self.embedding_model
        );

        let request = EmbeddingRequest {
            input: texts,
            model: &self.embedding_model,
        };

        let body = self.post("/embeddings", &request).await?;
        let mut response: EmbeddingResponse = serde_json::from_str(&body).map_err(|e| {
            ServerError::Embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        if response.data.len() != texts.len() {
            return Err(ServerError::Embedding(format!(
                "expected {} embeddings, received {}",
                texts.len(),
                response.data.len()
            )));
        }

        response.data.sort_by_key(|data| data.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.chat_model
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatResponse> {
        let request = ChatCompletionRequest {
            model: &self.chat_model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: tools
                .iter()
                .map(|function| WireTool {
                    tool_type: "function",
                    function,
                })
                .collect(),
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
            temperature: self.temperature,
        };

        debug!(
            "Sending chat request to {} with {} messages and {} tools",
            self.chat_model,
            messages.len(),
            tools.len()
        );

        let body = self.post("/chat/completions", &request).await?;
        let response: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ServerError::Llm(format!("Failed to parse chat response: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ServerError::Llm("No choices returned from OpenAI".to_string()))?;

        match choice.message.tool_calls {
            Some(calls) if !calls.is_empty() => {
                let calls: Vec<ToolCall> = calls.into_iter().map(ToolCall::from).collect();
                debug!(
                    "Model requested tools: {:?}",
                    calls.iter().map(|c| &c.name).collect::<Vec<_>>()
                );
                Ok(ChatResponse::ToolCalls(calls))
            }
            _ => Ok(ChatResponse::Content(
                choice.message.content.unwrap_or_default(),
            )),
        }
    }
}
