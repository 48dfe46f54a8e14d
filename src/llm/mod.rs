// file: src/llm/mod.rs
// description: language model client module exports
// reference: internal module structure

pub mod openai;
pub mod types;

pub use openai::OpenAiClient;
pub use types::{
    ChatMessage, ChatModel, ChatResponse, ChatRole, Embedder, ToolCall, ToolDefinition,
};
