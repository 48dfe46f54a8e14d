// file: src/agent/mod.rs
// description: tool-calling agent module exports
// reference: internal module structure

pub mod openai_agent;
pub mod tools;

pub use openai_agent::{AgentResponse, OpenAiAgent, ToolOutput};
pub use tools::{FunctionTool, QueryEngineTool, Tool, ToolMetadata};
