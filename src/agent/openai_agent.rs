// file: src/agent/openai_agent.rs
// description: function-calling agent loop over the chat model and a tool set
// reference: OpenAI tool calling conversation protocol

use crate::agent::Tool;
use crate::error::{Result, ServerError};
use crate::llm::{ChatMessage, ChatModel, ChatResponse, ToolCall, ToolDefinition};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Record of one tool invocation made while answering.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub tool_name: String,
    pub arguments: Value,
    pub output: String,
    pub is_error: bool,
}

#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub response: String,
    pub sources: Vec<ToolOutput>,
}

impl fmt::Display for AgentResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response)
    }
}

pub struct OpenAiAgent {
    llm: Arc<dyn ChatModel>,
    tools: Vec<Arc<dyn Tool>>,
    max_iterations: usize,
    verbose: bool,
}

impl OpenAiAgent {
    pub fn new(llm: Arc<dyn ChatModel>, tools: Vec<Arc<dyn Tool>>) -> Self {
        Self {
            llm,
            tools,
            max_iterations: 10,
            verbose: false,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Runs model turns until the model answers without requesting tools.
    pub async fn chat(&self, message: &str) -> Result<AgentResponse> {
        let definitions: Vec<ToolDefinition> =
            self.tools.iter().map(|t| t.metadata().definition()).collect();
        let mut messages = vec![ChatMessage::user(message)];
        let mut sources = Vec::new();

        for iteration in 0..self.max_iterations {
            debug!(
                "Agent turn {} on {} with {} messages",
                iteration + 1,
                self.llm.model_name(),
                messages.len()
            );

            match self.llm.chat(&messages, &definitions).await? {
                ChatResponse::Content(response) => {
                    return Ok(AgentResponse { response, sources });
                }
                ChatResponse::ToolCalls(calls) => {
                    messages.push(ChatMessage::assistant_tool_calls(calls.clone()));

                    for call in calls {
                        let output = self.call_tool(&call).await;
                        messages.push(ChatMessage::tool_result(&call.id, output.output.clone()));
                        sources.push(output);
                    }
                }
            }
        }

        Err(ServerError::AgentExhausted(self.max_iterations))
    }

    /// Failures are returned to the model as the tool's output.
    async fn call_tool(&self, call: &ToolCall) -> ToolOutput {
        if self.verbose {
            info!("=== Calling Function ===");
            info!("Calling function: {} with args: {}", call.name, call.arguments);
        }

        let result = match self.tools.iter().find(|t| t.metadata().name == call.name) {
            Some(tool) => tool.call(call.arguments.clone()).await,
            None => Err(ServerError::Tool(format!("Tool {} does not exist", call.name))),
        };

        let (output, is_error) = match result {
            Ok(output) => (output, false),
            Err(e) => {
                warn!("Tool {} failed: {}", call.name, e);
                (format!("Error: {}", e), true)
            }
        };

        if self.verbose {
            info!("Got output: {}", output);
            info!("========================");
        }

        ToolOutput {
            tool_name: call.name.clone(),
            arguments: call.arguments.clone(),
            output,
            is_error,
        }
    }
}
