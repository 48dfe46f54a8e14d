// file: src/agent/tools.rs
// description: callable tools exposed to the function-calling agent
// reference: OpenAI function calling tool definitions

use crate::engine::QueryEngine;
use crate::error::{Result, ServerError};
use crate::llm::ToolDefinition;
use async_trait::async_trait;
use serde_json::{Number, Value, json};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

impl ToolMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn metadata(&self) -> &ToolMetadata;

    async fn call(&self, arguments: Value) -> Result<String>;
}

/// Exposes a query engine to the agent as a `{"query": string}` function.
pub struct QueryEngineTool {
    engine: Arc<dyn QueryEngine>,
    metadata: ToolMetadata,
}

impl QueryEngineTool {
    pub fn new(
        engine: Arc<dyn QueryEngine>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let parameters = json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to search for"
                }
            },
            "required": ["query"]
        });

        Self {
            engine,
            metadata: ToolMetadata::new(name, description, parameters),
        }
    }
}

#[async_trait]
impl Tool for QueryEngineTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn call(&self, arguments: Value) -> Result<String> {
        let query = arguments
            .get("query")
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| {
                ServerError::Tool(format!(
                    "{} expects a non-empty string 'query' argument",
                    self.metadata.name
                ))
            })?;

        Ok(self.engine.query(query).await?.response)
    }
}

type ToolFn = dyn Fn(&Value) -> Result<Value> + Send + Sync;

/// Wraps a synchronous function taking the decoded arguments object.
pub struct FunctionTool {
    metadata: ToolMetadata,
    function: Box<ToolFn>,
}

impl FunctionTool {
    pub fn new<F>(metadata: ToolMetadata, function: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            metadata,
            function: Box::new(function),
        }
    }

    /// `sumNumbers`: adds the numeric arguments `a` and `b`.
    pub fn sum_numbers() -> Self {
        let parameters = json!({
            "type": "object",
            "properties": {
                "a": {"type": "number", "description": "The first number"},
                "b": {"type": "number", "description": "The second number"}
            },
            "required": ["a", "b"]
        });

        Self::new(
            ToolMetadata::new(
                "sumNumbers",
                "Use this function to sum two numbers",
                parameters,
            ),
            add_operands,
        )
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn call(&self, arguments: Value) -> Result<String> {
        match (self.function)(&arguments)? {
            Value::String(text) => Ok(text),
            other => Ok(other.to_string()),
        }
    }
}

fn add_operands(arguments: &Value) -> Result<Value> {
    let operand = |name: &str| {
        arguments
            .get(name)
            .filter(|v| v.is_number())
            .ok_or_else(|| ServerError::Tool(format!("sumNumbers requires a number '{}'", name)))
    };
    let (a, b) = (operand("a")?, operand("b")?);

    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64())
        && let Some(sum) = x.checked_add(y)
    {
        return Ok(json!(sum));
    }

    let sum = a.as_f64().unwrap_or_default() + b.as_f64().unwrap_or_default();
    Number::from_f64(sum)
        .map(Value::Number)
        .ok_or_else(|| ServerError::Tool(format!("sum {} is not a finite number", sum)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineResponse;

    struct Echo;

    #[async_trait]
    impl QueryEngine for Echo {
        async fn query(&self, query: &str) -> Result<EngineResponse> {
            Ok(EngineResponse::from_text(format!("answer to {}", query)))
        }
    }

    #[test]
    fn test_sum_numbers_integers() {
        let tool = FunctionTool::sum_numbers();
        let sum = tokio_test::block_on(tool.call(json!({"a": 2, "b": 3})));
        assert_eq!(tokio_test::assert_ok!(sum), "5");
    }

    #[tokio::test]
    async fn test_sum_numbers_floats() {
        let tool = FunctionTool::sum_numbers();
        assert_eq!(tool.call(json!({"a": 1.5, "b": 2})).await.unwrap(), "3.5");
    }

    #[tokio::test]
    async fn test_sum_numbers_requires_both_operands() {
        let tool = FunctionTool::sum_numbers();
        assert!(tool.call(json!({"a": 1})).await.is_err());
        assert!(tool.call(json!({"a": 1, "b": "2"})).await.is_err());
    }

    #[test]
    fn test_sum_numbers_definition() {
        let definition = FunctionTool::sum_numbers().metadata().definition();
        assert_eq!(definition.name, "sumNumbers");
        assert_eq!(definition.parameters["required"], json!(["a", "b"]));
    }

    #[tokio::test]
    async fn test_query_engine_tool() {
        let tool = QueryEngineTool::new(Arc::new(Echo), "docs", "Answers questions about docs");

        assert_eq!(
            tool.call(json!({"query": "awards"})).await.unwrap(),
            "answer to awards"
        );
        assert!(tool.call(json!({})).await.is_err());
        assert_eq!(tool.metadata().parameters["required"], json!(["query"]));
    }
}
