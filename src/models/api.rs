// file: src/models/api.rs
// description: HTTP request and response bodies
// reference: https://docs.rs/serde

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /query`. The field is kept loosely typed so that a missing,
/// null or non-string query is reported as a 400 rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<Value>,
}

impl QueryRequest {
    /// The query text, if present as a non-blank string.
    pub fn query_text(&self) -> Option<&str> {
        match &self.query {
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> QueryRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_query_text_present() {
        assert_eq!(parse(r#"{"query": "What awards did Zig get?"}"#).query_text(), Some("What awards did Zig get?"));
    }

    #[test]
    fn test_query_text_rejected_values() {
        assert_eq!(parse("{}").query_text(), None);
        assert_eq!(parse(r#"{"query": null}"#).query_text(), None);
        assert_eq!(parse(r#"{"query": ""}"#).query_text(), None);
        assert_eq!(parse(r#"{"query": "  "}"#).query_text(), None);
        assert_eq!(parse(r#"{"query": 42}"#).query_text(), None);
    }
}
