// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Document loading failed for {path}: {message}")]
    DocumentLoad { path: PathBuf, message: String },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("LLM API error: {0}")]
    Llm(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Router selection error: {0}")]
    Selection(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Agent exceeded {0} iterations without a final answer")]
    AgentExhausted(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ServerError {
    /// Errors caused by the caller's input rather than by the pipeline.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServerError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(ServerError::Validation("empty".to_string()).is_client_error());
        assert!(!ServerError::Llm("down".to_string()).is_client_error());
        assert!(!ServerError::AgentExhausted(3).is_client_error());
    }

    #[test]
    fn test_error_display() {
        let err = ServerError::AgentExhausted(10);
        assert_eq!(
            err.to_string(),
            "Agent exceeded 10 iterations without a final answer"
        );
    }
}
