// file: src/utils/validation.rs
// description: input validation utilities and helpers
// reference: input validation patterns

use crate::error::{Result, ServerError};
use std::path::Path;

pub const QUERY_NOT_PROVIDED: &str = "Query not provided";

pub struct Validator;

impl Validator {
    pub fn validate_query(query: Option<&str>) -> Result<&str> {
        match query.map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(ServerError::Validation(QUERY_NOT_PROVIDED.to_string())),
        }
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ServerError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(ServerError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_port(port: u16) -> Result<()> {
        if port == 0 {
            return Err(ServerError::Validation("Port cannot be 0".to_string()));
        }
        Ok(())
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let truncated: String = text.chars().take(max_chars).collect();
            format!("{}...", truncated)
        }
    }
}
