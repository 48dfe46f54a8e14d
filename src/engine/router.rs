// file: src/engine/router.rs
// description: routes a query to one of several engines chosen by the chat model
// reference: LLM single-choice selector over engine descriptions

use crate::engine::prompts::single_select_prompt;
use crate::engine::{EngineResponse, QueryEngine};
use crate::error::{Result, ServerError};
use crate::llm::ChatModel;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// A routable engine and the description the selector sees.
pub struct QueryEngineChoice {
    pub engine: Arc<dyn QueryEngine>,
    pub description: String,
}

impl QueryEngineChoice {
    pub fn new(engine: Arc<dyn QueryEngine>, description: impl Into<String>) -> Self {
        Self {
            engine,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Zero-based index into the choices.
    pub index: usize,
    pub reason: String,
}

pub struct RouterQueryEngine {
    choices: Vec<QueryEngineChoice>,
    llm: Arc<dyn ChatModel>,
}

impl RouterQueryEngine {
    pub fn new(choices: Vec<QueryEngineChoice>, llm: Arc<dyn ChatModel>) -> Result<Self> {
        if choices.is_empty() {
            return Err(ServerError::Config(
                "router requires at least one query engine".to_string(),
            ));
        }
        Ok(Self { choices, llm })
    }

    pub async fn select(&self, query: &str) -> Result<Selection> {
        if self.choices.len() == 1 {
            return Ok(Selection {
                index: 0,
                reason: "only one choice".to_string(),
            });
        }

        let descriptions: Vec<&str> = self
            .choices
            .iter()
            .map(|c| c.description.as_str())
            .collect();
        let raw = self
            .llm
            .complete(&single_select_prompt(&descriptions, query))
            .await?;

        parse_selection(&raw, self.choices.len())
    }
}

#[async_trait]
impl QueryEngine for RouterQueryEngine {
    async fn query(&self, query: &str) -> Result<EngineResponse> {
        let selection = self.select(query).await?;
        let choice = &self.choices[selection.index];

        info!(
            "Routing query to engine {} ({}): {}",
            selection.index + 1,
            choice.description,
            selection.reason
        );

        choice.engine.query(query).await
    }
}

/// Parses `{"choice": n, "reason": ..}` (or an array of them) out of model
/// output, tolerating code fences and surrounding prose. `choice` is 1-based.
pub fn parse_selection(raw: &str, num_choices: usize) -> Result<Selection> {
    let value = extract_json(raw).ok_or_else(|| {
        ServerError::Selection(format!("no JSON found in selector output: {}", raw))
    })?;

    let object = match &value {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        other => other.clone(),
    };

    let choice = match object.get("choice") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ServerError::Selection(format!("missing choice in: {}", value)))?;

    if choice == 0 || choice as usize > num_choices {
        return Err(ServerError::Selection(format!(
            "choice {} out of range 1..={}",
            choice, num_choices
        )));
    }

    let reason = object
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Selection {
        index: choice as usize - 1,
        reason,
    })
}

fn extract_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let start = trimmed.find(['{', '['])?;
    let closing = if trimmed[start..].starts_with('[') { ']' } else { '}' };
    let end = trimmed.rfind(closing)?;
    if end < start {
        return None;
    }

    serde_json::from_str(&trimmed[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatResponse;
    use crate::testing::ScriptedChat;

    struct Fixed(&'static str);

    #[async_trait]
    impl QueryEngine for Fixed {
        async fn query(&self, _query: &str) -> Result<EngineResponse> {
            Ok(EngineResponse::from_text(self.0))
        }
    }

    fn router(llm: Arc<ScriptedChat>) -> RouterQueryEngine {
        RouterQueryEngine::new(
            vec![
                QueryEngineChoice::new(Arc::new(Fixed("zig answer")), "Useful for questions about Zig Jackson"),
                QueryEngineChoice::new(Arc::new(Fixed("bridge answer")), "Useful for questions about the bridge"),
            ],
            llm,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_plain_object() {
        let selection = parse_selection(r#"{"choice": 2, "reason": "bridge"}"#, 2).unwrap();
        assert_eq!(selection, Selection { index: 1, reason: "bridge".to_string() });
    }

    #[test]
    fn test_parse_fenced_array() {
        let raw = "```json\n[{\"choice\": \"1\", \"reason\": \"art\"}]\n```";
        let selection = parse_selection(raw, 2).unwrap();
        assert_eq!(selection.index, 0);
        assert_eq!(selection.reason, "art");
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(parse_selection(r#"{"choice": 3}"#, 2).is_err());
        assert!(parse_selection(r#"{"choice": 0}"#, 2).is_err());
        assert!(parse_selection("the second one", 2).is_err());
    }

    #[tokio::test]
    async fn test_routes_to_selected_engine() {
        let llm = Arc::new(ScriptedChat::scripted(vec![ChatResponse::Content(
            r#"{"choice": 2, "reason": "collapse question"}"#.to_string(),
        )]));
        let router = router(llm.clone());

        let response = router.query("How many died in the collapse?").await.unwrap();

        assert_eq!(response.response, "bridge answer");
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("(2) Useful for questions about the bridge"));
    }

    #[tokio::test]
    async fn test_single_choice_skips_selector() {
        let llm = Arc::new(ScriptedChat::failing());
        let router = RouterQueryEngine::new(
            vec![QueryEngineChoice::new(Arc::new(Fixed("only")), "everything")],
            llm.clone(),
        )
        .unwrap();

        assert_eq!(router.query("q").await.unwrap().response, "only");
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_selection_is_error() {
        let llm = Arc::new(ScriptedChat::answering("I cannot decide"));
        let err = router(llm).query("q").await.unwrap_err();
        assert!(matches!(err, ServerError::Selection(_)));
    }

    #[test]
    fn test_empty_router_rejected() {
        let llm: Arc<dyn ChatModel> = Arc::new(ScriptedChat::failing());
        assert!(RouterQueryEngine::new(Vec::new(), llm).is_err());
    }
}
