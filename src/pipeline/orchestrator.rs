// file: src/pipeline/orchestrator.rs
// description: builds indexes, engines and the agent for a query and runs it
// reference: per-request retrieval workflow

use crate::agent::{FunctionTool, OpenAiAgent, QueryEngineTool, Tool};
use crate::config::{Config, QueryMode, SourceConfig};
use crate::engine::{QueryEngine, QueryEngineChoice, RouterQueryEngine, VectorQueryEngine};
use crate::error::Result;
use crate::index::{SentenceSplitter, VectorStoreIndex};
use crate::llm::{ChatModel, Embedder, OpenAiClient};
use crate::reader::{DirectoryReader, FileScanner};
use crate::utils::{HealthCheck, HealthReport, Validator};
use futures::future::try_join_all;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct QueryPipeline {
    config: Arc<Config>,
    llm: Arc<dyn ChatModel>,
    embedder: Arc<dyn Embedder>,
    reader: DirectoryReader,
    splitter: SentenceSplitter,
}

impl QueryPipeline {
    pub fn new(config: Arc<Config>, llm: Arc<dyn ChatModel>, embedder: Arc<dyn Embedder>) -> Self {
        let reader = DirectoryReader::new(config.index.max_file_size_mb);
        let splitter = SentenceSplitter::new(config.index.chunk_size, config.index.chunk_overlap);

        Self {
            config,
            llm,
            embedder,
            reader,
            splitter,
        }
    }

    /// One OpenAI client serves both chat and embeddings.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = Arc::new(OpenAiClient::new(&config.openai)?);
        Ok(Self::new(Arc::new(config), client.clone(), client))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Answers `query` from scratch: documents are re-read and re-indexed on
    /// every call.
    pub async fn answer(&self, query: &str) -> Result<String> {
        let query = Validator::validate_query(Some(query))?;
        info!("Answering query: {}", Validator::truncate_text(query, 120));

        let engine = self.build_query_engine().await?;

        if !self.config.agent.enabled {
            return Ok(engine.query(query).await?.response);
        }

        let agent = self.build_agent(engine);
        let message = format!("{}{}", query, self.config.agent.message_suffix);
        let response = agent.chat(&message).await?;

        debug!("Agent used {} tool calls", response.sources.len());
        Ok(response.response)
    }

    /// Checks the API key and that every source directory exists and holds
    /// at least one file. Never calls the OpenAI API.
    pub fn health_report(&self) -> HealthReport {
        let mut checks = vec![match self.config.api_key() {
            Ok(_) => HealthCheck::healthy("config:openai_api_key"),
            Err(e) => HealthCheck::unhealthy("config:openai_api_key", e.to_string()),
        }];

        let scanner = FileScanner::new(self.config.index.max_file_size_mb);
        let sources: Vec<(String, &Path)> = match self.config.routing.mode {
            QueryMode::Single => vec![(
                "source:data".to_string(),
                self.config.routing.single_directory.as_path(),
            )],
            QueryMode::Router => self
                .config
                .routing
                .sources
                .iter()
                .map(|s| (format!("source:{}", s.name), s.directory.as_path()))
                .collect(),
        };

        for (component, directory) in sources {
            let check = match scanner.scan_directory(directory) {
                Ok(files) if files.is_empty() => HealthCheck::degraded(
                    &component,
                    format!("no documents in {}", directory.display()),
                ),
                Ok(_) => HealthCheck::healthy(&component),
                Err(e) => HealthCheck::unhealthy(&component, e.to_string()),
            };
            checks.push(check);
        }

        HealthReport::new(checks, env!("CARGO_PKG_VERSION").to_string())
    }

    pub async fn build_query_engine(&self) -> Result<Arc<dyn QueryEngine>> {
        match self.config.routing.mode {
            QueryMode::Single => {
                let engine = self.build_vector_engine(&self.config.routing.single_directory).await?;
                Ok(Arc::new(engine))
            }
            QueryMode::Router => {
                let choices = try_join_all(
                    self.config
                        .routing
                        .sources
                        .iter()
                        .map(|source| self.build_choice(source)),
                )
                .await?;

                Ok(Arc::new(RouterQueryEngine::new(choices, self.llm.clone())?))
            }
        }
    }

    pub fn build_agent(&self, engine: Arc<dyn QueryEngine>) -> OpenAiAgent {
        let engine_tool = QueryEngineTool::new(
            engine,
            self.config.agent.tool_name.clone(),
            self.tool_description(),
        );

        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(engine_tool),
            Arc::new(FunctionTool::sum_numbers()),
        ];

        OpenAiAgent::new(self.llm.clone(), tools)
            .with_max_iterations(self.config.agent.max_iterations)
            .with_verbose(self.config.agent.verbose)
    }

    pub async fn build_index(&self, directory: &Path) -> Result<VectorStoreIndex> {
        let documents = self.reader.load_data(directory).await?;
        VectorStoreIndex::from_documents(
            &documents,
            &self.splitter,
            self.embedder.clone(),
            self.config.index.embed_batch_size,
        )
        .await
    }

    async fn build_vector_engine(&self, directory: &Path) -> Result<VectorQueryEngine> {
        let index = self.build_index(directory).await?;
        debug!("Indexed {} nodes from {}", index.len(), directory.display());

        Ok(VectorQueryEngine::new(
            index,
            self.llm.clone(),
            self.config.index.similarity_top_k,
        ))
    }

    async fn build_choice(&self, source: &SourceConfig) -> Result<QueryEngineChoice> {
        let engine = self.build_vector_engine(&source.directory).await?;
        Ok(QueryEngineChoice::new(
            Arc::new(engine),
            source.description.clone(),
        ))
    }

    fn tool_description(&self) -> String {
        match self.config.routing.mode {
            QueryMode::Router => {
                let titles: Vec<&str> = self
                    .config
                    .routing
                    .sources
                    .iter()
                    .map(|s| s.title.as_str())
                    .collect();
                format!(
                    "A tool that can answer questions about {}",
                    join_titles(&titles)
                )
            }
            QueryMode::Single => format!(
                "A tool that can answer questions about the documents in {}",
                self.config.routing.single_directory.display()
            ),
        }
    }
}

fn join_titles(titles: &[&str]) -> String {
    match titles {
        [] => String::new(),
        [only] => only.to_string(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;
    use crate::llm::ChatResponse;
    use crate::testing::{ScriptedChat, UnitEmbedder, tool_call};
    use crate::utils::HealthStatus;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _data: TempDir,
        config: Config,
    }

    fn fixture() -> Fixture {
        let data = TempDir::new().unwrap();
        let entertainment = data.path().join("entertainment");
        let news = data.path().join("news");
        fs::create_dir_all(&entertainment).unwrap();
        fs::create_dir_all(&news).unwrap();
        fs::write(
            entertainment.join("zig.txt"),
            "Zig Jackson is a Native American photographer.",
        )
        .unwrap();
        fs::write(
            news.join("bridge.txt"),
            "The Francis Scott Key Bridge collapsed in March 2024.",
        )
        .unwrap();

        let mut config = Config::default_config();
        config.openai.api_key = Some("sk-test".to_string());
        config.agent.verbose = false;
        config.routing.single_directory = data.path().to_path_buf();
        config.routing.sources[0].directory = entertainment;
        config.routing.sources[1].directory = news;

        Fixture {
            _data: data,
            config,
        }
    }

    fn pipeline(config: Config, llm: Arc<ScriptedChat>) -> QueryPipeline {
        QueryPipeline::new(Arc::new(config), llm, Arc::new(UnitEmbedder))
    }

    #[test]
    fn test_join_titles() {
        assert_eq!(join_titles(&["A"]), "A");
        assert_eq!(join_titles(&["A", "B"]), "A and B");
        assert_eq!(join_titles(&["A", "B", "C"]), "A, B and C");
    }

    #[test]
    fn test_tool_description_names_both_sources() {
        let fixture = fixture();
        let pipeline = pipeline(fixture.config, Arc::new(ScriptedChat::failing()));

        assert_eq!(
            pipeline.tool_description(),
            "A tool that can answer questions about Zig Jackson - Wikipedia and The Francis Scott key Bridge collapse"
        );
    }

    #[test]
    fn test_health_report_flags_sources() {
        let mut fixture = fixture();
        let empty = fixture._data.path().join("empty");
        fs::create_dir_all(&empty).unwrap();
        fixture.config.routing.sources[0].directory = empty;
        fixture.config.routing.sources[1].directory = "/nonexistent/news".into();
        let pipeline = pipeline(fixture.config, Arc::new(ScriptedChat::failing()));

        let report = pipeline.health_report();

        let statuses: Vec<(&str, &HealthStatus)> = report
            .checks
            .iter()
            .map(|c| (c.component.as_str(), &c.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("config:openai_api_key", &HealthStatus::Healthy),
                ("source:entertainment", &HealthStatus::Degraded),
                ("source:news", &HealthStatus::Unhealthy),
            ]
        );
        assert_eq!(report.overall_status, HealthStatus::Unhealthy);
        assert!(report.format().contains("no documents in"));
    }

    #[test]
    fn test_health_report_without_api_key() {
        let mut fixture = fixture();
        fixture.config.openai.api_key = None;
        let pipeline = pipeline(fixture.config, Arc::new(ScriptedChat::failing()));

        let report = pipeline.health_report();

        assert_eq!(report.checks[0].status, HealthStatus::Unhealthy);
        assert_eq!(report.checks[1].status, HealthStatus::Healthy);
        assert_eq!(report.checks[2].status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_router_agent_flow() {
        let fixture = fixture();
        let llm = Arc::new(
            ScriptedChat::scripted(vec![
                // agent asks the router tool
                ChatResponse::ToolCalls(vec![tool_call(
                    "call_1",
                    "zig_jackson_and_francis_scott_key_bridge_collapse",
                    json!({"query": "When did the bridge collapse?"}),
                )]),
                // selector
                ChatResponse::Content(r#"{"choice": 2, "reason": "bridge"}"#.to_string()),
                // synthesis inside the news engine
                ChatResponse::Content("In March 2024.".to_string()),
            ])
            .then_answering("The bridge collapsed in March 2024."),
        );
        let pipeline = pipeline(fixture.config, llm.clone());

        let answer = pipeline.answer("When did the bridge collapse?").await.unwrap();

        assert_eq!(answer, "The bridge collapsed in March 2024.");
        let prompts = llm.prompts();
        assert_eq!(prompts[0], "When did the bridge collapse? Use a tool.");
        assert!(prompts[2].contains("Francis Scott Key Bridge collapsed"));
        assert!(!prompts[2].contains("Zig Jackson"));
    }

    #[tokio::test]
    async fn test_single_mode_without_agent() {
        let mut fixture = fixture();
        fixture.config.routing.mode = QueryMode::Single;
        fixture.config.agent.enabled = false;
        let llm = Arc::new(ScriptedChat::answering("A photographer."));
        let pipeline = pipeline(fixture.config, llm.clone());

        let answer = pipeline.answer("Who is Zig?").await.unwrap();

        assert_eq!(answer, "A photographer.");
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Query: Who is Zig?"));
    }

    #[tokio::test]
    async fn test_missing_source_directory_fails() {
        let mut fixture = fixture();
        fixture.config.routing.sources[1].directory = "/nonexistent/news".into();
        let pipeline = pipeline(fixture.config, Arc::new(ScriptedChat::answering("x")));

        let err = pipeline.answer("anything").await.unwrap_err();
        assert!(matches!(err, ServerError::DocumentLoad { .. }));
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_indexing() {
        let fixture = fixture();
        let llm = Arc::new(ScriptedChat::failing());
        let pipeline = pipeline(fixture.config, llm.clone());

        let err = pipeline.answer("   ").await.unwrap_err();
        assert!(err.is_client_error());
        assert!(llm.prompts().is_empty());
    }
}
