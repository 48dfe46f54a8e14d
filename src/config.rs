// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{Result, ServerError};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "LLAMA_SERVER";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub openai: OpenAiConfig,
    pub index: IndexConfig,
    pub agent: AgentConfig,
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub similarity_top_k: usize,
    pub embed_batch_size: usize,
    pub max_file_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    pub enabled: bool,
    pub max_iterations: usize,
    pub verbose: bool,
    pub message_suffix: String,
    pub tool_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutingConfig {
    pub mode: QueryMode,
    pub single_directory: PathBuf,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// One document collection served by its own query engine in router mode.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub name: String,
    pub title: String,
    pub directory: PathBuf,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Route between one query engine per configured source.
    Router,
    /// Query a single index built over `single_directory`.
    Single,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Router => write!(f, "router"),
            QueryMode::Single => write!(f, "single"),
        }
    }
}

impl FromStr for QueryMode {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "router" => Ok(QueryMode::Router),
            "single" => Ok(QueryMode::Single),
            other => Err(ServerError::Config(format!("Unknown query mode: {}", other))),
        }
    }
}

impl Config {
    /// Layers built-in defaults, the optional TOML file, prefixed environment
    /// variables and finally the bare `OPENAI_API_KEY` / `PORT` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let api_key = std::env::var("OPENAI_API_KEY").ok();
        let port = match std::env::var("PORT") {
            Ok(raw) if !raw.trim().is_empty() => Some(Self::parse_port(&raw)?),
            _ => None,
        };

        builder = builder
            .set_override_option("openai.api_key", api_key)
            .map_err(|e| ServerError::Config(e.to_string()))?
            .set_override_option("server.port", port.map(i64::from))
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let settings = builder
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            openai: OpenAiConfig {
                api_key: None,
                base_url: "https://api.openai.com/v1".to_string(),
                chat_model: "gpt-3.5-turbo".to_string(),
                embedding_model: "text-embedding-ada-002".to_string(),
                temperature: 0.1,
                timeout_secs: 60,
            },
            index: IndexConfig {
                chunk_size: 1024,
                chunk_overlap: 20,
                similarity_top_k: 2,
                embed_batch_size: 10,
                max_file_size_mb: 10,
            },
            agent: AgentConfig {
                enabled: true,
                max_iterations: 10,
                verbose: true,
                message_suffix: " Use a tool.".to_string(),
                tool_name: "zig_jackson_and_francis_scott_key_bridge_collapse".to_string(),
            },
            routing: RoutingConfig {
                mode: QueryMode::Router,
                single_directory: PathBuf::from("./data"),
                sources: vec![
                    SourceConfig {
                        name: "entertainment".to_string(),
                        title: "Zig Jackson - Wikipedia".to_string(),
                        directory: PathBuf::from("./data/entertainment"),
                        description: "Useful for questions about  Zig Jackson".to_string(),
                    },
                    SourceConfig {
                        name: "news".to_string(),
                        title: "The Francis Scott key Bridge collapse".to_string(),
                        directory: PathBuf::from("./data/news"),
                        description:
                            "Useful for questions about the Francis Scott key Bridge collapse"
                                .to_string(),
                    },
                ],
            },
        }
    }

    /// Returns the API key or the startup error the server aborts with.
    pub fn api_key(&self) -> Result<&str> {
        match self.openai.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ServerError::Config(
                "No OpenAI API key provided".to_string(),
            )),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.api_key()?;

        if self.server.port == 0 {
            return Err(ServerError::Config("port must be greater than 0".to_string()));
        }

        if self.index.chunk_size == 0 {
            return Err(ServerError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.index.chunk_overlap >= self.index.chunk_size {
            return Err(ServerError::Config(
                "chunk_overlap must be smaller than chunk_size".to_string(),
            ));
        }

        if self.index.similarity_top_k == 0 {
            return Err(ServerError::Config(
                "similarity_top_k must be greater than 0".to_string(),
            ));
        }

        if self.index.embed_batch_size == 0 {
            return Err(ServerError::Config(
                "embed_batch_size must be greater than 0".to_string(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(ServerError::Config(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if self.routing.mode == QueryMode::Router && self.routing.sources.is_empty() {
            return Err(ServerError::Config(
                "router mode requires at least one source".to_string(),
            ));
        }

        Ok(())
    }

    fn parse_port(raw: &str) -> Result<u16> {
        raw.trim()
            .parse::<u16>()
            .map_err(|e| ServerError::Config(format!("Invalid PORT '{}': {}", raw, e)))
    }
}
