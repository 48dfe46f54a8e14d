// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use llama_server::utils::logging::{format_error, format_info, format_success, init_logger};
use llama_server::{Config, HealthStatus, QueryMode, QueryPipeline, Validator, server};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "llama_server")]
#[command(version)]
#[command(about = "Question answering over local documents with a router query engine and a tool-calling agent", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = llama_server::config::DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        #[arg(short, long)]
        port: Option<u16>,

        /// `router` or `single`
        #[arg(short, long)]
        mode: Option<QueryMode>,
    },

    /// Answer one query from the command line and exit
    Query {
        query: String,

        #[arg(short, long)]
        mode: Option<QueryMode>,
    },

    /// Check the API key and the configured document directories
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);

    let mut config = load_config(&cli.config)?;

    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        mode: None,
    }) {
        Commands::Serve { port, mode } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(mode) = mode {
                config.routing.mode = mode;
            }
            cmd_serve(config).await?;
        }
        Commands::Query { query, mode } => {
            if let Some(mode) = mode {
                config.routing.mode = mode;
            }
            cmd_query(config, &query).await?;
        }
        Commands::Health => {
            cmd_health(config)?;
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    info!("Loading configuration from: {}", path.display());

    let config = if path.exists() {
        Config::load(Some(path))
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            path.display()
        );
        Config::load(None)
    };

    match config {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            Err(e).context("Failed to load configuration")
        }
    }
}

async fn cmd_serve(config: Config) -> Result<()> {
    config.validate()?;
    Validator::validate_port(config.server.port)?;

    info!(
        "Starting server in {} mode with model {}",
        config.routing.mode, config.openai.chat_model
    );

    let pipeline = QueryPipeline::from_config(config).context("Failed to create OpenAI client")?;
    server::serve(pipeline).await.context("Server error")?;

    Ok(())
}

async fn cmd_query(config: Config, query: &str) -> Result<()> {
    config.validate()?;
    let pipeline = QueryPipeline::from_config(config).context("Failed to create OpenAI client")?;

    println!("{}", format_info(&format!("Query: {}", query)));
    let start = Instant::now();

    match pipeline.answer(query).await {
        Ok(answer) => {
            let elapsed = start.elapsed().as_secs_f64();
            println!("{}", format_success(&format!("Answered in {:.2}s", elapsed)));
            println!("\n{}", answer);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            Err(e).context("Query failed")
        }
    }
}

fn cmd_health(config: Config) -> Result<()> {
    let pipeline = QueryPipeline::from_config(config).context("Failed to create OpenAI client")?;
    let report = pipeline.health_report();

    println!("{}", report.format());

    if report.overall_status == HealthStatus::Unhealthy {
        return Err(anyhow::anyhow!("Health check failed"));
    }

    Ok(())
}
