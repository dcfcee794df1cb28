//! azd-mcp: command-line access to the azd agent tool catalog
//!
//! Run with:
//! - `azd-mcp validate ./azure.yaml`
//! - `azd-mcp tools`
//! - `azd-mcp call azd_yaml_schema`
//! - `azd-mcp call validate_azure_yaml '{"path": "./azure.yaml"}'`

mod config;

use azd_mcp_tools::schema::{CandidateList, SchemaCandidate};
use azd_mcp_tools::{SchemaValidator, ToolRegistry, ValidationOutcome, ValidatorConfig, catalog};
use clap::{Parser, Subcommand};
use config::Config;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "azd-mcp", version, about = "Tools for preparing azd projects")]
struct Cli {
    /// Remote schema fetch timeout in seconds (overrides `AZD_SCHEMA_FETCH_TIMEOUT_SECS`)
    #[arg(long, global = true, value_name = "SECS")]
    schema_timeout: Option<u64>,

    /// Log filter (overrides `AZD_MCP_LOG`; `RUST_LOG` takes precedence)
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,

    /// Candidate schema, in priority order; replaces the published stable/alpha pair.
    /// `file:` identifiers may be relative to the working directory.
    #[arg(long = "schema", global = true, value_name = "LABEL=IDENTIFIER", value_parser = parse_candidate)]
    schemas: Vec<SchemaCandidate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate an azure.yaml file against the published schemas
    Validate {
        /// Path to the azure.yaml file
        path: PathBuf,
    },
    /// List registered tools with their descriptions
    Tools,
    /// Execute one tool and print its output
    Call {
        /// Tool name
        tool: String,
        /// JSON input for the tool
        #[arg(default_value = "{}")]
        input: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(secs) = cli.schema_timeout.filter(|secs| *secs > 0) {
        config.schema_fetch_timeout_secs = secs;
    }
    if let Some(level) = cli.log {
        config.log_level = level;
    }

    init_tracing(&config.log_level);

    match run(cli.command, cli.schemas, &config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Command,
    schemas: Vec<SchemaCandidate>,
    config: &Config,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut validator_config =
        ValidatorConfig::default().with_fetch_timeout(config.schema_fetch_timeout());
    if !schemas.is_empty() {
        validator_config = validator_config.with_candidates(CandidateList::new(schemas)?);
    }
    let validator = Arc::new(SchemaValidator::from_config(validator_config)?);

    match command {
        Command::Validate { path } => {
            let path = std::path::absolute(&path)?;
            let outcome = validate(&validator, &path).await;
            println!("{}", outcome.render());
            Ok(if outcome.is_match() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Tools => {
            list_tools(&catalog(validator));
            Ok(ExitCode::SUCCESS)
        }
        Command::Call { tool, input } => {
            let registry = catalog(validator);
            match registry.execute(&tool, input).await {
                Ok(output) => {
                    println!("{output}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn parse_candidate(value: &str) -> Result<SchemaCandidate, String> {
    let (label, identifier) = value
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=IDENTIFIER, got '{value}'"))?;
    if label.is_empty() {
        return Err("schema label must not be empty".to_string());
    }
    SchemaCandidate::parse(identifier, label).map_err(|e| e.to_string())
}

/// Validate `path`, cancelling on Ctrl-C
async fn validate(validator: &SchemaValidator, path: &Path) -> ValidationOutcome {
    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling validation");
            watcher.cancel();
        }
    });

    info!(path = %path.display(), "Validating");
    let outcome = validator.validate_with_cancellation(path, &cancel).await;
    signal.abort();
    outcome
}

fn list_tools(registry: &ToolRegistry) {
    let tools = registry.get_tools();
    let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for tool in tools {
        let summary = tool.description.lines().next().unwrap_or_default();
        println!("{:width$}  {summary}", tool.name);
    }
}

fn init_tracing(fallback: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
