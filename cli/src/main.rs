//! CLI entrypoint for critique
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use critique_application::{NoObserver, RunCriticsInput, RunCriticsUseCase};
use critique_domain::{CriticPanel, Idea};
use critique_infrastructure::{ApiCredential, ConfigLoader, FileConfig, OpenAiGateway};
use critique_presentation::{AppState, ConsoleObserver, TranscriptFormatter, build_router};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "critique", version, about = "Run ideas past a panel of streaming critics")]
struct Cli {
    /// Path to a config file (merged over discovered configs)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Skip config files and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the relay HTTP endpoints
    Serve,
    /// Run the critic chain directly in the terminal
    Ask {
        /// The idea under critique
        idea: String,

        /// Use only the first N critics of the configured panel
        #[arg(long)]
        critics: Option<usize>,

        /// Suppress streaming output and print the finished transcript
        #[arg(short, long)]
        quiet: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    config.validate()?;

    // === Dependency Injection ===
    // The credential comes from the environment only; it never appears in
    // config files or logs.
    let credential = ApiCredential::from_env().context("OPENAI_API_KEY must be set")?;
    let gateway = Arc::new(OpenAiGateway::new(config.gateway.clone(), credential)?);

    match cli.command {
        Command::Serve => serve(config, gateway).await,
        Command::Ask {
            idea,
            critics,
            quiet,
        } => ask(config, gateway, idea, critics, quiet).await,
    }
}

async fn serve(config: FileConfig, gateway: Arc<OpenAiGateway>) -> Result<()> {
    let panel = config.critics.panel()?;
    let state = AppState::new(
        gateway.clone(),
        gateway,
        panel,
        config.server.framing_mode(),
    );
    let router = build_router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("critique relay listening on {addr}");
    axum::serve(listener, router).await?;
    Ok(())
}

async fn ask(
    config: FileConfig,
    gateway: Arc<OpenAiGateway>,
    idea: String,
    critics: Option<usize>,
    quiet: bool,
) -> Result<()> {
    let panel = config.critics.panel()?;
    let panel = match critics {
        Some(n) => CriticPanel::new(panel.iter().take(n).cloned().collect())?,
        None => panel,
    };
    let idea = Idea::new(idea)?;

    let use_case =
        RunCriticsUseCase::new(gateway).with_call_timeout(config.gateway.request_timeout());
    let input = RunCriticsInput::new(idea, panel);
    let cancel = CancellationToken::new();

    if quiet {
        let transcript = use_case
            .execute_with_observer(input, &NoObserver, &cancel)
            .await?;
        println!("{}", TranscriptFormatter::format(&transcript));
    } else {
        let observer = ConsoleObserver::new();
        use_case
            .execute_with_observer(input, &observer, &cancel)
            .await?;
    }
    Ok(())
}
