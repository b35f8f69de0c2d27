// crates/ecotrace-cli/src/main.rs
//
// CLI entrypoint for EcoTrace.
//
// Runs the multi-model consensus pipeline over a batch of collected model
// outputs and browses the per-user analysis history kept in RocksDB.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use commands::analyze::AnalyzeCmd;
use commands::history::HistoryCmd;

use ecotrace_consensus::ConsensusEngine;
use ecotrace_core::AnalysisStore;
use ecotrace_signals::TextHeuristicAnalyzer;
use ecotrace_store::RocksAnalysisStore;

use config::CliConfig;
use output::OutputFormat;

/// EcoTrace CLI: multi-model consensus for content authenticity.
#[derive(Parser, Debug)]
#[command(
    name = "ecotrace",
    version = "0.1.0",
    about = "EcoTrace CLI: combine AI-detection model verdicts into one calibrated analysis"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.ecotrace/config.toml")]
    config: String,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a batch of raw model outputs.
    Analyze(AnalyzeCmd),

    /// Analysis history: list, get, delete.
    #[command(subcommand)]
    History(HistoryCmd),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = config::expand_tilde(&cli.config);
    let (cli_config, load_error) = match CliConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (CliConfig::default(), Some(e.to_string())),
    };

    // Logs go to stderr so JSON on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli_config.log_level)),
        )
        .init();

    match load_error {
        None => tracing::debug!("Loaded configuration from {}", config_path),
        Some(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            config_path,
            e
        ),
    }

    let engine = ConsensusEngine::new(cli_config.consensus.clone())?;

    match &cli.command {
        Commands::Analyze(cmd) => {
            let analyzer = TextHeuristicAnalyzer::new();
            let store = match &cmd.user {
                Some(_) => Some(open_store(&cli_config)?),
                None => None,
            };
            let store_ref = store.as_ref().map(|s| s as &dyn AnalysisStore);
            commands::analyze::run(cmd, &engine, &analyzer, store_ref, cli.format).await?
        }
        Commands::History(cmd) => {
            let store = open_store(&cli_config)?;
            commands::history::run(cmd, &store, cli.format).await?
        }
    }

    Ok(())
}

/// Open the analysis database, creating the data directory if needed.
fn open_store(cli_config: &CliConfig) -> Result<RocksAnalysisStore, Box<dyn std::error::Error>> {
    let db_path = cli_config.analyses_db_path();
    std::fs::create_dir_all(&db_path)?;
    let store = RocksAnalysisStore::open(&db_path)?;
    Ok(store)
}
