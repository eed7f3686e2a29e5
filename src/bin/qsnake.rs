//! qsnake CLI - Tabular Q-learning agent that learns to play Snake
//!
//! This CLI provides a unified interface for:
//! - Training a value table (optionally several independent instances)
//! - Greedy playback of a trained table
//! - Inspecting a stored table

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qsnake")]
#[command(version, about = "Tabular Q-learning agent for Snake", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent by playing Snake
    Train(Box<qsnake::cli::commands::train::TrainArgs>),

    /// Play greedily with a trained table
    Play(qsnake::cli::commands::play::PlayArgs),

    /// Show statistics and a heat map for a value table
    Inspect(qsnake::cli::commands::inspect::InspectArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Train(args) => qsnake::cli::commands::train::execute(*args),
        Commands::Play(args) => qsnake::cli::commands::play::execute(args),
        Commands::Inspect(args) => qsnake::cli::commands::inspect::execute(args),
    }
}
