//! CSQ CLI - Command-line interface
//!
//! Commands:
//! - play: auto-play one configured game and print the final board
//! - match: many bot-vs-bot games in parallel with win statistics
//! - serve: start the move server

mod match_cmd;
mod play;
mod render;
mod server;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "csq")]
#[command(about = "Connect the Squares engine, bots and move server")]
struct Cli {
    /// Seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game between bots
    Play(play::PlayArgs),
    /// Play many games and report per-strategy results
    Match(match_cmd::MatchArgs),
    /// Start the move server
    Serve(server::ServerArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Serve(args) => server::run(args),
    }
}
