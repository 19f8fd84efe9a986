//! Play command - auto-play one game between bots
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_setup(), play_game(), report_result()
//! - Level 3: parse_seat(), build_registry()
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use csq_core::{play_out, Game, GamePhase, GameSetup, PlayerConfig, PlayerKind, StrategyRegistry};

use crate::render::render_board;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Game setup JSON file (overrides --size and --bots)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board size in cells per side
    #[arg(long, default_value = "6")]
    pub size: i8,

    /// Seats in turn order: strategy ids or move-server urls
    #[arg(long, value_delimiter = ',', default_value = "hard,greedy")]
    pub bots: Vec<String>,

    /// Timeout for move-server requests
    #[arg(long, default_value = "5000")]
    pub remote_timeout_ms: u64,

    /// Stop after this many decisions
    #[arg(long, default_value = "100000")]
    pub max_decisions: usize,

    /// Write the effective setup to this file
    #[arg(long, value_name = "FILE")]
    pub save_setup: Option<PathBuf>,

    /// Output result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Final standing of one seat
#[derive(Clone, Debug, Serialize)]
pub struct SeatResult {
    pub id: usize,
    pub name: String,
    pub color: String,
    pub score: usize,
    pub eliminated: bool,
}

/// Outcome of a played game
#[derive(Clone, Debug, Serialize)]
pub struct GameResult {
    pub board_size: i8,
    pub finished: bool,
    pub winner: Option<usize>,
    pub moves: usize,
    pub decisions: usize,
    pub seats: Vec<SeatResult>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the setup from a file or flags
/// 2. Play it out
/// 3. Report the result
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let setup = build_setup(&args)?;

    if let Some(path) = &args.save_setup {
        setup.save(path)?;
    }

    tracing::info!(
        "Playing {}x{} board with {} seats",
        setup.board_size,
        setup.board_size,
        setup.players.len()
    );

    let registry = build_registry(Duration::from_millis(args.remote_timeout_ms));
    let (game, result) = play_game(&setup, &registry, seed, args.max_decisions)?;

    report_result(&game, &result, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Setup from `--config`, otherwise from `--size` and `--bots`
pub fn build_setup(args: &PlayArgs) -> Result<GameSetup> {
    let setup = match &args.config {
        Some(path) => GameSetup::load(path)?,
        None => {
            let players = args
                .bots
                .iter()
                .enumerate()
                .map(|(i, entry)| parse_seat(i, entry))
                .collect();
            let setup = GameSetup::new(args.size, players);
            setup.validate().context("invalid game options")?;
            setup
        }
    };

    if setup.players.iter().any(|p| p.kind.is_human()) {
        bail!("play only drives bot and remote seats; the setup has a human seat");
    }
    Ok(setup)
}

/// Start and auto-play a game
pub fn play_game(
    setup: &GameSetup,
    registry: &StrategyRegistry,
    seed: Option<u64>,
    max_decisions: usize,
) -> Result<(Game, GameResult)> {
    let mut game = Game::new();
    game.start(setup)?;

    let mut rng = create_rng(seed);
    let decisions = play_out(&mut game, registry, &mut rng, max_decisions)?;

    if game.phase() != GamePhase::Finished {
        tracing::warn!(decisions, "decision limit reached before the game finished");
    }

    let result = summarize(&game, decisions);
    Ok((game, result))
}

/// Print the board and standings, or JSON
fn report_result(game: &Game, result: &GameResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("{}", render_board(game.board()));
    println!("=== Result ===");
    for seat in &result.seats {
        println!(
            "{} {:<20} {:>3}{}",
            seat.id + 1,
            seat.name,
            seat.score,
            if seat.eliminated { "  (eliminated)" } else { "" }
        );
    }
    match result.winner {
        Some(w) => println!("Winner: {}", result.seats[w].name),
        None if result.finished => println!("Draw"),
        None => println!("Unfinished after {} decisions", result.decisions),
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// `http(s)://..` seats are remote, anything else names a local strategy
pub fn parse_seat(index: usize, entry: &str) -> PlayerConfig {
    let entry = entry.trim();
    let kind = if entry.starts_with("http://") || entry.starts_with("https://") {
        PlayerKind::Remote {
            url: entry.to_string(),
            params: None,
        }
    } else {
        PlayerKind::bot(entry)
    };
    let label = if kind.strategy_id().is_some() { entry } else { "remote" };
    PlayerConfig::new(&format!("P{} ({})", index + 1, label), kind)
}

/// Default strategies plus remote seats
pub fn build_registry(remote_timeout: Duration) -> StrategyRegistry {
    let mut registry = StrategyRegistry::with_defaults();
    csq_remote::install(&mut registry, remote_timeout);
    registry
}

fn summarize(game: &Game, decisions: usize) -> GameResult {
    GameResult {
        board_size: game.board().size(),
        finished: game.phase() == GamePhase::Finished,
        winner: game.winner().map(|p| p.id),
        moves: game.history().len(),
        decisions,
        seats: game
            .players()
            .iter()
            .map(|p| SeatResult {
                id: p.id,
                name: p.name.clone(),
                color: p.color.clone(),
                score: p.score,
                eliminated: p.eliminated,
            })
            .collect(),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
