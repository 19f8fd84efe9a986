//! Match command - many bot games with rotating seats
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_lineups(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use csq_core::{GameSetup, StrategyRegistry};

use crate::play::{build_registry, parse_seat, play_game};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Strategies (or move-server urls) taking part, 2 to 4
    #[arg(long, value_delimiter = ',', default_value = "hard,greedy")]
    pub bots: Vec<String>,

    /// Board size in cells per side
    #[arg(long, default_value = "5")]
    pub size: i8,

    /// Number of games (seats rotate every game)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Play games one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Timeout for move-server requests
    #[arg(long, default_value = "5000")]
    pub remote_timeout_ms: u64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    /// Entrant index sitting in each seat
    seating: Vec<usize>,
    /// Entrant index of the winner
    winner: Option<usize>,
    /// Squares per entrant index
    squares: Vec<usize>,
    moves: usize,
}

/// Aggregated results per entrant
#[derive(Clone, Debug, Serialize)]
struct EntrantStats {
    entrant: String,
    wins: usize,
    win_rate: f32,
    avg_squares: f32,
}

#[derive(Clone, Debug, Serialize)]
struct MatchResults {
    total_games: usize,
    draws: usize,
    entrants: Vec<EntrantStats>,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Check the entrants
/// 2. Play every game (in parallel unless --sequential)
/// 3. Report per-entrant results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    validate_args(&args)?;

    tracing::info!(
        "Starting match: {} on {}x{} ({} games)",
        args.bots.join(" vs "),
        args.size,
        args.size,
        args.games
    );

    let registry = build_registry(Duration::from_millis(args.remote_timeout_ms));
    let results = play_match(&args, &registry, seed.unwrap_or(42))?;

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn validate_args(args: &MatchArgs) -> Result<()> {
    if !(2..=4).contains(&args.bots.len()) {
        bail!("a match needs 2 to 4 entrants, got {}", args.bots.len());
    }
    if args.games == 0 {
        bail!("--games must be at least 1");
    }
    Ok(())
}

/// Play all games
fn play_match(args: &MatchArgs, registry: &StrategyRegistry, base_seed: u64) -> Result<MatchResults> {
    let progress = ProgressBar::new(args.games as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let play = |game_index: usize| {
        let seed = base_seed.wrapping_add(game_index as u64);
        let record = play_single_game(args, registry, game_index, seed);
        progress.inc(1);
        record
    };

    let games: Result<Vec<GameRecord>> = if args.sequential {
        (0..args.games).map(play).collect()
    } else {
        (0..args.games).into_par_iter().map(play).collect()
    };
    progress.finish_and_clear();

    Ok(compute_statistics(&args.bots, games?))
}

fn report_results(results: &MatchResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Seat entrant `(seat + game_index) % n` in each seat so every entrant
/// starts from every corner
fn seating(entrants: usize, game_index: usize) -> Vec<usize> {
    (0..entrants).map(|seat| (seat + game_index) % entrants).collect()
}

fn play_single_game(
    args: &MatchArgs,
    registry: &StrategyRegistry,
    game_index: usize,
    seed: u64,
) -> Result<GameRecord> {
    let seating = seating(args.bots.len(), game_index);
    let players = seating
        .iter()
        .enumerate()
        .map(|(seat, &entrant)| parse_seat(seat, &args.bots[entrant]))
        .collect();
    let setup = GameSetup::new(args.size, players);
    setup.validate()?;

    let (game, result) = play_game(&setup, registry, Some(seed), usize::MAX)?;
    tracing::debug!(game = game_index + 1, winner = ?result.winner, moves = result.moves, "game done");

    let mut squares = vec![0; args.bots.len()];
    for seat in &result.seats {
        squares[seating[seat.id]] = seat.score;
    }

    Ok(GameRecord {
        game_number: game_index + 1,
        winner: result.winner.map(|seat| seating[seat]),
        seating,
        squares,
        moves: game.history().len(),
    })
}

fn compute_statistics(entrants: &[String], games: Vec<GameRecord>) -> MatchResults {
    let total = games.len();
    let draws = games.iter().filter(|g| g.winner.is_none()).count();

    let entrants = entrants
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let wins = games.iter().filter(|g| g.winner == Some(i)).count();
            let squares: usize = games.iter().map(|g| g.squares[i]).sum();
            EntrantStats {
                entrant: name.clone(),
                wins,
                win_rate: ratio(wins, total),
                avg_squares: if total == 0 {
                    0.0
                } else {
                    squares as f32 / total as f32
                },
            }
        })
        .collect();

    MatchResults {
        total_games: total,
        draws,
        entrants,
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn ratio(part: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        part as f32 / total as f32
    }
}

fn print_text_results(results: &MatchResults) {
    println!("\n=== Match Results ===");
    println!("Total games: {}", results.total_games);
    for e in &results.entrants {
        println!(
            "{:<24} wins {:>4} ({:.1}%)  avg squares {:.2}",
            e.entrant,
            e.wins,
            e.win_rate * 100.0,
            e.avg_squares
        );
    }
    println!(
        "Draws: {} ({:.1}%)",
        results.draws,
        ratio(results.draws, results.total_games) * 100.0
    );
}

// ============================================================================
// TESTS
// ============================================================================
