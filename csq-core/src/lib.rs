//! CSQ Core - Game engine and AI
//!
//! This crate provides the core game logic for Connect the Squares:
//! - Grid geometry (points, edges, squares, adjacency)
//! - Board state, move legality and capture detection
//! - Game state machine (bonus turns, elimination, last-survivor sweep)
//! - Heuristic scoring, chain simulation and endgame minimax
//! - Pluggable move strategies and the JSON move protocol

pub mod grid;
pub mod board;
pub mod error;
pub mod setup;
pub mod game;
pub mod chain;
pub mod eval;
pub mod search;
pub mod ai;
pub mod wire;

// Re-exports for convenient access
pub use grid::{Point, Edge, Square, MIN_BOARD_SIZE, MAX_BOARD_SIZE, DEFAULT_BOARD_SIZE};
pub use board::{Board, Move, PlayerId};
pub use error::{CoreError, StrategyError};
pub use setup::{GameSetup, PlayerConfig, PlayerKind, PLAYER_COLORS};
pub use game::{Game, GamePhase, GameEvent, Player, MoveRecord, DecisionTicket, Resolution};
pub use eval::Heuristics;
pub use ai::{
    play_out, BotContext, GreedyBot, HardBot, HardConfig, RandomBot, Strategy, StrategyRegistry,
};
pub use wire::{MoveRequest, MoveResponse};
