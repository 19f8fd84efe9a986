//! Error types

use crate::board::PlayerId;
use crate::grid::Point;
use thiserror::Error;

/// Errors raised while configuring a game or decoding board data
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("board size {0} out of range (1..=10)")]
    BoardSize(i64),

    #[error("{0} players configured; a game needs 2 to 4")]
    PlayerCount(usize),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("point {0} is off the board")]
    PointOutOfBounds(Point),

    #[error("points {0} and {1} are not adjacent")]
    NotAdjacent(Point, Point),

    #[error("unknown player id {0}")]
    UnknownPlayer(PlayerId),

    #[error("invalid strategy parameters: {0}")]
    InvalidParams(String),
}

/// A strategy could not reach a decision
///
/// Distinct from `Ok(None)`, which means the strategy has no move to offer.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("move delegation failed: {0}")]
    Delegation(#[source] Box<dyn std::error::Error + Send + Sync>),
}
