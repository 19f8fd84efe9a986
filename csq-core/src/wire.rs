//! JSON protocol shared by the move server and the remote client
//!
//! `POST /move` carries a `MoveRequest` and answers with a `MoveResponse`
//! (or `null` for "no move"). Field names are snake_case on the wire.

use crate::ai::BotContext;
use crate::board::{Board, Move, PlayerId};
use crate::error::CoreError;
use crate::game::Player;
use crate::grid::{is_adjacent, Edge, Point, Square, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::setup::{PlayerKind, PLAYER_COLORS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// MOVE REQUEST
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineEntry {
    pub from: Point,
    pub to: Point,
    pub player_id: PlayerId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkedPointsEntry {
    pub player_id: PlayerId,
    pub points: Vec<Point>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapturedSquareEntry {
    pub square: Square,
    pub player_id: PlayerId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: PlayerId,
    pub eliminated: bool,
    pub score: usize,
}

/// Full board snapshot sent to a move server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub board_size: i8,
    pub current_player_id: PlayerId,
    pub lines: Vec<LineEntry>,
    pub marked_points: Vec<MarkedPointsEntry>,
    pub captured_squares: Vec<CapturedSquareEntry>,
    pub players: Vec<PlayerEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_params: Option<Value>,
}

impl MoveRequest {
    /// Encode a strategy context
    pub fn from_context(ctx: &BotContext, bot_params: Option<Value>) -> Self {
        let board = &ctx.board;

        let mut lines: Vec<LineEntry> = board
            .edges()
            .map(|(edge, owner)| LineEntry {
                from: edge.low(),
                to: edge.high(),
                player_id: owner,
            })
            .collect();
        lines.sort_by_key(|l| (l.from, l.to));

        let marked_points = (0..board.player_count())
            .map(|p| MarkedPointsEntry {
                player_id: p,
                points: board
                    .marked(p)
                    .map(|set| set.iter().collect())
                    .unwrap_or_default(),
            })
            .collect();

        let mut captured_squares: Vec<CapturedSquareEntry> = board
            .captured()
            .map(|(square, owner)| CapturedSquareEntry {
                square,
                player_id: owner,
            })
            .collect();
        captured_squares.sort_by_key(|c| (c.square.row, c.square.col));

        let players = ctx
            .players
            .iter()
            .map(|p| PlayerEntry {
                id: p.id,
                eliminated: p.eliminated,
                score: p.score,
            })
            .collect();

        Self {
            board_size: board.size(),
            current_player_id: ctx.current_player,
            lines,
            marked_points,
            captured_squares,
            players,
            bot_params,
        }
    }

    /// Decode and validate into a strategy context
    ///
    /// Players must be listed in seat order with ids `0..n`. Lines must join
    /// adjacent in-bounds points and name a listed player.
    pub fn into_context(self) -> Result<BotContext, CoreError> {
        let size = self.board_size;
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(CoreError::BoardSize(size as i64));
        }
        let count = self.players.len();
        if !(2..=4).contains(&count) {
            return Err(CoreError::PlayerCount(count));
        }
        if let Some(bad) = self.players.iter().enumerate().find(|(i, p)| p.id != *i) {
            return Err(CoreError::UnknownPlayer(bad.1.id));
        }
        let known = |id: PlayerId| {
            if id < count {
                Ok(id)
            } else {
                Err(CoreError::UnknownPlayer(id))
            }
        };
        let on_board = |p: Point| {
            if p.in_bounds(size) {
                Ok(p)
            } else {
                Err(CoreError::PointOutOfBounds(p))
            }
        };
        let current = known(self.current_player_id)?;

        let mut board = Board::new(size, count);
        for line in self.lines {
            let (from, to) = (on_board(line.from)?, on_board(line.to)?);
            if !is_adjacent(from, to) {
                return Err(CoreError::NotAdjacent(from, to));
            }
            board.restore_edge(Edge::new(from, to), known(line.player_id)?);
        }
        for entry in self.marked_points {
            let player = known(entry.player_id)?;
            for p in entry.points {
                board.mark(player, on_board(p)?);
            }
        }
        for entry in self.captured_squares {
            if !entry.square.in_bounds(size) {
                return Err(CoreError::PointOutOfBounds(Point::new(
                    entry.square.row,
                    entry.square.col,
                )));
            }
            board.restore_capture(entry.square, known(entry.player_id)?);
        }

        let players = self
            .players
            .into_iter()
            .map(|p| Player {
                id: p.id,
                name: format!("Player {}", p.id + 1),
                color: PLAYER_COLORS[p.id % PLAYER_COLORS.len()].1.to_string(),
                kind: PlayerKind::Human,
                eliminated: p.eliminated,
                score: p.score,
            })
            .collect();

        Ok(BotContext {
            board,
            players,
            current_player: current,
        })
    }

    /// Strategy id requested through `bot_params.bot_id`, if any
    pub fn bot_id(&self) -> Option<&str> {
        self.bot_params.as_ref()?.get("bot_id")?.as_str()
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// Chosen line; the body is `null` when there is no move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub from: Point,
    pub to: Point,
}

impl From<Move> for MoveResponse {
    fn from(mv: Move) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
        }
    }
}

impl From<MoveResponse> for Move {
    fn from(r: MoveResponse) -> Self {
        Move::new(r.from, r.to)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// One tunable advertised by `GET /bot-params`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub label: String,
    pub param_type: String,
    pub default_value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub description: String,
}

impl ParamDescriptor {
    /// Integer parameter with an inclusive range
    pub fn int(name: &str, label: &str, default: u64, min: u64, max: u64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            param_type: "int".to_string(),
            default_value: Value::from(default),
            min: Some(min as f64),
            max: Some(max as f64),
            description: description.to_string(),
        }
    }

    /// Free-form choice among strategy ids
    pub fn choice(name: &str, label: &str, default: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            param_type: "string".to_string(),
            default_value: Value::from(default),
            min: None,
            max: None,
            description: description.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotParamsResponse {
    pub params: Vec<ParamDescriptor>,
}
