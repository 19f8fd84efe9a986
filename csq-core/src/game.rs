//! Game state machine: turns, captures, bonus turns, eliminations, scoring

use crate::ai::BotContext;
use crate::board::{Board, Move, PlayerId};
use crate::error::{CoreError, StrategyError};
use crate::grid::{is_adjacent, starting_corners, Edge, Point, Square, DEFAULT_BOARD_SIZE};
use crate::setup::{GameSetup, PlayerKind};
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game lifecycle; `Finished` is terminal until the next `start`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Setup,
    Playing,
    Finished,
}

/// A seated player
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    pub kind: PlayerKind,
    pub eliminated: bool,
    /// Cached count of squares owned; recomputed after every mutation
    pub score: usize,
}

/// One entry of the move log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: PlayerId,
    pub from: Point,
    pub to: Point,
    pub captured: Vec<Square>,
}

/// Notifications for the presentation layer, drained with `take_events`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Started { board_size: i8, players: usize },
    MovePlayed(MoveRecord),
    TurnChanged { player: PlayerId },
    PlayerEliminated { player: PlayerId },
    SurvivorSweep { player: PlayerId, squares: usize },
    Finished { winner: Option<PlayerId> },
    EdgeEdited { from: Point, to: Point, owner: Option<PlayerId> },
    Reset,
}

/// Permission to compute one move for a non-human player
///
/// Only one ticket is outstanding at a time. Starting a new game, resetting,
/// or any move landing in between makes the ticket stale.
#[derive(Clone, Debug)]
pub struct DecisionTicket {
    generation: u64,
    turn: usize,
    pub player: PlayerId,
    pub kind: PlayerKind,
    pub context: BotContext,
}

/// Outcome of handing a computed decision back to the game
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Move executed
    Applied { captures: usize },
    /// No move offered; turn advanced
    Passed,
    /// Move was not legal; nothing changed
    Rejected(Move),
    /// Strategy failed; nothing changed
    Failed,
    /// Ticket outlived its game or turn; ignored
    Stale,
}

// ============================================================================
// GAME
// ============================================================================

/// Live game (single writer)
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    players: Vec<Player>,
    current: usize,
    phase: GamePhase,
    history: Vec<MoveRecord>,
    edit_mode: bool,
    selected: Option<Point>,
    last_move: Option<Move>,
    last_captures: Vec<Square>,
    winner: Option<PlayerId>,
    /// Bumped by start/reset/reseating to invalidate outstanding tickets
    generation: u64,
    decision_in_flight: bool,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::new(DEFAULT_BOARD_SIZE, 0),
            players: Vec::new(),
            current: 0,
            phase: GamePhase::Setup,
            history: Vec::new(),
            edit_mode: false,
            selected: None,
            last_move: None,
            last_captures: Vec::new(),
            winner: None,
            generation: 0,
            decision_in_flight: false,
            events: Vec::new(),
        }
    }

    /// Build a fresh game from `setup`, replacing whatever was running
    pub fn start(&mut self, setup: &GameSetup) -> Result<(), CoreError> {
        setup.validate()?;
        self.clear();

        let size = setup.board_size;
        self.board = Board::new(size, setup.players.len());
        self.players = setup
            .players
            .iter()
            .enumerate()
            .map(|(id, cfg)| Player {
                id,
                name: cfg.name.clone(),
                color: setup.color_for(id),
                kind: cfg.kind.clone(),
                eliminated: false,
                score: 0,
            })
            .collect();

        for (id, corner) in starting_corners(size, self.players.len()).into_iter().enumerate() {
            self.board.mark(id, corner);
        }

        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started {
            board_size: size,
            players: self.players.len(),
        });
        tracing::debug!(size, players = self.players.len(), "game started");
        Ok(())
    }

    /// Back to an empty setup phase
    pub fn reset(&mut self) {
        self.clear();
        self.players.clear();
        self.board = Board::new(DEFAULT_BOARD_SIZE, 0);
        self.events.push(GameEvent::Reset);
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.decision_in_flight = false;
        self.current = 0;
        self.phase = GamePhase::Setup;
        self.history.clear();
        self.edit_mode = false;
        self.selected = None;
        self.last_move = None;
        self.last_captures.clear();
        self.winner = None;
        self.events.clear();
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current)
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.eliminated)
    }

    /// (player id, score) for every seat
    pub fn scores(&self) -> Vec<(PlayerId, usize)> {
        self.players.iter().map(|p| (p.id, p.score)).collect()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn last_captures(&self) -> &[Square] {
        &self.last_captures
    }

    /// Unique top scorer; `None` while playing or on a tie
    pub fn winner(&self) -> Option<&Player> {
        self.winner.and_then(|id| self.players.get(id))
    }

    pub fn is_bot_thinking(&self) -> bool {
        self.decision_in_flight
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn selected_point(&self) -> Option<Point> {
        self.selected
    }

    /// Drain queued notifications
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_valid_move(&self, mv: Move) -> bool {
        self.phase == GamePhase::Playing
            && self
                .current_player()
                .is_some_and(|p| self.board.is_valid_move(mv, p.id))
    }

    pub fn valid_moves_for_current(&self) -> Vec<Move> {
        match self.current_player() {
            Some(p) if self.phase == GamePhase::Playing => self.board.valid_moves(p.id),
            _ => Vec::new(),
        }
    }

    /// Immutable snapshot for move selection
    pub fn bot_context(&self) -> BotContext {
        BotContext {
            board: self.board.clone(),
            players: self.players.clone(),
            current_player: self.current,
        }
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// Play `mv` for the current player
    ///
    /// No-op (returns false) unless the game is running and the move is
    /// legal for the current player.
    pub fn execute_move(&mut self, mv: Move) -> bool {
        if !self.is_valid_move(mv) {
            return false;
        }
        let player = self.current;

        let captures = self.board.apply(mv, player);
        let record = MoveRecord {
            player,
            from: mv.from,
            to: mv.to,
            captured: captures.clone(),
        };
        self.history.push(record.clone());
        self.events.push(GameEvent::MovePlayed(record));
        self.last_move = Some(mv);
        self.last_captures = captures;
        self.selected = None;
        self.update_scores();

        if !self.last_captures.is_empty() && self.board.has_valid_move(player) {
            tracing::debug!(player, captures = self.last_captures.len(), "bonus turn");
            return true;
        }

        self.advance_turn();
        true
    }

    /// Human click handling: select a source point, then a target
    pub fn select_point(&mut self, point: Point) {
        if self.phase != GamePhase::Playing || self.edit_mode {
            return;
        }
        let Some(player) = self.current_player() else {
            return;
        };
        if !player.kind.is_human() {
            return;
        }
        let id = player.id;
        let owns = self.board.is_marked(id, point);

        match self.selected {
            Some(sel) if sel == point => self.selected = None,
            Some(sel) => {
                let mv = Move::new(sel, point);
                if self.board.is_valid_move(mv, id) {
                    self.execute_move(mv);
                } else if owns {
                    self.selected = Some(point);
                } else {
                    self.selected = None;
                }
            }
            None => {
                let has_moves = self
                    .board
                    .valid_moves(id)
                    .iter()
                    .any(|m| m.from == point);
                if owns && has_moves {
                    self.selected = Some(point);
                }
            }
        }
    }

    fn update_scores(&mut self) {
        for p in &mut self.players {
            p.score = self.board.score(p.id);
        }
    }

    // ========================================================================
    // TURN ORDER
    // ========================================================================

    fn advance_turn(&mut self) {
        self.check_eliminations();

        if self.board.captured_count() >= self.board.total_squares() {
            self.end_game();
            return;
        }

        let active: Vec<PlayerId> = self.active_players().map(|p| p.id).collect();
        match active.as_slice() {
            [] => {
                self.end_game();
                return;
            }
            [survivor] => {
                self.award_last_survivor(*survivor);
                self.end_game();
                return;
            }
            _ => {}
        }

        let n = self.players.len();
        let mut attempts = 0;
        loop {
            self.current = (self.current + 1) % n;
            attempts += 1;
            if !self.players[self.current].eliminated || attempts >= n {
                break;
            }
        }
        if self.players[self.current].eliminated {
            self.end_game();
            return;
        }

        self.events.push(GameEvent::TurnChanged {
            player: self.current,
        });
    }

    fn check_eliminations(&mut self) {
        for i in 0..self.players.len() {
            if self.players[i].eliminated || self.board.has_valid_move(i) {
                continue;
            }
            self.players[i].eliminated = true;
            self.events.push(GameEvent::PlayerEliminated { player: i });
            tracing::debug!(player = i, "player eliminated");
        }
    }

    fn award_last_survivor(&mut self, survivor: PlayerId) {
        let swept = self.board.sweep_uncaptured(survivor);
        self.update_scores();
        self.events.push(GameEvent::SurvivorSweep {
            player: survivor,
            squares: swept.len(),
        });
        tracing::debug!(player = survivor, squares = swept.len(), "last survivor sweep");
    }

    fn end_game(&mut self) {
        self.phase = GamePhase::Finished;
        self.selected = None;
        self.decision_in_flight = false;

        let best = self.players.iter().map(|p| p.score).max().unwrap_or(0);
        let mut leaders = self.players.iter().filter(|p| p.score == best);
        self.winner = match (leaders.next(), leaders.next()) {
            (Some(p), None) => Some(p.id),
            _ => None,
        };

        self.events.push(GameEvent::Finished {
            winner: self.winner,
        });
        tracing::debug!(winner = ?self.winner, scores = ?self.scores(), "game finished");
    }

    // ========================================================================
    // EDIT MODE
    // ========================================================================

    pub fn toggle_edit_mode(&mut self) {
        self.edit_mode = !self.edit_mode;
        self.selected = None;
    }

    /// Add or remove the edge `from`-`to` directly
    ///
    /// Removing an edge uncaptures any square it leaves unfilled; adding one
    /// marks both ends for `player` and captures what it fills.
    pub fn edit_toggle_edge(&mut self, from: Point, to: Point, player: PlayerId) -> bool {
        if !self.edit_mode || self.phase != GamePhase::Playing {
            return false;
        }
        let size = self.board.size();
        if !is_adjacent(from, to) || !from.in_bounds(size) || !to.in_bounds(size) {
            return false;
        }

        let edge = Edge::new(from, to);
        let owner = if self.board.has_edge(edge) {
            self.board.remove_edge(edge);
            None
        } else {
            if player >= self.players.len() {
                return false;
            }
            self.board.insert_edge(edge, player);
            Some(player)
        };

        self.update_scores();
        self.events.push(GameEvent::EdgeEdited { from, to, owner });
        true
    }

    /// Switch a seat between human (`None`) and a local bot strategy
    pub fn assign_bot(&mut self, index: usize, strategy: Option<&str>) {
        let Some(player) = self.players.get_mut(index) else {
            return;
        };
        player.kind = match strategy {
            Some(id) => PlayerKind::bot(id),
            None => PlayerKind::Human,
        };
        if index == self.current {
            self.generation += 1;
            self.decision_in_flight = false;
        }
    }

    // ========================================================================
    // DECISIONS
    // ========================================================================

    /// Claim the single move-selection slot for a non-human current player
    pub fn begin_decision(&mut self) -> Option<DecisionTicket> {
        if self.phase != GamePhase::Playing || self.decision_in_flight {
            return None;
        }
        let player = self.current_player()?;
        if player.kind.is_human() {
            return None;
        }
        let ticket = DecisionTicket {
            generation: self.generation,
            turn: self.history.len(),
            player: player.id,
            kind: player.kind.clone(),
            context: self.bot_context(),
        };
        self.decision_in_flight = true;
        Some(ticket)
    }

    /// Apply a computed decision if its ticket is still current
    pub fn resolve_decision(
        &mut self,
        ticket: DecisionTicket,
        decision: Result<Option<Move>, StrategyError>,
    ) -> Resolution {
        if ticket.generation != self.generation {
            return Resolution::Stale;
        }
        self.decision_in_flight = false;
        if ticket.turn != self.history.len()
            || self.phase != GamePhase::Playing
            || ticket.player != self.current
        {
            return Resolution::Stale;
        }

        match decision {
            Ok(Some(mv)) => {
                if self.execute_move(mv) {
                    Resolution::Applied {
                        captures: self.last_captures.len(),
                    }
                } else {
                    tracing::warn!(player = ticket.player, ?mv, "rejected illegal decision");
                    Resolution::Rejected(mv)
                }
            }
            Ok(None) => {
                tracing::debug!(player = ticket.player, "no move offered, passing");
                self.advance_turn();
                Resolution::Passed
            }
            Err(e) => {
                tracing::warn!(player = ticket.player, error = %e, "decision failed");
                Resolution::Failed
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
