//! Endgame minimax with alpha-beta pruning
//!
//! Every node works on its own clone of the board. Captures keep the same
//! mover at the same depth (bonus turn); otherwise play passes to the next
//! seat that still has a move. The score is the root player's squares minus
//! everyone else's, so opponents are treated as one minimizing coalition.

use crate::board::{Board, Move, PlayerId};
use std::time::Instant;

/// Search bounds; hitting any of them truncates to the static score
#[derive(Clone, Debug)]
pub struct SearchLimits {
    /// Plies (turn changes) before the static score is used
    pub max_depth: u32,
    /// Nodes per root move
    pub max_nodes: u64,
    /// Wall-clock deadline shared by all root moves
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    /// No node or time bound
    pub fn unbounded(max_depth: u32) -> Self {
        Self {
            max_depth,
            max_nodes: u64::MAX,
            deadline: None,
        }
    }
}

/// Who moves after a simulated move
enum Turn {
    Same,
    Next(PlayerId),
    Over,
}

/// Alpha-beta searcher for one decision
pub struct Minimax<'a> {
    root: PlayerId,
    /// Non-eliminated seats in turn order
    seats: &'a [PlayerId],
    limits: SearchLimits,
    nodes: u64,
    pub total_nodes: u64,
    pub truncated: bool,
}

impl<'a> Minimax<'a> {
    pub fn new(root: PlayerId, seats: &'a [PlayerId], limits: SearchLimits) -> Self {
        Self {
            root,
            seats,
            limits,
            nodes: 0,
            total_nodes: 0,
            truncated: false,
        }
    }

    /// Best of `moves` for the root player; first maximum wins ties
    pub fn best_move(&mut self, board: &Board, moves: &[Move]) -> Option<(Move, i32)> {
        let mut best: Option<(Move, i32)> = None;

        for &mv in moves {
            self.nodes = 0;
            let score = self.child_value(
                board,
                mv,
                self.root,
                self.limits.max_depth,
                i32::MIN,
                i32::MAX,
            );
            self.total_nodes += self.nodes;

            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
        }

        tracing::debug!(
            nodes = self.total_nodes,
            truncated = self.truncated,
            score = ?best.map(|(_, s)| s),
            "minimax finished"
        );
        best
    }

    fn exhausted(&mut self) -> bool {
        let out_of_nodes = self.nodes >= self.limits.max_nodes;
        let out_of_time = self.limits.deadline.is_some_and(|d| Instant::now() >= d);
        if out_of_nodes || out_of_time {
            self.truncated = true;
        }
        out_of_nodes || out_of_time
    }

    fn search(
        &mut self,
        board: &Board,
        mover: PlayerId,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;
        if depth == 0 || self.exhausted() {
            return self.evaluate(board);
        }

        let moves = board.valid_moves(mover);
        if moves.is_empty() {
            return self.evaluate(board);
        }

        let maximizing = mover == self.root;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            let value = self.child_value(board, mv, mover, depth, alpha, beta);
            if maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }
            if alpha >= beta {
                break;
            }
        }

        best
    }

    fn child_value(
        &mut self,
        board: &Board,
        mv: Move,
        mover: PlayerId,
        depth: u32,
        alpha: i32,
        beta: i32,
    ) -> i32 {
        let mut sim = board.clone();
        let captured = sim.apply(mv, mover).len();

        match self.next_turn(&mut sim, mover, captured) {
            Turn::Same => self.search(&sim, mover, depth, alpha, beta),
            Turn::Next(next) => self.search(&sim, next, depth.saturating_sub(1), alpha, beta),
            Turn::Over => self.evaluate(&sim),
        }
    }

    /// Turn advance on a simulated board, including the last-survivor sweep
    fn next_turn(&self, sim: &mut Board, mover: PlayerId, captured: usize) -> Turn {
        if captured > 0 && sim.has_valid_move(mover) {
            return Turn::Same;
        }
        if sim.captured_count() >= sim.total_squares() {
            return Turn::Over;
        }

        let active: Vec<PlayerId> = self
            .seats
            .iter()
            .copied()
            .filter(|&p| sim.has_valid_move(p))
            .collect();

        match active.as_slice() {
            [] => Turn::Over,
            [survivor] => {
                sim.sweep_uncaptured(*survivor);
                Turn::Over
            }
            _ => {
                let start = self.seats.iter().position(|&p| p == mover).unwrap_or(0);
                let n = self.seats.len();
                (1..=n)
                    .map(|step| self.seats[(start + step) % n])
                    .find(|p| active.contains(p))
                    .map_or(Turn::Over, Turn::Next)
            }
        }
    }

    /// Root player's squares minus everyone else's
    fn evaluate(&self, board: &Board) -> i32 {
        board
            .captured()
            .map(|(_, owner)| if owner == self.root { 1 } else { -1 })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Point;

    fn mv(r1: i8, c1: i8, r2: i8, c2: i8) -> Move {
        Move::new(Point::new(r1, c1), Point::new(r2, c2))
    }

    /// 1x1 board with three borders drawn; player 0 to move
    fn one_left() -> Board {
        let mut board = Board::new(1, 2);
        board.mark(0, Point::new(0, 0));
        board.mark(1, Point::new(1, 1));
        for m in [mv(0, 0, 0, 1), mv(0, 1, 1, 1), mv(1, 1, 1, 0)] {
            board.apply(m, 0);
        }
        board
    }

    #[test]
    fn test_takes_last_square() {
        let board = one_left();
        let moves = board.valid_moves(0);
        let seats = [0, 1];
        let mut search = Minimax::new(0, &seats, SearchLimits::unbounded(8));
        let (best, score) = search.best_move(&board, &moves).unwrap();
        assert_eq!(best.edge(), mv(1, 0, 0, 0).edge());
        assert_eq!(score, 1);
        assert!(!search.truncated);
    }

    #[test]
    fn test_deterministic() {
        let mut board = Board::new(2, 2);
        board.mark(0, Point::new(0, 0));
        board.mark(1, Point::new(2, 2));
        for m in [
            mv(0, 0, 0, 1),
            mv(0, 1, 0, 2),
            mv(0, 2, 1, 2),
            mv(1, 2, 2, 2),
            mv(2, 2, 2, 1),
            mv(2, 1, 2, 0),
            mv(2, 0, 1, 0),
            mv(1, 0, 0, 0),
        ] {
            board.apply(m, 0);
        }
        let moves = board.valid_moves(0);
        let seats = [0, 1];
        let first = Minimax::new(0, &seats, SearchLimits::unbounded(3)).best_move(&board, &moves);
        let second = Minimax::new(0, &seats, SearchLimits::unbounded(3)).best_move(&board, &moves);
        assert_eq!(first, second);
    }

    #[test]
    fn test_node_budget_truncates() {
        let mut board = Board::new(3, 2);
        board.mark(0, Point::new(0, 0));
        board.mark(1, Point::new(3, 3));
        let moves = board.valid_moves(0);
        let seats = [0, 1];
        let limits = SearchLimits {
            max_depth: 20,
            max_nodes: 10,
            deadline: None,
        };
        let mut search = Minimax::new(0, &seats, limits);
        assert!(search.best_move(&board, &moves).is_some());
        assert!(search.truncated);
    }

    #[test]
    fn test_expired_deadline_still_answers() {
        let board = one_left();
        let moves = board.valid_moves(0);
        let seats = [0, 1];
        let limits = SearchLimits {
            max_depth: 8,
            max_nodes: u64::MAX,
            deadline: Some(Instant::now()),
        };
        let mut search = Minimax::new(0, &seats, limits);
        let (best, _) = search.best_move(&board, &moves).unwrap();
        // The capture is scored directly from the simulated board
        assert_eq!(best.edge(), mv(1, 0, 0, 0).edge());
    }
}
