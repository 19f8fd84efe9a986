//! Heuristic move scoring
//!
//! Fast, non-recursive scores for candidate moves, used when the game is too
//! open for exhaustive search.

use crate::board::{Board, Move, PlayerId};
use crate::grid::{affected_squares, Square};
use serde::{Deserialize, Serialize};

/// Weights for the additive move score
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Heuristics {
    /// Per square captured immediately; dominates everything else
    pub capture_weight: f32,
    /// A square going from one drawn border to two
    pub second_border_bonus: f32,
    /// A square going from two drawn borders to three (left safe)
    pub third_border_bonus: f32,
    /// A square left on three borders where an opponent can close it
    pub gift_penalty: f32,
    /// Destination not yet marked by the mover
    pub new_point_bonus: f32,
    /// Per unit of Manhattan distance gained toward the centre
    pub center_weight: f32,
    /// Per unit of Manhattan distance gained toward the nearest opponent point
    pub approach_weight: f32,
    /// Flat bonus for orthogonal lines
    pub orthogonal_bonus: f32,
    /// Board fraction captured below which the game counts as early
    pub early_game_cutoff: f32,
    /// Per opponent legal move removed (re-scoring pass)
    pub mobility_weight: f32,
    /// Per point of the mover's reachable area (re-scoring pass)
    pub area_weight: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            capture_weight: 1000.0,
            second_border_bonus: 2.0,
            third_border_bonus: 6.0,
            gift_penalty: 50.0,
            new_point_bonus: 3.0,
            center_weight: 0.5,
            approach_weight: 0.75,
            orthogonal_bonus: 0.5,
            early_game_cutoff: 0.3,
            mobility_weight: 0.4,
            area_weight: 0.1,
        }
    }
}

impl Heuristics {
    /// (territory, breach) multipliers for the current stage of the game
    pub fn phase_weights(&self, board: &Board) -> (f32, f32) {
        if board.progress() < self.early_game_cutoff {
            (0.6, 1.4)
        } else {
            (1.2, 0.6)
        }
    }
}

/// Additive score of `mv` for `player` against `opponents`
pub fn score_move(
    board: &Board,
    mv: Move,
    player: PlayerId,
    opponents: &[PlayerId],
    heuristics: &Heuristics,
) -> f32 {
    let captures = board.captures_for(mv).len();
    let (territory_w, breach_w) = heuristics.phase_weights(board);

    let mut score = captures as f32 * heuristics.capture_weight;
    score += territory_w * territory_score(board, mv, opponents, heuristics);
    score += breach_w * breach_score(board, mv, player, opponents, heuristics);
    if !mv.is_diagonal() {
        score += heuristics.orthogonal_bonus;
    }
    score
}

/// Border-count transitions of the squares `mv` touches
fn territory_score(board: &Board, mv: Move, opponents: &[PlayerId], h: &Heuristics) -> f32 {
    let edge = mv.edge();
    if edge.is_diagonal() {
        return 0.0;
    }

    let mut score = 0.0;
    for sq in affected_squares(edge, board.size()) {
        if board.is_captured(sq) {
            continue;
        }
        match board.border_count(sq) {
            1 => score += h.second_border_bonus,
            2 if opponent_can_close(board, sq, mv, opponents) => score -= h.gift_penalty,
            2 => score += h.third_border_bonus,
            _ => {}
        }
    }
    score
}

/// Whether an opponent could draw the last open border of `sq` once `mv` is played
fn opponent_can_close(board: &Board, sq: Square, mv: Move, opponents: &[PlayerId]) -> bool {
    let played = mv.edge();
    sq.borders()
        .iter()
        .filter(|b| **b != played && !board.has_edge(**b))
        .any(|open| {
            opponents.iter().any(|&opp| {
                board.is_marked(opp, open.low()) || board.is_marked(opp, open.high())
            })
        })
}

/// Expansion value: new ground, centre pull, approach to the opponents
fn breach_score(
    board: &Board,
    mv: Move,
    player: PlayerId,
    opponents: &[PlayerId],
    h: &Heuristics,
) -> f32 {
    let mut score = 0.0;

    if !board.is_marked(player, mv.to) {
        score += h.new_point_bonus;
    }

    let size = board.size();
    score += h.center_weight * (mv.from.distance_to_center(size) - mv.to.distance_to_center(size));

    let nearest = |p: crate::grid::Point| {
        opponents
            .iter()
            .filter_map(|&opp| board.marked(opp))
            .flat_map(|set| set.iter())
            .map(|q| p.manhattan(q))
            .min()
    };
    if let (Some(before), Some(after)) = (nearest(mv.from), nearest(mv.to)) {
        score += h.approach_weight * (before - after) as f32;
    }

    score
}

/// Second-pass score for a non-capturing candidate: simulate it and measure
/// how much it cramps the opponents and how much room the mover keeps
pub fn refine_score(
    board: &Board,
    mv: Move,
    player: PlayerId,
    opponents: &[PlayerId],
    heuristics: &Heuristics,
) -> f32 {
    let before: usize = opponents.iter().map(|&o| board.valid_moves(o).len()).sum();

    let mut sim = board.clone();
    sim.apply(mv, player);

    let after: usize = opponents.iter().map(|&o| sim.valid_moves(o).len()).sum();
    let mobility_loss = before as f32 - after as f32;
    let area = sim.reachable_area(player) as f32;

    heuristics.mobility_weight * mobility_loss + heuristics.area_weight * area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Point;

    fn mv(r1: i8, c1: i8, r2: i8, c2: i8) -> Move {
        Move::new(Point::new(r1, c1), Point::new(r2, c2))
    }

    #[test]
    fn test_capture_dominates() {
        let mut board = Board::new(3, 2);
        board.mark(0, Point::new(0, 0));
        board.mark(1, Point::new(3, 3));
        for m in [mv(0, 0, 0, 1), mv(0, 1, 1, 1), mv(1, 1, 1, 0)] {
            board.apply(m, 0);
        }
        let h = Heuristics::default();
        let capture = score_move(&board, mv(1, 0, 0, 0), 0, &[1], &h);
        let quiet = score_move(&board, mv(1, 1, 2, 1), 0, &[1], &h);
        assert!(capture > quiet + 500.0);
    }

    #[test]
    fn test_self_gift_penalised() {
        let mut board = Board::new(4, 2);
        board.mark(0, Point::new(0, 0));
        board.mark(1, Point::new(4, 4));
        board.mark(1, Point::new(4, 3));
        // Square (0,0): top and left drawn
        board.apply(mv(0, 0, 0, 1), 0);
        board.apply(mv(0, 0, 1, 0), 0);
        // Square (3,3): bottom and right drawn
        board.apply(mv(4, 4, 4, 3), 0);
        board.apply(mv(4, 4, 3, 4), 0);

        let h = Heuristics::default();
        // Leaves (0,0) open only at the bottom, nowhere near the opponent
        let safe = score_move(&board, mv(0, 1, 1, 1), 0, &[1], &h);
        // Leaves (3,3) open only on the left, whose lower end the opponent holds
        let gift = score_move(&board, mv(3, 4, 3, 3), 0, &[1], &h);
        assert!(safe > gift);
        assert!(gift < 0.0);
    }

    #[test]
    fn test_phase_weights_shift() {
        let h = Heuristics::default();
        let mut board = Board::new(1, 2);
        assert_eq!(h.phase_weights(&board), (0.6, 1.4));
        board.sweep_uncaptured(0);
        assert_eq!(h.phase_weights(&board), (1.2, 0.6));
    }

    #[test]
    fn test_refine_counts_mobility() {
        let mut board = Board::new(2, 2);
        board.mark(0, Point::new(0, 0));
        board.mark(1, Point::new(0, 1));
        let h = Heuristics::default();
        // Drawing the shared edge takes one option from the opponent; both
        // moves leave the whole board reachable
        let shared = refine_score(&board, mv(0, 0, 0, 1), 0, &[1], &h);
        let away = refine_score(&board, mv(0, 0, 1, 0), 0, &[1], &h);
        assert!((shared - away - h.mobility_weight).abs() < 1e-4);
    }
}
