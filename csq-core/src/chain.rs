//! Chain-capture simulation
//!
//! A capture grants a bonus turn, so one capturing line often opens the next.
//! `chain_yield` plays a move on a private copy of the board and greedily
//! follows the best capturing continuation, one ply of choice per level.

use crate::board::{Board, Move, PlayerId};

/// Default cap on follow-up levels
pub const DEFAULT_CHAIN_DEPTH: u32 = 4;

/// Total squares `player` collects by playing `mv` and then chaining
/// capturing continuations up to `depth` more levels
pub fn chain_yield(board: &Board, mv: Move, player: PlayerId, depth: u32) -> usize {
    let mut sim = board.clone();
    let captured = sim.apply(mv, player).len();
    if captured == 0 || depth == 0 {
        return captured;
    }

    let follow_up = sim
        .valid_moves(player)
        .into_iter()
        .filter(|&m| !sim.captures_for(m).is_empty())
        .map(|m| chain_yield(&sim, m, player, depth - 1))
        .max()
        .unwrap_or(0);

    captured + follow_up
}
