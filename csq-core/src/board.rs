//! Board state: drawn edges, marked points and captured squares
//!
//! This is the single source of truth the game state machine mutates and the
//! bots clone for simulation. Everything that asks "is this legal?" or "what
//! would this capture?" lives here.

use crate::grid::{
    affected_squares, all_squares, is_adjacent, neighbors, square_for_diagonal, total_squares,
    Edge, Point, Square,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Player identifier (seat index)
pub type PlayerId = usize;

/// A line drawn from a marked point to an adjacent point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Point,
    pub to: Point,
}

impl Move {
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn edge(&self) -> Edge {
        Edge::new(self.from, self.to)
    }

    pub fn is_diagonal(&self) -> bool {
        crate::grid::is_diagonal(self.from, self.to)
    }
}

/// Insertion-ordered set of points
///
/// Move generation walks marked points in the order they were claimed, so the
/// set keeps that order alongside a hash index for membership.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    order: Vec<Point>,
    index: FxHashSet<Point>,
}

impl PointSet {
    pub fn insert(&mut self, p: Point) -> bool {
        if self.index.insert(p) {
            self.order.push(p);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.index.contains(&p)
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut set = PointSet::default();
        for p in iter {
            set.insert(p);
        }
        set
    }
}

/// Board containers (clone to simulate)
#[derive(Clone, Debug)]
pub struct Board {
    size: i8,
    /// Edge -> owner (first writer wins)
    edges: FxHashMap<Edge, PlayerId>,
    /// Marked points per player, indexed by player id
    marked: Vec<PointSet>,
    /// Square -> owner
    captured: FxHashMap<Square, PlayerId>,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board with no marked points
    pub fn new(size: i8, player_count: usize) -> Self {
        Self {
            size,
            edges: FxHashMap::default(),
            marked: vec![PointSet::default(); player_count],
            captured: FxHashMap::default(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn size(&self) -> i8 {
        self.size
    }

    pub fn player_count(&self) -> usize {
        self.marked.len()
    }

    pub fn total_squares(&self) -> usize {
        total_squares(self.size)
    }

    pub fn has_edge(&self, edge: Edge) -> bool {
        self.edges.contains_key(&edge)
    }

    pub fn edge_owner(&self, edge: Edge) -> Option<PlayerId> {
        self.edges.get(&edge).copied()
    }

    /// Iterate drawn edges with their owners
    pub fn edges(&self) -> impl Iterator<Item = (Edge, PlayerId)> + '_ {
        self.edges.iter().map(|(&e, &p)| (e, p))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn marked(&self, player: PlayerId) -> Option<&PointSet> {
        self.marked.get(player)
    }

    pub fn is_marked(&self, player: PlayerId, p: Point) -> bool {
        self.marked.get(player).is_some_and(|set| set.contains(p))
    }

    pub fn captured_owner(&self, square: Square) -> Option<PlayerId> {
        self.captured.get(&square).copied()
    }

    pub fn is_captured(&self, square: Square) -> bool {
        self.captured.contains_key(&square)
    }

    /// Iterate captured squares with their owners
    pub fn captured(&self) -> impl Iterator<Item = (Square, PlayerId)> + '_ {
        self.captured.iter().map(|(&s, &p)| (s, p))
    }

    pub fn captured_count(&self) -> usize {
        self.captured.len()
    }

    /// Squares owned by `player`
    pub fn score(&self, player: PlayerId) -> usize {
        self.captured.values().filter(|&&owner| owner == player).count()
    }

    /// Fraction of the board already captured (0.0 - 1.0)
    pub fn progress(&self) -> f32 {
        let total = self.total_squares();
        if total == 0 {
            1.0
        } else {
            self.captured.len() as f32 / total as f32
        }
    }

    pub fn is_square_filled(&self, square: Square) -> bool {
        square.borders().iter().all(|e| self.edges.contains_key(e))
    }

    /// Number of drawn borders of `square` (0-4)
    pub fn border_count(&self, square: Square) -> usize {
        square.borders().iter().filter(|e| self.edges.contains_key(e)).count()
    }

    // ========================================================================
    // LEGALITY
    // ========================================================================

    /// Check if `player` may draw `mv`
    pub fn is_valid_move(&self, mv: Move, player: PlayerId) -> bool {
        if !self.is_marked(player, mv.from) {
            return false;
        }
        if !is_adjacent(mv.from, mv.to) || !mv.to.in_bounds(self.size) {
            return false;
        }
        if self.edges.contains_key(&mv.edge()) {
            return false;
        }
        if let Some(sq) = square_for_diagonal(mv.from, mv.to) {
            if self.captured.contains_key(&sq) {
                return false;
            }
        }
        true
    }

    /// All legal moves for `player`: marked points in claim order, then
    /// neighbors in scan order
    pub fn valid_moves(&self, player: PlayerId) -> Vec<Move> {
        let mut moves = Vec::new();
        let Some(points) = self.marked.get(player) else {
            return moves;
        };
        for from in points.iter() {
            for to in neighbors(from, self.size) {
                let mv = Move::new(from, to);
                if self.is_valid_move(mv, player) {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    /// Short-circuiting `!valid_moves(player).is_empty()`
    pub fn has_valid_move(&self, player: PlayerId) -> bool {
        let Some(points) = self.marked.get(player) else {
            return false;
        };
        points.iter().any(|from| {
            neighbors(from, self.size).any(|to| self.is_valid_move(Move::new(from, to), player))
        })
    }

    /// Squares `mv` would capture if drawn now
    pub fn captures_for(&self, mv: Move) -> Vec<Square> {
        let edge = mv.edge();
        affected_squares(edge, self.size)
            .into_iter()
            .filter(|&sq| {
                !self.captured.contains_key(&sq)
                    && sq
                        .borders()
                        .iter()
                        .all(|b| *b == edge || self.edges.contains_key(b))
            })
            .collect()
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Add `p` to `player`'s marked set
    pub fn mark(&mut self, player: PlayerId, p: Point) {
        if player >= self.marked.len() {
            self.marked.resize_with(player + 1, PointSet::default);
        }
        self.marked[player].insert(p);
    }

    /// Draw `mv` for `player` and capture every newly filled affected square
    ///
    /// Assumes a pre-validated move. Returns the captured squares.
    pub fn apply(&mut self, mv: Move, player: PlayerId) -> Vec<Square> {
        let edge = mv.edge();
        self.edges.entry(edge).or_insert(player);
        self.mark(player, mv.to);
        self.capture_filled(edge, player)
    }

    /// Capture every uncaptured, filled square touching `edge`
    fn capture_filled(&mut self, edge: Edge, player: PlayerId) -> Vec<Square> {
        let captures: Vec<Square> = affected_squares(edge, self.size)
            .into_iter()
            .filter(|&sq| !self.captured.contains_key(&sq) && self.is_square_filled(sq))
            .collect();
        for &sq in &captures {
            self.captured.insert(sq, player);
        }
        captures
    }

    /// Award every uncaptured square to `player`
    pub fn sweep_uncaptured(&mut self, player: PlayerId) -> Vec<Square> {
        let swept: Vec<Square> = all_squares(self.size)
            .filter(|sq| !self.captured.contains_key(sq))
            .collect();
        for &sq in &swept {
            self.captured.insert(sq, player);
        }
        swept
    }

    /// Edit-mode insertion: records the edge, marks both ends, captures
    pub fn insert_edge(&mut self, edge: Edge, player: PlayerId) -> Vec<Square> {
        self.edges.entry(edge).or_insert(player);
        self.mark(player, edge.low());
        self.mark(player, edge.high());
        self.capture_filled(edge, player)
    }

    /// Edit-mode removal: drops the edge and uncaptures squares it unfilled
    pub fn remove_edge(&mut self, edge: Edge) -> Vec<Square> {
        if self.edges.remove(&edge).is_none() {
            return Vec::new();
        }
        let released: Vec<Square> = affected_squares(edge, self.size)
            .into_iter()
            .filter(|&sq| self.captured.contains_key(&sq) && !self.is_square_filled(sq))
            .collect();
        for sq in &released {
            self.captured.remove(sq);
        }
        released
    }

    /// Restore a drawn edge verbatim (wire decoding)
    pub(crate) fn restore_edge(&mut self, edge: Edge, player: PlayerId) {
        self.edges.insert(edge, player);
    }

    /// Restore a captured square verbatim (wire decoding)
    pub(crate) fn restore_capture(&mut self, square: Square, player: PlayerId) {
        self.captured.insert(square, player);
    }

    // ========================================================================
    // ANALYSIS
    // ========================================================================

    /// Points `player` could eventually expand into
    ///
    /// Flood fill from every marked point across undrawn edges; a diagonal
    /// step is blocked when the square it crosses is captured.
    pub fn reachable_area(&self, player: PlayerId) -> usize {
        let Some(points) = self.marked.get(player) else {
            return 0;
        };
        let mut seen: FxHashSet<Point> = points.iter().collect();
        let mut stack: Vec<Point> = points.iter().collect();

        while let Some(p) = stack.pop() {
            for n in neighbors(p, self.size) {
                if seen.contains(&n) || self.edges.contains_key(&Edge::new(p, n)) {
                    continue;
                }
                if let Some(sq) = square_for_diagonal(p, n) {
                    if self.captured.contains_key(&sq) {
                        continue;
                    }
                }
                seen.insert(n);
                stack.push(n);
            }
        }

        seen.len()
    }
}
