//! Grid geometry with canonical point, edge and square identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest playable board (cells per side)
pub const MIN_BOARD_SIZE: i8 = 1;

/// Largest playable board (cells per side)
pub const MAX_BOARD_SIZE: i8 = 10;

/// Board size used when a setup does not name one
pub const DEFAULT_BOARD_SIZE: i8 = 6;

/// Neighbor scan offsets (dr, dc), row-major, centre excluded
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A grid point, `0 <= row, col <= board_size`
///
/// Field order matters: the derived `Ord` compares `row` first, then `col`,
/// which is the canonical ordering used for edge keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub row: i8,
    pub col: i8,
}

impl Point {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this point lies on a board with `size` cells per side
    pub fn in_bounds(&self, size: i8) -> bool {
        self.row >= 0 && self.row <= size && self.col >= 0 && self.col <= size
    }

    pub fn manhattan(&self, other: Point) -> i32 {
        (self.row as i32 - other.row as i32).abs() + (self.col as i32 - other.col as i32).abs()
    }

    /// Manhattan distance to the board centre (may be fractional on odd boards)
    pub fn distance_to_center(&self, size: i8) -> f32 {
        let center = size as f32 / 2.0;
        (self.row as f32 - center).abs() + (self.col as f32 - center).abs()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An undirected edge between two adjacent points, stored low-to-high
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    a: Point,
    b: Point,
}

impl Edge {
    /// Canonical edge between `p1` and `p2`; `Edge::new(a, b) == Edge::new(b, a)`
    pub fn new(p1: Point, p2: Point) -> Self {
        if p1 <= p2 {
            Self { a: p1, b: p2 }
        } else {
            Self { a: p2, b: p1 }
        }
    }

    pub fn low(&self) -> Point {
        self.a
    }

    pub fn high(&self) -> Point {
        self.b
    }

    pub fn is_diagonal(&self) -> bool {
        is_diagonal(self.a, self.b)
    }
}

/// A unit cell, `0 <= row, col < board_size`, named by its top-left point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self, size: i8) -> bool {
        self.row >= 0 && self.row < size && self.col >= 0 && self.col < size
    }

    /// Border edges: top, bottom, left, right
    pub fn borders(&self) -> [Edge; 4] {
        let (r, c) = (self.row, self.col);
        [
            Edge::new(Point::new(r, c), Point::new(r, c + 1)),
            Edge::new(Point::new(r + 1, c), Point::new(r + 1, c + 1)),
            Edge::new(Point::new(r, c), Point::new(r + 1, c)),
            Edge::new(Point::new(r, c + 1), Point::new(r + 1, c + 1)),
        ]
    }
}

fn deltas(p1: Point, p2: Point) -> (i16, i16) {
    (
        (p1.row as i16 - p2.row as i16).abs(),
        (p1.col as i16 - p2.col as i16).abs(),
    )
}

pub fn is_adjacent(p1: Point, p2: Point) -> bool {
    let (dr, dc) = deltas(p1, p2);
    dr <= 1 && dc <= 1 && dr + dc > 0
}

pub fn is_diagonal(p1: Point, p2: Point) -> bool {
    deltas(p1, p2) == (1, 1)
}

/// 8-directional neighbors of `p`, clipped to the grid, in `DIRECTIONS` order
pub fn neighbors(p: Point, size: i8) -> impl Iterator<Item = Point> {
    DIRECTIONS
        .into_iter()
        .map(move |(dr, dc)| Point::new(p.row + dr, p.col + dc))
        .filter(move |n| n.in_bounds(size))
}

/// The square a diagonal crosses, or `None` for non-diagonal pairs
///
/// The result is not clipped to the grid.
pub fn square_for_diagonal(p1: Point, p2: Point) -> Option<Square> {
    if !is_diagonal(p1, p2) {
        return None;
    }
    let (top, bottom) = if p1.row < p2.row { (p1, p2) } else { (p2, p1) };
    if bottom.col > top.col {
        Some(Square::new(top.row, top.col))
    } else {
        Some(Square::new(top.row, top.col - 1))
    }
}

/// Squares whose capture state can change when `edge` is drawn
///
/// One square for a diagonal; up to two for an orthogonal edge (the ones on
/// either side that lie inside the grid).
pub fn affected_squares(edge: Edge, size: i8) -> Vec<Square> {
    let (a, b) = (edge.low(), edge.high());
    let mut squares = Vec::with_capacity(2);

    if edge.is_diagonal() {
        if let Some(sq) = square_for_diagonal(a, b) {
            if sq.in_bounds(size) {
                squares.push(sq);
            }
        }
    } else if a.row == b.row {
        if a.row > 0 {
            squares.push(Square::new(a.row - 1, a.col));
        }
        if a.row < size {
            squares.push(Square::new(a.row, a.col));
        }
    } else {
        if a.col > 0 {
            squares.push(Square::new(a.row, a.col - 1));
        }
        if a.col < size {
            squares.push(Square::new(a.row, a.col));
        }
    }

    squares
}

/// Starting corners in seat order: top-left, bottom-right, top-right, bottom-left
pub fn starting_corners(size: i8, player_count: usize) -> Vec<Point> {
    let corners = [
        Point::new(0, 0),
        Point::new(size, size),
        Point::new(0, size),
        Point::new(size, 0),
    ];
    corners.into_iter().take(player_count).collect()
}

pub fn total_squares(size: i8) -> usize {
    let n = size.max(0) as usize;
    n * n
}

/// All squares of the board, row-major
pub fn all_squares(size: i8) -> impl Iterator<Item = Square> {
    (0..size).flat_map(move |r| (0..size).map(move |c| Square::new(r, c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_is_symmetric() {
        for p in [Point::new(2, 2), Point::new(0, 3)] {
            for n in neighbors(p, 4) {
                assert_eq!(Edge::new(p, n), Edge::new(n, p));
            }
        }
        let e = Edge::new(Point::new(1, 1), Point::new(0, 2));
        assert_eq!(e.low(), Point::new(0, 2));
    }

    #[test]
    fn test_adjacency() {
        let p = Point::new(1, 1);
        assert!(is_adjacent(p, Point::new(0, 0)));
        assert!(is_adjacent(p, Point::new(1, 2)));
        assert!(!is_adjacent(p, p));
        assert!(!is_adjacent(p, Point::new(3, 1)));
        assert!(is_diagonal(p, Point::new(2, 0)));
        assert!(!is_diagonal(p, Point::new(2, 1)));
    }

    #[test]
    fn test_neighbors_clipped() {
        assert_eq!(neighbors(Point::new(0, 0), 3).count(), 3);
        assert_eq!(neighbors(Point::new(0, 1), 3).count(), 5);
        assert_eq!(neighbors(Point::new(1, 1), 3).count(), 8);
    }

    #[test]
    fn test_square_for_diagonal() {
        // "\" through square (0,0)
        assert_eq!(
            square_for_diagonal(Point::new(0, 0), Point::new(1, 1)),
            Some(Square::new(0, 0))
        );
        // "/" through square (0,0)
        assert_eq!(
            square_for_diagonal(Point::new(1, 0), Point::new(0, 1)),
            Some(Square::new(0, 0))
        );
        assert_eq!(square_for_diagonal(Point::new(0, 0), Point::new(0, 1)), None);
    }

    #[test]
    fn test_affected_squares_on_boundary() {
        let top = Edge::new(Point::new(0, 0), Point::new(0, 1));
        assert_eq!(affected_squares(top, 3), vec![Square::new(0, 0)]);

        let inner = Edge::new(Point::new(1, 1), Point::new(2, 1));
        assert_eq!(
            affected_squares(inner, 3),
            vec![Square::new(1, 0), Square::new(1, 1)]
        );

        let right = Edge::new(Point::new(0, 3), Point::new(1, 3));
        assert_eq!(affected_squares(right, 3), vec![Square::new(0, 2)]);

        let diag = Edge::new(Point::new(2, 2), Point::new(3, 3));
        assert_eq!(affected_squares(diag, 3), vec![Square::new(2, 2)]);
    }

    #[test]
    fn test_square_borders_distinct() {
        let borders = Square::new(1, 2).borders();
        for (i, a) in borders.iter().enumerate() {
            assert!(!a.is_diagonal());
            for b in &borders[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_starting_corners() {
        let corners = starting_corners(4, 4);
        assert_eq!(corners[0], Point::new(0, 0));
        assert_eq!(corners[1], Point::new(4, 4));
        assert_eq!(corners[2], Point::new(0, 4));
        assert_eq!(corners[3], Point::new(4, 0));
        assert_eq!(starting_corners(4, 2).len(), 2);
        assert_eq!(total_squares(4), 16);
        assert_eq!(all_squares(3).count(), 9);
    }
}
