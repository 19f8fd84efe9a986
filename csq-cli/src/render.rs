//! ASCII board rendering
//!
//! Points are `o`, horizontal lines `---`, vertical lines `|`, diagonals
//! `\` `/` (`X` when both cross), and captured squares show the owner's
//! seat number.

use csq_core::{Board, Edge, Point, Square};

/// Render the board as text, one line per point row and cell row
pub fn render_board(board: &Board) -> String {
    let n = board.size();
    let mut out = String::new();

    for row in 0..=n {
        out.push_str(&point_row(board, row));
        out.push('\n');
        if row < n {
            out.push_str(&cell_row(board, row));
            out.push('\n');
        }
    }
    out
}

fn point_row(board: &Board, row: i8) -> String {
    let n = board.size();
    let mut line = String::new();
    for col in 0..=n {
        line.push('o');
        if col < n {
            let edge = Edge::new(Point::new(row, col), Point::new(row, col + 1));
            line.push_str(if board.has_edge(edge) { "---" } else { "   " });
        }
    }
    line.trim_end().to_string()
}

fn cell_row(board: &Board, row: i8) -> String {
    let n = board.size();
    let mut line = String::new();
    for col in 0..=n {
        let vertical = Edge::new(Point::new(row, col), Point::new(row + 1, col));
        line.push(if board.has_edge(vertical) { '|' } else { ' ' });
        if col < n {
            line.push(' ');
            line.push(cell_mark(board, Square::new(row, col)));
            line.push(' ');
        }
    }
    line.trim_end().to_string()
}

fn cell_mark(board: &Board, sq: Square) -> char {
    if let Some(owner) = board.captured_owner(sq) {
        return char::from_digit((owner + 1) as u32 % 10, 10).unwrap_or('#');
    }
    let (r, c) = (sq.row, sq.col);
    let falling = board.has_edge(Edge::new(Point::new(r, c), Point::new(r + 1, c + 1)));
    let rising = board.has_edge(Edge::new(Point::new(r, c + 1), Point::new(r + 1, c)));
    match (falling, rising) {
        (true, true) => 'X',
        (true, false) => '\\',
        (false, true) => '/',
        (false, false) => ' ',
    }
}
