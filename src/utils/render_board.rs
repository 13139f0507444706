//! Terminal-oriented ASCII board renderer.
//!
//! Creates a human-readable board view for debugging, tests, and the stdio
//! protocol's `board` command.

use crate::game_state::board_types::*;

/// Render the board to a string for terminal output.
///
/// The top row is printed first; column indices are printed underneath.
/// White pieces are `w` (round) / `W` (square), red pieces `r` / `R`.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    for row in (0..board.rows()).rev() {
        for col in 0..board.cols() {
            out.push(match board.piece_at(row, col) {
                Some(piece) => piece_to_char(piece),
                None => '.',
            });
            if col + 1 < board.cols() {
                out.push(' ');
            }
        }
        out.push('\n');
    }

    let footer: Vec<String> = (0..board.cols()).map(|c| (c % 10).to_string()).collect();
    out.push_str(&footer.join(" "));

    out
}

fn piece_to_char(piece: Piece) -> char {
    match (piece.color, piece.shape) {
        (PColor::White, PShape::Round) => 'w',
        (PColor::White, PShape::Square) => 'W',
        (PColor::Red, PShape::Round) => 'r',
        (PColor::Red, PShape::Square) => 'R',
    }
}
