//! Fixed move ordering for the search.
//!
//! Columns are tried from the center outwards, and for each column the
//! mover's own shape comes before the other shape. The order decides which
//! of several equally scored moves is kept, so it must stay deterministic.

use crate::game_state::board_types::*;

/// Column indices from the center outwards, left side first on ties.
pub fn center_out_columns(cols: usize) -> Vec<usize> {
    let center = cols / 2;
    let mut order = Vec::with_capacity(cols);
    order.push(center);
    for offset in 1..=cols {
        if offset <= center {
            order.push(center - offset);
        }
        if center + offset < cols {
            order.push(center + offset);
        }
        if order.len() == cols {
            break;
        }
    }
    order
}

/// Legal moves for the side to move in search order.
///
/// Full columns and shapes the mover has run out of are skipped.
pub fn ordered_moves(board: &Board) -> Vec<Move> {
    let mover = board.turn();
    let own = mover.shape();
    let other = match own {
        PShape::Round => PShape::Square,
        PShape::Square => PShape::Round,
    };

    let mut moves = Vec::with_capacity(board.cols() * 2);
    for col in center_out_columns(board.cols()) {
        if board.is_column_full(col) {
            continue;
        }
        for shape in [own, other] {
            if board.piece_count(mover, shape) > 0 {
                moves.push(Move::new(col, shape));
            }
        }
    }
    moves
}
