//! Canonical rule constants.
//!
//! Defaults for the standard board: 7 columns by 6 rows, 4 in a row, and
//! 21 pieces per player split 10 round / 11 square.

pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 7;
pub const DEFAULT_PIECES_IN_SEQUENCE: usize = 4;
pub const DEFAULT_ROUND_PIECES: u16 = 10;
pub const DEFAULT_SQUARE_PIECES: u16 = 11;
