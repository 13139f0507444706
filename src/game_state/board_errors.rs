//! Errors raised by board construction and move application.

use std::error::Error;
use std::fmt;

use crate::game_state::board_types::{PColor, PShape};

pub type BoardResult<T> = Result<T, BoardError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Dimensions or win length that cannot form a playable board.
    InvalidDimensions {
        rows: usize,
        cols: usize,
        pieces_in_sequence: usize,
    },
    ColumnOutOfRange(usize),
    ColumnFull(usize),
    NoPiecesLeft(PColor, PShape),
    GameAlreadyOver,
    NothingToUndo,
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::InvalidDimensions {
                rows,
                cols,
                pieces_in_sequence,
            } => write!(
                f,
                "invalid board {rows}x{cols} with {pieces_in_sequence} in a row"
            ),
            BoardError::ColumnOutOfRange(col) => write!(f, "column {col} is out of range"),
            BoardError::ColumnFull(col) => write!(f, "column {col} is full"),
            BoardError::NoPiecesLeft(color, shape) => {
                write!(f, "{color:?} has no {} pieces left", shape.as_str())
            }
            BoardError::GameAlreadyOver => write!(f, "the game is already over"),
            BoardError::NothingToUndo => write!(f, "no move to undo"),
        }
    }
}

impl Error for BoardError {}
