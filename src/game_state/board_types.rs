/// Core value types shared by the board, search and engine layers.
/// Colors and shapes are kept separate so tables can be indexed
/// `[color][shape]` without packing.

pub use crate::game_state::board::Board;
pub use crate::game_state::undo_state::UndoState;

/// Player color. White moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PColor {
    White,
    Red,
}

impl PColor {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PColor::White => 0,
            PColor::Red => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            PColor::White => PColor::Red,
            PColor::Red => PColor::White,
        }
    }

    /// The shape that counts as this player's own.
    #[inline]
    pub const fn shape(self) -> PShape {
        match self {
            PColor::White => PShape::Round,
            PColor::Red => PShape::Square,
        }
    }

    /// A piece is friendly when it shares this player's color or shape.
    #[inline]
    pub fn friend_of(self, piece: Piece) -> bool {
        piece.color == self || piece.shape == self.shape()
    }
}

/// Piece shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PShape {
    Round,
    Square,
}

impl PShape {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PShape::Round => 0,
            PShape::Square => 1,
        }
    }

    /// Owner of lines made of this shape.
    #[inline]
    pub const fn owner(self) -> PColor {
        match self {
            PShape::Round => PColor::White,
            PShape::Square => PColor::Red,
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            PShape::Round => "round",
            PShape::Square => "square",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "round" | "r" | "o" => Some(PShape::Round),
            "square" | "s" | "x" => Some(PShape::Square),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: PColor,
    pub shape: PShape,
}

impl Piece {
    #[inline]
    pub const fn new(color: PColor, shape: PShape) -> Self {
        Self { color, shape }
    }
}

/// A drop into `column` with a piece of `shape` in the mover's color.
///
/// "No move" is expressed as `Option<Move>::None` throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub column: usize,
    pub shape: PShape,
}

impl Move {
    #[inline]
    pub const fn new(column: usize, shape: PShape) -> Self {
        Self { column, shape }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.column, self.shape.as_str())
    }
}

/// Result of `Board::check_winner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    None,
    White,
    Red,
    Draw,
}

impl Winner {
    #[inline]
    pub const fn from_color(color: PColor) -> Self {
        match color {
            PColor::White => Winner::White,
            PColor::Red => Winner::Red,
        }
    }

    #[inline]
    pub const fn is_over(self) -> bool {
        !matches!(self, Winner::None)
    }
}

/// Board cell coordinate, row 0 is the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}
