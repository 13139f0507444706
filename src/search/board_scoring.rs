//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.
//! Heuristic scores are always finite; infinities are left to proven results.

use crate::game_state::board_types::*;
use crate::search::score::Score;

/// Score returned by `HoneycombScorer` for a line one piece short of winning.
pub const WIN_VALUE: Score = 1000.0;

const START_VALUE: Score = 100.0;
const AMOUNT_COLOR: Score = 1.0;
const AMOUNT_SHAPE: Score = 2.0;
const AMOUNT_PIECE: Score = AMOUNT_COLOR + AMOUNT_SHAPE;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of `perspective`. Must not mutate anything.
    fn score(&self, board: &Board, perspective: PColor) -> Score;
}

/// Named scorer choice used by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerKind {
    Honeycomb,
    Neighbors,
    Center,
}

impl ScorerKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "honeycomb" => Some(ScorerKind::Honeycomb),
            "neighbors" | "neighbours" => Some(ScorerKind::Neighbors),
            "center" | "centre" => Some(ScorerKind::Center),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScorerKind::Honeycomb => "honeycomb",
            ScorerKind::Neighbors => "neighbors",
            ScorerKind::Center => "center",
        }
    }

    pub fn build(self) -> Box<dyn BoardScorer> {
        match self {
            ScorerKind::Honeycomb => Box::new(HoneycombScorer),
            ScorerKind::Neighbors => Box::new(NeighborScorer),
            ScorerKind::Center => Box::new(CenterScorer),
        }
    }
}

impl<S: BoardScorer + ?Sized> BoardScorer for Box<S> {
    fn score(&self, board: &Board, perspective: PColor) -> Score {
        (**self).score(board, perspective)
    }
}

/// Corridor heuristic: walks every win corridor, penalising pieces that do
/// not match the perspective's color and shape, and looks for lines one
/// piece short of a win.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoneycombScorer;

impl BoardScorer for HoneycombScorer {
    fn score(&self, board: &Board, perspective: PColor) -> Score {
        let mut h = START_VALUE;
        let mut enemy_threat = false;
        let almost = board.pieces_in_sequence().saturating_sub(1);

        for line in board.win_corridors() {
            let mut ally_in_line = 0usize;
            let mut enemy_in_line = 0usize;
            let mut ally_can_use = true;
            let mut enemy_can_use = true;

            for pos in line {
                let Some(piece) = board.piece_at(pos.row, pos.col) else {
                    continue;
                };

                if perspective.friend_of(piece) {
                    if piece.color != perspective {
                        h -= AMOUNT_COLOR;
                    }
                    if piece.shape != perspective.shape() {
                        h -= AMOUNT_SHAPE;
                    }
                    if ally_can_use {
                        ally_in_line += 1;
                    }
                    enemy_can_use = false;
                } else {
                    ally_can_use = false;
                    h -= AMOUNT_PIECE;
                    if enemy_can_use {
                        enemy_in_line += 1;
                    }
                }
            }

            if ally_in_line == almost {
                return WIN_VALUE;
            }
            if enemy_in_line == almost {
                enemy_threat = true;
            }

            h -= enemy_in_line as Score - ally_in_line as Score;
        }

        if enemy_threat {
            -WIN_VALUE
        } else {
            h
        }
    }
}

/// Adjacency heuristic: rewards the perspective's pieces for sitting next to
/// pieces of its own color and shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborScorer;

impl NeighborScorer {
    fn neighbors_value(board: &Board, row: usize, col: usize, perspective: PColor) -> Score {
        let mut value = 0.0;
        let own_shape = perspective.shape();

        for r in row.saturating_sub(1)..=(row + 1).min(board.rows() - 1) {
            for c in col.saturating_sub(1)..=(col + 1).min(board.cols() - 1) {
                if r == row && c == col {
                    continue;
                }
                let Some(p) = board.piece_at(r, c) else {
                    continue;
                };
                value += match (p.color == perspective, p.shape == own_shape) {
                    (true, true) => AMOUNT_PIECE,
                    (false, false) => -AMOUNT_PIECE,
                    (true, false) => AMOUNT_COLOR - AMOUNT_SHAPE,
                    (false, true) => AMOUNT_SHAPE - AMOUNT_COLOR,
                };
            }
        }

        value
    }
}

impl BoardScorer for NeighborScorer {
    fn score(&self, board: &Board, perspective: PColor) -> Score {
        let mut total = 0.0;
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                match board.piece_at(row, col) {
                    Some(p) if p.color == perspective => {
                        total += Self::neighbors_value(board, row, col, perspective);
                    }
                    _ => {}
                }
            }
        }
        total
    }
}

/// Cheap baseline preferring friendly pieces in central columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterScorer;

impl BoardScorer for CenterScorer {
    fn score(&self, board: &Board, perspective: PColor) -> Score {
        let center = (board.cols() as Score - 1.0) / 2.0;
        let mut total = 0.0;
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                let Some(p) = board.piece_at(row, col) else {
                    continue;
                };
                let weight = center + 1.0 - (col as Score - center).abs();
                if perspective.friend_of(p) {
                    total += weight;
                } else {
                    total -= weight;
                }
            }
        }
        total
    }
}
