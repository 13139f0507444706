//! Core mutable board representation.
//!
//! `Board` is the central model for the engine. It stores the cell grid,
//! per-column fill heights, remaining piece counts, the side to move, and the
//! undo stack used by apply/undo style search. The game outcome is updated
//! incrementally from the last dropped piece, so `check_winner` is O(1).

use std::sync::Arc;

use crate::game_state::board_errors::{BoardError, BoardResult};
use crate::game_state::board_rules::*;
use crate::game_state::board_types::*;
use crate::utils::render_board::render_board;

const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    pieces_in_sequence: usize,

    // Row-major, row 0 at the bottom.
    cells: Vec<Option<Piece>>,
    heights: Vec<usize>,

    // [color][shape]
    remaining: [[u16; 2]; 2],

    turn: PColor,
    winner: Winner,

    undo_stack: Vec<UndoState>,

    // Shared between clones; depends only on the dimensions.
    win_corridors: Arc<Vec<Vec<Pos>>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::build(
            DEFAULT_ROWS,
            DEFAULT_COLS,
            DEFAULT_PIECES_IN_SEQUENCE,
            DEFAULT_ROUND_PIECES,
            DEFAULT_SQUARE_PIECES,
        )
    }
}

impl Board {
    pub fn new(
        rows: usize,
        cols: usize,
        pieces_in_sequence: usize,
        round_pieces: u16,
        square_pieces: u16,
    ) -> BoardResult<Self> {
        if rows == 0
            || cols == 0
            || pieces_in_sequence < 2
            || pieces_in_sequence > rows.max(cols)
        {
            return Err(BoardError::InvalidDimensions {
                rows,
                cols,
                pieces_in_sequence,
            });
        }
        Ok(Self::build(
            rows,
            cols,
            pieces_in_sequence,
            round_pieces,
            square_pieces,
        ))
    }

    fn build(
        rows: usize,
        cols: usize,
        pieces_in_sequence: usize,
        round_pieces: u16,
        square_pieces: u16,
    ) -> Self {
        let per_player = [round_pieces, square_pieces];
        Self {
            rows,
            cols,
            pieces_in_sequence,
            cells: vec![None; rows * cols],
            heights: vec![0; cols],
            remaining: [per_player, per_player],
            turn: PColor::White,
            winner: Winner::None,
            undo_stack: Vec::with_capacity(rows * cols),
            win_corridors: Arc::new(build_win_corridors(rows, cols, pieces_in_sequence)),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn pieces_in_sequence(&self) -> usize {
        self.pieces_in_sequence
    }

    /// Color of the player to move.
    #[inline]
    pub fn turn(&self) -> PColor {
        self.turn
    }

    #[inline]
    pub fn move_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[inline]
    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    #[inline]
    pub fn column_height(&self, col: usize) -> usize {
        self.heights.get(col).copied().unwrap_or(self.rows)
    }

    #[inline]
    pub fn is_column_full(&self, col: usize) -> bool {
        self.column_height(col) >= self.rows
    }

    /// Pieces of `shape` that `color` can still play.
    #[inline]
    pub fn piece_count(&self, color: PColor, shape: PShape) -> u16 {
        self.remaining[color.index()][shape.index()]
    }

    /// Every straight line long enough to hold a winning sequence.
    #[inline]
    pub fn win_corridors(&self) -> &[Vec<Pos>] {
        &self.win_corridors
    }

    #[inline]
    pub fn last_move(&self) -> Option<UndoState> {
        self.undo_stack.last().copied()
    }

    #[inline]
    pub fn history(&self) -> &[UndoState] {
        &self.undo_stack
    }

    /// Outcome after the most recent move.
    #[inline]
    pub fn check_winner(&self) -> Winner {
        self.winner
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        !self.winner.is_over()
            && mv.column < self.cols
            && !self.is_column_full(mv.column)
            && self.piece_count(self.turn, mv.shape) > 0
    }

    /// Drop a piece of the mover's color; returns the row it landed on.
    pub fn apply_move(&mut self, mv: Move) -> BoardResult<usize> {
        if self.winner.is_over() {
            return Err(BoardError::GameAlreadyOver);
        }
        if mv.column >= self.cols {
            return Err(BoardError::ColumnOutOfRange(mv.column));
        }
        if self.is_column_full(mv.column) {
            return Err(BoardError::ColumnFull(mv.column));
        }
        let color = self.turn;
        if self.piece_count(color, mv.shape) == 0 {
            return Err(BoardError::NoPiecesLeft(color, mv.shape));
        }

        let row = self.heights[mv.column];
        self.cells[row * self.cols + mv.column] = Some(Piece::new(color, mv.shape));
        self.heights[mv.column] += 1;
        self.remaining[color.index()][mv.shape.index()] -= 1;
        self.undo_stack.push(UndoState { mv, row, color });
        self.turn = color.opposite();
        self.winner = self.winner_after_drop(Pos::new(row, mv.column));

        Ok(row)
    }

    /// Revert the most recent `apply_move`.
    pub fn undo_last_move(&mut self) -> BoardResult<Move> {
        let undo = self.undo_stack.pop().ok_or(BoardError::NothingToUndo)?;
        self.cells[undo.row * self.cols + undo.mv.column] = None;
        self.heights[undo.mv.column] -= 1;
        self.remaining[undo.color.index()][undo.mv.shape.index()] += 1;
        self.turn = undo.color;
        // Moves are only accepted on undecided boards.
        self.winner = Winner::None;
        Ok(undo.mv)
    }

    /// Recompute the outcome from scratch by scanning every corridor.
    ///
    /// Agrees with `check_winner` on any board reached through `apply_move`.
    pub fn scan_winner(&self) -> Winner {
        let mut shape_lines = [false; 2];
        let mut color_lines = [false; 2];

        for corridor in self.win_corridors.iter() {
            for (shape, found) in [PShape::Round, PShape::Square].into_iter().zip(&mut shape_lines)
            {
                if !*found {
                    *found = self.longest_run(corridor, |p| p.shape == shape)
                        >= self.pieces_in_sequence;
                }
            }
            for (color, found) in [PColor::White, PColor::Red].into_iter().zip(&mut color_lines) {
                if !*found {
                    *found = self.longest_run(corridor, |p| p.color == color)
                        >= self.pieces_in_sequence;
                }
            }
        }

        // Round lines belong to White and square lines to Red, so the shape
        // index doubles as the owner's color index.
        match (shape_lines, color_lines) {
            ([true, true], _) => Winner::Draw,
            ([true, false], _) => Winner::White,
            ([false, true], _) => Winner::Red,
            (_, [true, true]) => Winner::Draw,
            (_, [true, false]) => Winner::White,
            (_, [false, true]) => Winner::Red,
            _ => self.exhaustion_outcome(),
        }
    }

    /// Human-readable grid, top row first.
    #[inline]
    pub fn render(&self) -> String {
        render_board(self)
    }

    fn longest_run(&self, corridor: &[Pos], matches: impl Fn(Piece) -> bool) -> usize {
        let mut best = 0;
        let mut run = 0;
        for pos in corridor {
            match self.piece_at(pos.row, pos.col) {
                Some(piece) if matches(piece) => {
                    run += 1;
                    best = best.max(run);
                }
                _ => run = 0,
            }
        }
        best
    }

    fn winner_after_drop(&self, pos: Pos) -> Winner {
        let Some(piece) = self.piece_at(pos.row, pos.col) else {
            return Winner::None;
        };

        if self.line_through(pos, |p| p.shape == piece.shape) {
            return Winner::from_color(piece.shape.owner());
        }
        if self.line_through(pos, |p| p.color == piece.color) {
            return Winner::from_color(piece.color);
        }
        self.exhaustion_outcome()
    }

    fn exhaustion_outcome(&self) -> Winner {
        let board_full = self.heights.iter().all(|&h| h >= self.rows);
        let mover = self.remaining[self.turn.index()];
        if board_full || mover.iter().all(|&n| n == 0) {
            Winner::Draw
        } else {
            Winner::None
        }
    }

    fn line_through(&self, pos: Pos, matches: impl Fn(Piece) -> bool) -> bool {
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let run = 1
                + self.run_length(pos, dr, dc, &matches)
                + self.run_length(pos, -dr, -dc, &matches);
            run >= self.pieces_in_sequence
        })
    }

    fn run_length(
        &self,
        pos: Pos,
        dr: isize,
        dc: isize,
        matches: &impl Fn(Piece) -> bool,
    ) -> usize {
        let mut count = 0;
        let mut row = pos.row as isize + dr;
        let mut col = pos.col as isize + dc;
        while row >= 0 && col >= 0 {
            match self.piece_at(row as usize, col as usize) {
                Some(piece) if matches(piece) => count += 1,
                _ => break,
            }
            row += dr;
            col += dc;
        }
        count
    }
}

fn build_win_corridors(rows: usize, cols: usize, pieces_in_sequence: usize) -> Vec<Vec<Pos>> {
    let in_bounds =
        |r: isize, c: isize| r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols;
    let mut corridors = Vec::new();

    for &(dr, dc) in &DIRECTIONS {
        for row in 0..rows as isize {
            for col in 0..cols as isize {
                // Only start from cells whose predecessor lies off the board.
                if in_bounds(row - dr, col - dc) {
                    continue;
                }
                let mut line = Vec::new();
                let (mut r, mut c) = (row, col);
                while in_bounds(r, c) {
                    line.push(Pos::new(r as usize, c as usize));
                    r += dr;
                    c += dc;
                }
                if line.len() >= pieces_in_sequence {
                    corridors.push(line);
                }
            }
        }
    }

    corridors
}
