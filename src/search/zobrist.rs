//! Zobrist hashing support for fast position identity.
//!
//! One random key per `(square, shape, color)` triple. A position's key is the
//! XOR of the keys of its occupied squares, so placing or removing a single
//! piece is the same O(1) XOR. The side to move is implied by the piece count
//! and is not hashed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::board_types::*;

#[derive(Debug, Clone)]
pub struct ZobristKeys {
    cols: usize,
    rows: usize,
    // [(col * rows + row) * 4 + color * 2 + shape]
    keys: Vec<u64>,
}

impl ZobristKeys {
    /// Keys drawn from an OS-seeded generator.
    pub fn new(cols: usize, rows: usize) -> Self {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        Self::from_rng(cols, rows, &mut rng)
    }

    /// Reproducible keys, useful for tests and benchmarks.
    pub fn with_seed(cols: usize, rows: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::from_rng(cols, rows, &mut rng)
    }

    fn from_rng(cols: usize, rows: usize, rng: &mut impl Rng) -> Self {
        let keys = (0..cols * rows * 2 * 2).map(|_| rng.random::<u64>()).collect();
        Self { cols, rows, keys }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// True when these keys were generated for a board of this size.
    #[inline]
    pub fn fits(&self, board: &Board) -> bool {
        self.cols == board.cols() && self.rows == board.rows()
    }

    /// Return the key for a single `(column, row, color, shape)` occupancy term.
    #[inline]
    pub fn piece_key(&self, column: usize, row: usize, color: PColor, shape: PShape) -> u64 {
        self.keys[(column * self.rows + row) * 4 + color.index() * 2 + shape.index()]
    }

    /// Compute the full key by XOR-ing every occupied square.
    pub fn hash_board(&self, board: &Board) -> u64 {
        let mut key = 0u64;
        for col in 0..board.cols().min(self.cols) {
            for row in 0..board.rows().min(self.rows) {
                if let Some(piece) = board.piece_at(row, col) {
                    key ^= self.piece_key(col, row, piece.color, piece.shape);
                }
            }
        }
        key
    }

    /// Toggle one piece in or out of `key`.
    ///
    /// Applying the same update twice returns the original key, so this is
    /// used both after a drop and after the matching undo.
    #[inline]
    #[must_use]
    pub fn update_hash(
        &self,
        column: usize,
        row: usize,
        color: PColor,
        shape: PShape,
        key: u64,
    ) -> u64 {
        key ^ self.piece_key(column, row, color, shape)
    }
}
