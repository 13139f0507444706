//! Negamax search with alpha-beta pruning and an optional principal
//! variation (NegaScout) mode.
//!
//! The board is mutated in place. Every move goes through `AppliedMove`, a
//! guard that undoes the move when dropped, so cutoffs, aborts and errors all
//! leave the board exactly as it was handed in. Aborts travel up the stack as
//! `Err(SearchError::Aborted)` and can never be compared as a score.

use std::error::Error;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Instant;

use crate::game_state::board_errors::BoardError;
use crate::game_state::board_types::*;
use crate::search::board_scoring::BoardScorer;
use crate::search::cancellation::CancellationToken;
use crate::search::move_ordering::ordered_moves;
use crate::search::score::{next_up, Score, DRAW_SCORE, LOSS_SCORE, WIN_SCORE};
use crate::search::transposition_table::{Bound, TTEntry, TTStats, TranspositionTable};
use crate::search::zobrist::ZobristKeys;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchVariant {
    AlphaBeta,
    Pvs,
}

impl SearchVariant {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "alphabeta" | "alpha-beta" | "ab" => Some(SearchVariant::AlphaBeta),
            "pvs" | "negascout" => Some(SearchVariant::Pvs),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchVariant::AlphaBeta => "alphabeta",
            SearchVariant::Pvs => "pvs",
        }
    }
}

/// Move and score produced by one node. `best_move` is `None` at leaves and
/// terminal positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: Score,
}

impl SearchResult {
    #[inline]
    pub const fn leaf(score: Score) -> Self {
        Self {
            best_move: None,
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Cancellation was requested or the deadline passed.
    Aborted,
    /// The board refused a move the search believed legal.
    Board(BoardError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Aborted => write!(f, "search aborted"),
            SearchError::Board(err) => write!(f, "board rejected search move: {err}"),
        }
    }
}

impl Error for SearchError {}

impl From<BoardError> for SearchError {
    fn from(err: BoardError) -> Self {
        SearchError::Board(err)
    }
}

pub type SearchOutcome<T> = Result<T, SearchError>;

/// Everything a search call needs besides the board and the window.
pub struct SearchContext<'a, S: BoardScorer + ?Sized> {
    pub scorer: &'a S,
    pub keys: &'a ZobristKeys,
    pub tt: Option<&'a mut TranspositionTable>,
    pub cancel: &'a CancellationToken,
    pub deadline: Option<Instant>,
    pub variant: SearchVariant,
    pub nodes: u64,
}

impl<'a, S: BoardScorer + ?Sized> SearchContext<'a, S> {
    pub fn new(
        scorer: &'a S,
        keys: &'a ZobristKeys,
        tt: Option<&'a mut TranspositionTable>,
        cancel: &'a CancellationToken,
        variant: SearchVariant,
    ) -> Self {
        Self {
            scorer,
            keys,
            tt,
            cancel,
            deadline: None,
            variant,
            nodes: 0,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    #[inline]
    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn tt_stats(&self) -> TTStats {
        self.tt.as_ref().map(|tt| tt.stats()).unwrap_or_default()
    }
}

/// A move applied to the board for the lifetime of the guard.
struct AppliedMove<'b> {
    board: &'b mut Board,
    key: u64,
}

impl<'b> AppliedMove<'b> {
    fn apply(board: &'b mut Board, keys: &ZobristKeys, key: u64, mv: Move) -> SearchOutcome<Self> {
        let color = board.turn();
        let row = board.apply_move(mv)?;
        let key = keys.update_hash(mv.column, row, color, mv.shape, key);
        Ok(Self { board, key })
    }
}

impl Deref for AppliedMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for AppliedMove<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for AppliedMove<'_> {
    fn drop(&mut self) {
        let undone = self.board.undo_last_move();
        debug_assert!(undone.is_ok(), "guarded move must be undoable");
    }
}

/// Score of a decided board for the player to move.
fn terminal_score(board: &Board, winner: Winner) -> Score {
    match winner {
        Winner::None | Winner::Draw => DRAW_SCORE,
        w if w == Winner::from_color(board.turn()) => WIN_SCORE,
        _ => LOSS_SCORE,
    }
}

/// Search `board` from ply `depth` down to `depth_limit`.
///
/// `key` must be the Zobrist key of `board` under `ctx.keys`. The returned
/// score is fail-soft with respect to `(alpha, beta)`.
pub fn negamax<S: BoardScorer + ?Sized>(
    board: &mut Board,
    key: u64,
    depth: u8,
    depth_limit: u8,
    mut alpha: Score,
    mut beta: Score,
    ctx: &mut SearchContext<'_, S>,
) -> SearchOutcome<SearchResult> {
    if ctx.should_stop() {
        return Err(SearchError::Aborted);
    }
    ctx.nodes += 1;

    let remaining = depth_limit.saturating_sub(depth);

    if let Some(entry) = ctx
        .tt
        .as_deref_mut()
        .and_then(|tt| tt.try_get(key, remaining))
    {
        match entry.bound {
            Bound::Exact => {
                alpha = alpha.max(entry.score);
                beta = beta.min(entry.score);
            }
            Bound::Lower => alpha = alpha.max(entry.score),
            Bound::Upper => beta = beta.min(entry.score),
        }
        if alpha >= beta {
            return Ok(SearchResult {
                best_move: entry.best_move,
                score: entry.score,
            });
        }
    }

    let winner = board.check_winner();
    if winner.is_over() {
        return Ok(SearchResult::leaf(terminal_score(board, winner)));
    }

    if depth >= depth_limit {
        let perspective = board.turn();
        return Ok(SearchResult::leaf(ctx.scorer.score(board, perspective)));
    }

    let alpha_orig = alpha;
    let mut best = SearchResult::leaf(LOSS_SCORE);

    for mv in ordered_moves(board) {
        let score = {
            let mut child = AppliedMove::apply(board, ctx.keys, key, mv)?;
            let child_key = child.key;
            let floor = alpha.max(best.score);

            let full_window = best.best_move.is_none() || ctx.variant == SearchVariant::AlphaBeta;
            if full_window {
                -negamax(&mut child, child_key, depth + 1, depth_limit, -beta, -floor, ctx)?.score
            } else {
                let probe_beta = next_up(floor);
                let probe = -negamax(
                    &mut child,
                    child_key,
                    depth + 1,
                    depth_limit,
                    -probe_beta,
                    -floor,
                    ctx,
                )?
                .score;
                if probe > floor && probe < beta {
                    -negamax(&mut child, child_key, depth + 1, depth_limit, -beta, -floor, ctx)?
                        .score
                } else {
                    probe
                }
            }
        };

        if best.best_move.is_none() || score > best.score {
            best = SearchResult {
                best_move: Some(mv),
                score,
            };
        }
        if best.score >= beta {
            break;
        }
    }

    if best.best_move.is_none() {
        // Undecided board with nothing to play; the board rules make this a
        // draw before it can happen, so treat it the same way.
        return Ok(SearchResult::leaf(DRAW_SCORE));
    }

    let bound = if best.score <= alpha_orig {
        Bound::Upper
    } else if best.score >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    };

    if let Some(tt) = ctx.tt.as_deref_mut() {
        tt.store(TTEntry {
            key,
            depth: remaining,
            score: best.score,
            bound,
            best_move: best.best_move,
        });
    }

    Ok(best)
}

/// Plain minimax in negamax form: no pruning, no table, same move order.
///
/// Slow; exists to check that pruning never changes the chosen move or score.
pub fn exhaustive_negamax<S: BoardScorer + ?Sized>(
    board: &mut Board,
    depth: u8,
    depth_limit: u8,
    scorer: &S,
) -> Result<SearchResult, BoardError> {
    let winner = board.check_winner();
    if winner.is_over() {
        return Ok(SearchResult::leaf(terminal_score(board, winner)));
    }
    if depth >= depth_limit {
        let perspective = board.turn();
        return Ok(SearchResult::leaf(scorer.score(board, perspective)));
    }

    let mut best = SearchResult::leaf(LOSS_SCORE);
    for mv in ordered_moves(board) {
        board.apply_move(mv)?;
        let child = exhaustive_negamax(board, depth + 1, depth_limit, scorer);
        board.undo_last_move()?;
        let score = -child?.score;
        if best.best_move.is_none() || score > best.score {
            best = SearchResult {
                best_move: Some(mv),
                score,
            };
        }
    }

    if best.best_move.is_none() {
        return Ok(SearchResult::leaf(DRAW_SCORE));
    }
    Ok(best)
}

/// Follow stored best moves from `board` to rebuild the expected line.
pub fn principal_variation_from_tt(
    board: &Board,
    keys: &ZobristKeys,
    tt: &mut TranspositionTable,
    max_len: usize,
) -> Vec<Move> {
    let mut line = Vec::new();
    let mut probe = board.clone();
    let mut key = keys.hash_board(&probe);

    while line.len() < max_len {
        let Some(mv) = tt.probe_move(key) else {
            break;
        };
        if !probe.is_legal(mv) {
            break;
        }
        let color = probe.turn();
        let Ok(row) = probe.apply_move(mv) else {
            break;
        };
        key = keys.update_hash(mv.column, row, color, mv.shape, key);
        line.push(mv);
    }

    line
}
