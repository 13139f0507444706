//! Iterative deepening controller around the negamax search core.
//!
//! Runs the search at increasing depth limits until the deadline passes, the
//! caller cancels, a proven result appears, or the remaining empty cells
//! bound the game. Only fully completed depths are reported; an interrupted
//! depth is thrown away.

use std::time::{Duration, Instant};

use tracing::{debug, trace_span};

use crate::engines::time_management::deadline_budget;
use crate::game_state::board_errors::BoardError;
use crate::game_state::board_types::*;
use crate::search::board_scoring::BoardScorer;
use crate::search::cancellation::CancellationToken;
use crate::search::negamax::{negamax, SearchContext, SearchError, SearchVariant};
use crate::search::score::{is_proven, Score, LOSS_SCORE, WIN_SCORE};
use crate::search::transposition_table::{TTStats, TranspositionTable};
use crate::search::zobrist::ZobristKeys;

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub start_depth: u8,
    pub max_depth: u8,
    /// Externally imposed limit; `None` searches until `max_depth`.
    pub time_limit: Option<Duration>,
    /// Fraction of `time_limit` held back as a safety margin.
    pub wiggle: f32,
    pub variant: SearchVariant,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start_depth: 2,
            max_depth: 24,
            time_limit: None,
            wiggle: 0.12,
            variant: SearchVariant::Pvs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeepeningResult {
    /// `None` when not even the first depth finished in time.
    pub best_move: Option<Move>,
    pub score: Score,
    /// Deepest limit that completed; 0 if none did.
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub nps: u64,
    pub tt_stats: TTStats,
    /// True when the loop ended on cancellation or the deadline.
    pub interrupted: bool,
}

impl Default for DeepeningResult {
    fn default() -> Self {
        Self {
            best_move: None,
            score: 0.0,
            reached_depth: 0,
            nodes: 0,
            elapsed_ms: 0,
            nps: 0,
            tt_stats: TTStats::default(),
            interrupted: false,
        }
    }
}

/// Search `board` for the player to move.
///
/// The board is borrowed mutably for the duration of the call and handed
/// back unchanged. `keys` must have been generated for the board's size.
/// Only board errors escape; cancellation and timeouts end the loop and are
/// reported through `interrupted`.
pub fn iterative_deepening_search<S: BoardScorer + ?Sized>(
    board: &mut Board,
    keys: &ZobristKeys,
    scorer: &S,
    mut tt: Option<&mut TranspositionTable>,
    cancel: &CancellationToken,
    config: SearchConfig,
) -> Result<DeepeningResult, BoardError> {
    let span = trace_span!("iterative_deepening", variant = config.variant.as_str());
    let _guard = span.enter();

    let started_at = Instant::now();
    let deadline = config
        .time_limit
        .map(|limit| started_at + deadline_budget(limit, config.wiggle));

    if let Some(tt) = tt.as_deref_mut() {
        tt.new_generation();
        tt.reset_stats();
    }

    // Past the number of empty cells every line has reached the end of the
    // game, so deeper limits cannot change the answer.
    let empty_cells = board.rows() * board.cols() - board.move_count();
    let horizon = config
        .max_depth
        .min(u8::try_from(empty_cells).unwrap_or(u8::MAX))
        .max(1);
    let first = config.start_depth.clamp(1, horizon);

    let root_key = keys.hash_board(board);
    let mut result = DeepeningResult::default();
    let mut nodes = 0u64;

    for depth in first..=horizon {
        if cancel.is_cancelled() || deadline.is_some_and(|d| Instant::now() >= d) {
            debug!(depth, "stopping before depth: out of time or cancelled");
            result.interrupted = true;
            break;
        }

        let mut ctx = SearchContext::new(scorer, keys, tt.as_deref_mut(), cancel, config.variant)
            .with_deadline(deadline);
        let outcome = negamax(board, root_key, 0, depth, LOSS_SCORE, WIN_SCORE, &mut ctx);
        nodes += ctx.nodes;

        match outcome {
            Ok(found) => {
                result.best_move = found.best_move;
                result.score = found.score;
                result.reached_depth = depth;
                debug!(
                    depth,
                    score = found.score,
                    best = ?found.best_move,
                    nodes,
                    elapsed_ms = started_at.elapsed().as_millis() as u64,
                    "depth complete"
                );
                if is_proven(found.score) {
                    debug!(depth, "proven result, stopping");
                    break;
                }
            }
            Err(SearchError::Aborted) => {
                debug!(depth, nodes, "depth aborted, keeping last completed depth");
                result.interrupted = true;
                break;
            }
            Err(SearchError::Board(err)) => return Err(err),
        }
    }

    result.nodes = nodes;
    result.elapsed_ms = started_at.elapsed().as_millis() as u64;
    result.nps = if result.elapsed_ms == 0 {
        0
    } else {
        nodes.saturating_mul(1000) / result.elapsed_ms
    };
    result.tt_stats = tt.as_deref().map(|t| t.stats()).unwrap_or_default();

    Ok(result)
}
