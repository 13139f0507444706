//! Iterative-deepening negamax engine.
//!
//! Owns one transposition table and one Zobrist key set for its whole
//! lifetime. Keys are rebuilt when the board size or the configured seed
//! changes. The table is cleared on `new_game`, when the keys change and
//! when the evaluation function changes, since stored scores belong to one
//! heuristic.

use tracing::warn;

use crate::engines::engine_config::EngineConfig;
use crate::engines::engine_trait::{Engine, EngineError, EngineOutput};
use crate::game_state::board_rules::{DEFAULT_COLS, DEFAULT_ROWS};
use crate::game_state::board_types::*;
use crate::search::board_scoring::{BoardScorer, ScorerKind};
use crate::search::cancellation::CancellationToken;
use crate::search::iterative_deepening::iterative_deepening_search;
use crate::search::move_ordering::ordered_moves;
use crate::search::negamax::principal_variation_from_tt;
use crate::search::score::{Score, LOSS_SCORE, WIN_SCORE};
use crate::search::transposition_table::TranspositionTable;
use crate::search::zobrist::ZobristKeys;

const DEFAULT_HASH_MB: usize = 16;

pub struct BeeEngine {
    config: EngineConfig,
    scorer: Box<dyn BoardScorer>,
    scorer_kind: ScorerKind,
    keys: ZobristKeys,
    keys_seed: Option<u64>,
    tt: TranspositionTable,
}

impl BeeEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            scorer: config.eval.build(),
            scorer_kind: config.eval,
            keys: make_keys(DEFAULT_COLS, DEFAULT_ROWS, config.seed),
            keys_seed: config.seed,
            tt: TranspositionTable::new_with_mb(DEFAULT_HASH_MB),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rebuild derived state after the config changed.
    fn refresh(&mut self) {
        if self.scorer_kind != self.config.eval {
            self.scorer = self.config.eval.build();
            self.scorer_kind = self.config.eval;
            self.tt.clear();
        }
        if self.keys_seed != self.config.seed {
            self.keys = make_keys(self.keys.cols(), self.keys.rows(), self.config.seed);
            self.keys_seed = self.config.seed;
            self.tt.clear();
        }
    }

    fn ensure_keys_fit(&mut self, board: &Board) {
        if !self.keys.fits(board) {
            self.keys = make_keys(board.cols(), board.rows(), self.config.seed);
            self.keys_seed = self.config.seed;
            self.tt.clear();
        }
    }
}

impl Default for BeeEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn make_keys(cols: usize, rows: usize, seed: Option<u64>) -> ZobristKeys {
    match seed {
        Some(seed) => ZobristKeys::with_seed(cols, rows, seed),
        None => ZobristKeys::new(cols, rows),
    }
}

fn format_score(score: Score) -> String {
    if score == WIN_SCORE {
        "win".to_owned()
    } else if score == LOSS_SCORE {
        "loss".to_owned()
    } else {
        format!("{score:.1}")
    }
}

impl Engine for BeeEngine {
    fn name(&self) -> &str {
        "Bee"
    }

    fn new_game(&mut self) {
        self.tt.clear();
    }

    /// Replace the whole configuration; unspecified keys return to defaults.
    fn setup(&mut self, config: &str) -> Result<(), EngineError> {
        self.config = EngineConfig::parse(config)?;
        self.refresh();
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        self.config.apply(name, value)?;
        self.refresh();
        Ok(())
    }

    fn think(
        &mut self,
        board: &mut Board,
        cancel: &CancellationToken,
        time_limit_ms: Option<u64>,
    ) -> Result<EngineOutput, EngineError> {
        let mut out = EngineOutput::default();
        if board.check_winner().is_over() {
            out.info_lines
                .push(format!("info string game over: {:?}", board.check_winner()));
            return Ok(out);
        }

        self.ensure_keys_fit(board);
        let search_config = self.config.search_config(time_limit_ms);
        let tt = self.config.use_hash.then_some(&mut self.tt);

        let result = iterative_deepening_search(
            board,
            &self.keys,
            self.scorer.as_ref(),
            tt,
            cancel,
            search_config,
        )?;

        out.best_move = result.best_move;
        // Without a completed depth there is no score to report.
        let score = if result.reached_depth == 0 {
            "none".to_owned()
        } else {
            format_score(result.score)
        };
        out.info_lines.push(format!(
            "info depth {} score {} nodes {} time {} nps {}",
            result.reached_depth, score, result.nodes, result.elapsed_ms, result.nps
        ));
        out.info_lines.push(format!(
            "info string bee search {} eval {} max_depth {}",
            self.config.variant.as_str(),
            self.config.eval.as_str(),
            self.config.max_depth
        ));
        if let Some(limit) = search_config.time_limit {
            out.info_lines.push(format!(
                "info string bee time_limit_ms {} interrupted {}",
                limit.as_millis(),
                result.interrupted
            ));
        }

        if self.config.use_hash {
            out.info_lines.push(format!(
                "info string tt probes {} hits {} stores {} size_entries {}",
                result.tt_stats.probes,
                result.tt_stats.hits,
                result.tt_stats.stores,
                self.tt.len()
            ));
            let pv = principal_variation_from_tt(
                board,
                &self.keys,
                &mut self.tt,
                usize::from(result.reached_depth),
            );
            if !pv.is_empty() {
                let pv_text: Vec<String> = pv.iter().map(Move::to_string).collect();
                out.info_lines.push(format!("info pv {}", pv_text.join(" ")));
            }
        }

        if out.best_move.is_none() {
            out.best_move = ordered_moves(board).first().copied();
            if let Some(mv) = out.best_move {
                warn!(%mv, "no depth completed in time, playing fallback move");
                out.info_lines
                    .push(format!("info string bee fallback move {mv}"));
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::BeeEngine;
    use crate::engines::engine_config::EngineConfig;
    use crate::engines::engine_trait::{Engine, EngineError, EngineOutput};
    use crate::game_state::board_types::*;
    use crate::search::cancellation::CancellationToken;

    fn engine(config: &str) -> BeeEngine {
        let mut engine = BeeEngine::new();
        engine.setup(config).expect("config should parse");
        engine
    }

    #[test]
    fn empty_board_returns_legal_move_and_restores_board() {
        let mut engine = engine("depth=2 time=0 seed=1");
        let mut board = Board::default();
        let cancel = CancellationToken::new();

        let out = engine
            .think(&mut board, &cancel, None)
            .expect("engine should think");

        let mv = out.best_move.expect("engine should choose a move");
        assert!(mv.column <= 6);
        assert_eq!(board.move_count(), 0);
        assert!(out.info_lines.iter().any(|l| l.starts_with("info depth 2")));
    }

    #[test]
    fn takes_the_winning_move() {
        let mut engine = engine("depth=4 time=0 seed=3 search=alphabeta");
        let mut board = Board::default();
        for (col, shape) in [
            (0, PShape::Round),
            (6, PShape::Square),
            (1, PShape::Round),
            (6, PShape::Square),
            (2, PShape::Round),
            (5, PShape::Round),
        ] {
            board
                .apply_move(Move::new(col, shape))
                .expect("move should apply");
        }
        let cancel = CancellationToken::new();

        let out = engine
            .think(&mut board, &cancel, None)
            .expect("engine should think");

        assert_eq!(out.best_move, Some(Move::new(3, PShape::Round)));
        assert!(out.info_lines.iter().any(|l| l.contains("score win")));
    }

    #[test]
    fn cancelled_search_falls_back_to_first_legal_move() {
        let mut engine = engine("seed=2");
        let mut board = Board::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let out = engine
            .think(&mut board, &cancel, Some(50))
            .expect("engine should think");

        assert_eq!(out.best_move, Some(Move::new(3, PShape::Round)));
        assert!(out.info_lines.iter().any(|l| l.contains("fallback")));
        assert!(
            out.info_lines
                .iter()
                .any(|l| l.starts_with("info depth 0 score none")),
            "{:?}",
            out.info_lines
        );
    }

    #[test]
    fn switching_eval_discards_cached_scores() {
        let mut board = Board::default();
        for (col, shape) in [(3, PShape::Round), (2, PShape::Square), (4, PShape::Round)] {
            board
                .apply_move(Move::new(col, shape))
                .expect("move should apply");
        }
        let cancel = CancellationToken::new();

        let mut switched = engine("depth=3 start_depth=3 time=0 seed=11 eval=honeycomb");
        switched
            .think(&mut board, &cancel, None)
            .expect("engine should think");
        switched
            .set_option("eval", "center")
            .expect("valid eval");
        let after_switch = switched
            .think(&mut board, &cancel, None)
            .expect("engine should think");

        let mut fresh = engine("depth=3 start_depth=3 time=0 seed=11 eval=center");
        let expected = fresh
            .think(&mut board, &cancel, None)
            .expect("engine should think");

        // Depth, score and node count; timing differs between runs.
        let summary = |out: &EngineOutput| {
            out.info_lines[0]
                .split(" time ")
                .next()
                .map(str::to_owned)
                .unwrap_or_default()
        };
        assert_eq!(after_switch.best_move, expected.best_move);
        assert_eq!(summary(&after_switch), summary(&expected));
    }

    #[test]
    fn finished_game_yields_no_move() {
        let mut engine = engine("depth=2 time=0");
        let mut board = Board::new(1, 4, 2, 2, 2).expect("valid board");
        board
            .apply_move(Move::new(0, PShape::Round))
            .expect("move should apply");
        board
            .apply_move(Move::new(1, PShape::Round))
            .expect("move should apply");
        assert!(board.check_winner().is_over());

        let out = engine
            .think(&mut board, &CancellationToken::new(), None)
            .expect("engine should think");
        assert_eq!(out.best_move, None);
    }

    #[test]
    fn adapts_to_board_size_changes() {
        let mut engine = engine("depth=3 time=0 seed=4");
        let cancel = CancellationToken::new();

        let mut small = Board::new(4, 5, 3, 6, 6).expect("valid board");
        let out = engine
            .think(&mut small, &cancel, None)
            .expect("engine should think");
        assert!(out.best_move.is_some_and(|m| m.column < 5));

        let mut standard = Board::default();
        let out = engine
            .think(&mut standard, &cancel, None)
            .expect("engine should think");
        assert!(out.best_move.is_some_and(|m| m.column < 7));
    }

    #[test]
    fn hash_off_skips_table_report() {
        let mut engine = engine("depth=2 time=0 hash=off");
        let mut board = Board::default();
        let out = engine
            .think(&mut board, &CancellationToken::new(), None)
            .expect("engine should think");
        assert!(out.best_move.is_some());
        assert!(!out.info_lines.iter().any(|l| l.starts_with("info string tt")));
    }

    #[test]
    fn options_are_validated() {
        let mut engine = BeeEngine::new();
        engine.set_option("eval", "center").expect("valid eval");
        assert_eq!(engine.config().eval.as_str(), "center");

        let err = engine.set_option("book", "on").expect_err("unknown option");
        assert!(matches!(err, EngineError::InvalidOption { ref name, .. } if name == "book"));

        engine.setup("").expect("empty setup is valid");
        assert_eq!(*engine.config(), EngineConfig::default());
    }
}
