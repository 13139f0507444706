//! Random-move engine.
//!
//! Selects uniformly from legal moves and is used as a baseline opponent in
//! match series and for diagnostics.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_trait::{Engine, EngineError, EngineOutput};
use crate::game_state::board_types::*;
use crate::search::cancellation::CancellationToken;
use crate::search::move_ordering::ordered_moves;

pub struct RandomEngine {
    rng: StdRng,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Random"
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        if name.eq_ignore_ascii_case("seed") {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|_| EngineError::invalid(name, format!("'{value}' is not a seed")))?;
            self.rng = StdRng::seed_from_u64(seed);
            return Ok(());
        }
        Err(EngineError::invalid(name, "unknown option"))
    }

    fn think(
        &mut self,
        board: &mut Board,
        _cancel: &CancellationToken,
        _time_limit_ms: Option<u64>,
    ) -> Result<EngineOutput, EngineError> {
        let mut out = EngineOutput::default();
        if board.check_winner().is_over() {
            return Ok(out);
        }

        let legal_moves = ordered_moves(board);
        out.info_lines.push(format!(
            "info string random_engine legal_moves {}",
            legal_moves.len()
        ));
        out.best_move = legal_moves.choose(&mut self.rng).copied();
        Ok(out)
    }
}
