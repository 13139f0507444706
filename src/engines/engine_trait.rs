//! Engine abstraction layer used by the protocol front-end.
//!
//! Defines the common output payload and error type so different engine
//! strategies can be selected at runtime behind a single trait interface.

use std::error::Error;
use std::fmt;

use crate::game_state::board_errors::BoardError;
use crate::game_state::board_types::*;
use crate::search::cancellation::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Unknown option name or a value that does not parse.
    InvalidOption { name: String, reason: String },
    Board(BoardError),
}

impl EngineError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidOption {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidOption { name, reason } => {
                write!(f, "invalid option '{name}': {reason}")
            }
            EngineError::Board(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EngineError {}

impl From<BoardError> for EngineError {
    fn from(err: BoardError) -> Self {
        EngineError::Board(err)
    }
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    /// Apply a whole configuration string of `key=value` pairs.
    fn setup(&mut self, config: &str) -> Result<(), EngineError> {
        for pair in crate::engines::engine_config::split_pairs(config) {
            let (name, value) = pair?;
            self.set_option(name, value)?;
        }
        Ok(())
    }

    fn set_option(&mut self, name: &str, _value: &str) -> Result<(), EngineError> {
        Err(EngineError::invalid(name, "unknown option"))
    }

    /// Choose a move for the player to move on `board`.
    ///
    /// The board may be used as scratch space but is returned unchanged.
    /// `time_limit_ms` overrides the engine's configured budget.
    fn think(
        &mut self,
        board: &mut Board,
        cancel: &CancellationToken,
        time_limit_ms: Option<u64>,
    ) -> Result<EngineOutput, EngineError>;
}
