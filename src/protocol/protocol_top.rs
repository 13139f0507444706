//! Line-based text protocol front-end and command loop.
//!
//! Keeps the current board, routes `think` requests to the selected engine
//! and prints replies on stdout. Commands:
//!
//! ```text
//! setup <key=value ...>          replace the engine configuration
//! setoption <name> <value>       change a single option
//! engine <bee|random>            switch engine; options reset to defaults
//! newgame [rows cols n round square]
//! play <col> <round|square>
//! undo
//! think [ms]                     -> info lines, then `bestmove <col> <shape>`
//! board | winner | quit
//! ```

use std::io::{self, BufRead, Write};

use crate::engines::engine_bee::BeeEngine;
use crate::engines::engine_random::RandomEngine;
use crate::engines::engine_trait::Engine;
use crate::game_state::board_types::*;
use crate::search::cancellation::CancellationToken;

pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut protocol = ProtocolState::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = protocol.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

pub struct ProtocolState {
    board: Board,
    engine: Box<dyn Engine>,
    cancel: CancellationToken,
}

impl Default for ProtocolState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolState {
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            engine: Box::new(BeeEngine::new()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Token another thread may use to interrupt a running `think`.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Handle one input line; returns `true` when the loop should end.
    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let (cmd, rest) = trimmed
            .split_once(char::is_whitespace)
            .map_or((trimmed, ""), |(cmd, rest)| (cmd, rest.trim()));

        let result = match cmd {
            "setup" => self.engine.setup(rest).map_err(|e| e.to_string()),
            "setoption" => self.handle_setoption(rest),
            "engine" => self.handle_engine(rest, out),
            "newgame" => self.handle_newgame(rest),
            "play" => self.handle_play(rest),
            "undo" => self
                .board
                .undo_last_move()
                .map(|_| ())
                .map_err(|e| e.to_string()),
            "think" => self.handle_think(rest, out),
            "board" => writeln!(out, "{}", self.board.render()).map_err(|e| e.to_string()),
            "winner" => writeln!(out, "winner {}", winner_name(self.board.check_winner()))
                .map_err(|e| e.to_string()),
            "quit" => return Ok(true),
            other => Err(format!("unknown command '{other}'")),
        };

        if let Err(err) = result {
            writeln!(out, "info string {cmd} error: {err}")?;
        }
        Ok(false)
    }

    fn handle_setoption(&mut self, rest: &str) -> Result<(), String> {
        let (name, value) = rest
            .split_once(char::is_whitespace)
            .map(|(n, v)| (n, v.trim()))
            .or_else(|| rest.split_once('='))
            .ok_or_else(|| "expected 'setoption <name> <value>'".to_owned())?;
        self.engine.set_option(name, value).map_err(|e| e.to_string())
    }

    /// Earlier `setup`/`setoption` values belong to the old engine and are
    /// not carried over.
    fn handle_engine(&mut self, rest: &str, out: &mut impl Write) -> Result<(), String> {
        self.engine = build_engine(rest)?;
        writeln!(
            out,
            "info string engine {} ready with default options",
            self.engine.name()
        )
        .map_err(|e| e.to_string())
    }

    fn handle_newgame(&mut self, rest: &str) -> Result<(), String> {
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        self.board = match tokens.as_slice() {
            [] => Board::default(),
            [rows, cols, n, round, square] => {
                let dim = |t: &str| {
                    t.parse::<usize>()
                        .map_err(|_| format!("'{t}' is not a board dimension"))
                };
                let count = |t: &str| {
                    t.parse::<u16>()
                        .map_err(|_| format!("'{t}' is not a piece count"))
                };
                Board::new(
                    dim(*rows)?,
                    dim(*cols)?,
                    dim(*n)?,
                    count(*round)?,
                    count(*square)?,
                )
                .map_err(|e| e.to_string())?
            }
            _ => return Err("expected 'newgame [rows cols n round square]'".to_owned()),
        };
        self.engine.new_game();
        self.cancel.reset();
        Ok(())
    }

    fn handle_play(&mut self, rest: &str) -> Result<(), String> {
        let mv = parse_move(rest)?;
        self.board.apply_move(mv).map(|_| ()).map_err(|e| e.to_string())
    }

    fn handle_think(&mut self, rest: &str, out: &mut impl Write) -> Result<(), String> {
        let time_limit_ms = match rest.split_whitespace().next() {
            None => None,
            Some(token) => Some(
                token
                    .parse::<u64>()
                    .map_err(|_| format!("'{token}' is not a number of milliseconds"))?,
            ),
        };

        self.cancel.reset();
        let result = self
            .engine
            .think(&mut self.board, &self.cancel, time_limit_ms)
            .map_err(|e| e.to_string())?;

        for info in &result.info_lines {
            writeln!(out, "{info}").map_err(|e| e.to_string())?;
        }
        let written = match result.best_move {
            Some(mv) => writeln!(out, "bestmove {mv}"),
            None => writeln!(out, "bestmove none"),
        };
        written.map_err(|e| e.to_string())
    }
}

/// Parse `<col> <shape>`.
pub fn parse_move(text: &str) -> Result<Move, String> {
    let mut tokens = text.split_whitespace();
    let column = tokens
        .next()
        .ok_or_else(|| "missing column".to_owned())?
        .parse::<usize>()
        .map_err(|_| "column must be a number".to_owned())?;
    let shape_token = tokens.next().ok_or_else(|| "missing shape".to_owned())?;
    let shape =
        PShape::parse(shape_token).ok_or_else(|| format!("unknown shape '{shape_token}'"))?;
    Ok(Move::new(column, shape))
}

fn winner_name(winner: Winner) -> &'static str {
    match winner {
        Winner::None => "none",
        Winner::White => "white",
        Winner::Red => "red",
        Winner::Draw => "draw",
    }
}

pub fn build_engine(name: &str) -> Result<Box<dyn Engine>, String> {
    match name.trim().to_ascii_lowercase().as_str() {
        "bee" | "" => Ok(Box::new(BeeEngine::new())),
        "random" => Ok(Box::new(RandomEngine::new())),
        other => Err(format!("unknown engine '{other}'")),
    }
}
