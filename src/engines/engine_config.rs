//! Engine configuration parsed from `setup` strings and single options.
//!
//! A setup string is a list of `key=value` pairs separated by whitespace or
//! commas, e.g. `depth=10 time=500,search=pvs`. Keys are case-insensitive.

use crate::engines::engine_trait::EngineError;
use crate::engines::time_management::resolve_time_limit;
use crate::search::board_scoring::ScorerKind;
use crate::search::iterative_deepening::SearchConfig;
use crate::search::negamax::SearchVariant;

pub const DEFAULT_MAX_DEPTH: u8 = 24;
pub const DEFAULT_START_DEPTH: u8 = 2;
pub const DEFAULT_TIME_MS: u64 = 1_000;
pub const DEFAULT_WIGGLE: f32 = 0.12;
pub const MAX_WIGGLE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub max_depth: u8,
    pub start_depth: u8,
    /// Budget used when the host does not pass one; `None` means unlimited.
    pub time_ms: Option<u64>,
    pub wiggle: f32,
    pub variant: SearchVariant,
    pub eval: ScorerKind,
    /// Fixed Zobrist seed; `None` draws keys from the OS.
    pub seed: Option<u64>,
    pub use_hash: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            start_depth: DEFAULT_START_DEPTH,
            time_ms: Some(DEFAULT_TIME_MS),
            wiggle: DEFAULT_WIGGLE,
            variant: SearchVariant::Pvs,
            eval: ScorerKind::Honeycomb,
            seed: None,
            use_hash: true,
        }
    }
}

/// Split a setup string into `(key, value)` pairs.
pub fn split_pairs(config: &str) -> impl Iterator<Item = Result<(&str, &str), EngineError>> {
    config
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key, value)),
            _ => Err(EngineError::invalid(token, "expected key=value")),
        })
}

impl EngineConfig {
    /// Defaults overridden by every pair in `config`.
    pub fn parse(config: &str) -> Result<Self, EngineError> {
        let mut parsed = Self::default();
        for pair in split_pairs(config) {
            let (name, value) = pair?;
            parsed.apply(name, value)?;
        }
        Ok(parsed)
    }

    pub fn apply(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "depth" => self.max_depth = parse_depth(name, value)?,
            "start_depth" => self.start_depth = parse_depth(name, value)?,
            "time" => {
                let ms = value.parse::<u64>().map_err(|_| {
                    EngineError::invalid(name, format!("'{value}' is not a number of milliseconds"))
                })?;
                self.time_ms = (ms > 0).then_some(ms);
            }
            "wiggle" => {
                let wiggle = value
                    .parse::<f32>()
                    .ok()
                    .filter(|w| w.is_finite())
                    .ok_or_else(|| {
                        EngineError::invalid(name, format!("'{value}' is not a fraction"))
                    })?;
                self.wiggle = wiggle.clamp(0.0, MAX_WIGGLE);
            }
            "search" => {
                self.variant = SearchVariant::parse(value).ok_or_else(|| {
                    EngineError::invalid(name, format!("unknown search '{value}'"))
                })?;
            }
            "eval" => {
                self.eval = ScorerKind::parse(value).ok_or_else(|| {
                    EngineError::invalid(name, format!("unknown eval '{value}'"))
                })?;
            }
            "seed" => {
                self.seed = if value.eq_ignore_ascii_case("random") {
                    None
                } else {
                    Some(value.parse::<u64>().map_err(|_| {
                        EngineError::invalid(name, format!("'{value}' is not a seed"))
                    })?)
                };
            }
            "hash" => {
                self.use_hash = match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "1" | "yes" => true,
                    "off" | "false" | "0" | "no" => false,
                    _ => {
                        return Err(EngineError::invalid(
                            name,
                            format!("'{value}' is not on/off"),
                        ))
                    }
                };
            }
            _ => return Err(EngineError::invalid(name, "unknown option")),
        }
        Ok(())
    }

    /// Controller settings for one decision.
    pub fn search_config(&self, time_limit_ms: Option<u64>) -> SearchConfig {
        SearchConfig {
            start_depth: self.start_depth.min(self.max_depth),
            max_depth: self.max_depth,
            time_limit: resolve_time_limit(time_limit_ms, self.time_ms),
            wiggle: self.wiggle,
            variant: self.variant,
        }
    }

    /// `key=value` rendering accepted back by `parse`.
    pub fn describe(&self) -> String {
        format!(
            "depth={} start_depth={} time={} wiggle={} search={} eval={} seed={} hash={}",
            self.max_depth,
            self.start_depth,
            self.time_ms.unwrap_or(0),
            self.wiggle,
            self.variant.as_str(),
            self.eval.as_str(),
            self.seed.map_or_else(|| "random".to_owned(), |s| s.to_string()),
            if self.use_hash { "on" } else { "off" },
        )
    }
}

fn parse_depth(name: &str, value: &str) -> Result<u8, EngineError> {
    match value.parse::<u8>() {
        Ok(depth) if depth > 0 => Ok(depth),
        _ => Err(EngineError::invalid(
            name,
            format!("'{value}' is not a depth in 1..=255"),
        )),
    }
}
