//! Minimal head-to-head engine match harness for local testing.
//!
//! Runs two `Engine` implementations against each other without protocol
//! I/O, starting from a seeded random opening prefix.

use rand::prelude::IndexedRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;

use crate::engines::engine_trait::Engine;
use crate::game_state::board_types::*;
use crate::search::cancellation::CancellationToken;
use crate::search::move_ordering::ordered_moves;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    WhiteWin,
    RedWin,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerId {
    Player1,
    Player2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOutcome {
    PlayerWin { player: PlayerId, color: PColor },
    Draw,
}

#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Empty board every game starts from; its dimensions set the variant.
    pub start: Board,
    pub opening_min_plies: u8,
    pub opening_max_plies: u8,
    pub time_limit_ms: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            start: Board::default(),
            opening_min_plies: 0,
            opening_max_plies: 4,
            time_limit_ms: Some(100),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub final_board: Board,
    pub opening_moves: Vec<Move>,
    pub played_moves: Vec<Move>,
    pub white_move_count: u32,
    pub red_move_count: u32,
    pub white_total_time_ns: u128,
    pub red_total_time_ns: u128,
}

#[derive(Debug, Clone)]
pub struct MatchSeriesConfig {
    pub games: u16,
    pub base_seed: u64,
    pub per_game: MatchConfig,
    pub verbose: bool,
}

impl Default for MatchSeriesConfig {
    fn default() -> Self {
        Self {
            games: 10,
            base_seed: 0,
            per_game: MatchConfig::default(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchSeriesStats {
    pub games: u16,
    pub player1_wins: u16,
    pub player2_wins: u16,
    pub draws: u16,
    pub outcomes: Vec<SeriesOutcome>,
    pub player1_moves: u32,
    pub player2_moves: u32,
    pub player1_total_time_ns: u128,
    pub player2_total_time_ns: u128,
    pub player1_avg_move_time_ms: f64,
    pub player2_avg_move_time_ms: f64,
    pub overall_avg_move_time_ms: f64,
}

impl MatchSeriesStats {
    pub fn report(&self) -> String {
        format!(
            "games={} player1_wins={} player2_wins={} draws={} p1_avg_ms={:.3} p2_avg_ms={:.3} overall_avg_ms={:.3}",
            self.games,
            self.player1_wins,
            self.player2_wins,
            self.draws,
            self.player1_avg_move_time_ms,
            self.player2_avg_move_time_ms,
            self.overall_avg_move_time_ms
        )
    }
}

/// Play a single seeded engine-vs-engine match.
///
/// `engine_white` moves first.
pub fn play_engine_match(
    engine_white: &mut dyn Engine,
    engine_red: &mut dyn Engine,
    seed: u64,
    config: &MatchConfig,
) -> Result<MatchResult, String> {
    engine_white.new_game();
    engine_red.new_game();

    let mut board = config.start.clone();
    let opening_moves = apply_seeded_random_opening(
        &mut board,
        seed,
        config.opening_min_plies,
        config.opening_max_plies,
    )?;

    let cancel = CancellationToken::new();
    let mut played_moves = Vec::<Move>::new();
    let mut white_move_count = 0u32;
    let mut red_move_count = 0u32;
    let mut white_total_time_ns = 0u128;
    let mut red_total_time_ns = 0u128;

    while !board.check_winner().is_over() {
        let legal_moves = ordered_moves(&board);
        let Some(&first_legal) = legal_moves.first() else {
            return Err("undecided board has no legal move".to_owned());
        };

        let mover = board.turn();
        let started = Instant::now();
        let out = match mover {
            PColor::White => engine_white.think(&mut board, &cancel, config.time_limit_ms),
            PColor::Red => engine_red.think(&mut board, &cancel, config.time_limit_ms),
        }
        .map_err(|e| format!("{mover:?} engine failed: {e}"))?;
        let elapsed_ns = started.elapsed().as_nanos();

        match mover {
            PColor::White => {
                white_move_count = white_move_count.saturating_add(1);
                white_total_time_ns = white_total_time_ns.saturating_add(elapsed_ns);
            }
            PColor::Red => {
                red_move_count = red_move_count.saturating_add(1);
                red_total_time_ns = red_total_time_ns.saturating_add(elapsed_ns);
            }
        }

        let chosen = out.best_move.unwrap_or(first_legal);
        if !legal_moves.contains(&chosen) {
            return Err(format!("{mover:?} engine returned illegal move {chosen}"));
        }

        board.apply_move(chosen).map_err(|e| e.to_string())?;
        played_moves.push(chosen);
    }

    let outcome = match board.check_winner() {
        Winner::White => MatchOutcome::WhiteWin,
        Winner::Red => MatchOutcome::RedWin,
        Winner::Draw | Winner::None => MatchOutcome::Draw,
    };

    Ok(MatchResult {
        outcome,
        final_board: board,
        opening_moves,
        played_moves,
        white_move_count,
        red_move_count,
        white_total_time_ns,
        red_total_time_ns,
    })
}

/// Play a series of matches and aggregate win/loss/draw statistics.
///
/// Player 1 is White in even-numbered games and Red in odd-numbered ones.
pub fn play_engine_match_series<F1, F2>(
    player1_factory: F1,
    player2_factory: F2,
    config: MatchSeriesConfig,
) -> Result<MatchSeriesStats, String>
where
    F1: Fn() -> Box<dyn Engine>,
    F2: Fn() -> Box<dyn Engine>,
{
    let mut stats = MatchSeriesStats {
        games: config.games,
        ..MatchSeriesStats::default()
    };
    let mut player1 = player1_factory();
    let mut player2 = player2_factory();

    for i in 0..config.games {
        let player1_is_white = i % 2 == 0;
        let seed = config.base_seed.wrapping_add(u64::from(i / 2));
        if config.verbose {
            let (white, red) = if player1_is_white {
                (player1.name(), player2.name())
            } else {
                (player2.name(), player1.name())
            };
            println!(
                "[series] game {}/{} seed={} white={} red={}",
                i + 1,
                config.games,
                seed,
                white,
                red
            );
        }

        let result = if player1_is_white {
            play_engine_match(player1.as_mut(), player2.as_mut(), seed, &config.per_game)?
        } else {
            play_engine_match(player2.as_mut(), player1.as_mut(), seed, &config.per_game)?
        };

        let (p1_moves, p1_ns, p2_moves, p2_ns) = if player1_is_white {
            (
                result.white_move_count,
                result.white_total_time_ns,
                result.red_move_count,
                result.red_total_time_ns,
            )
        } else {
            (
                result.red_move_count,
                result.red_total_time_ns,
                result.white_move_count,
                result.white_total_time_ns,
            )
        };
        stats.player1_moves = stats.player1_moves.saturating_add(p1_moves);
        stats.player2_moves = stats.player2_moves.saturating_add(p2_moves);
        stats.player1_total_time_ns = stats.player1_total_time_ns.saturating_add(p1_ns);
        stats.player2_total_time_ns = stats.player2_total_time_ns.saturating_add(p2_ns);

        let winning_color = match result.outcome {
            MatchOutcome::WhiteWin => Some(PColor::White),
            MatchOutcome::RedWin => Some(PColor::Red),
            MatchOutcome::Draw => None,
        };
        let mapped = match winning_color {
            Some(color) => {
                let player1_won = (color == PColor::White) == player1_is_white;
                let player = if player1_won {
                    stats.player1_wins += 1;
                    PlayerId::Player1
                } else {
                    stats.player2_wins += 1;
                    PlayerId::Player2
                };
                SeriesOutcome::PlayerWin { player, color }
            }
            None => {
                stats.draws += 1;
                SeriesOutcome::Draw
            }
        };
        stats.outcomes.push(mapped);

        if config.verbose {
            println!("{}", result.final_board.render());
            println!(
                "[series] game {}/{} result={:?} p1_wins={} p2_wins={} draws={}\n",
                i + 1,
                config.games,
                mapped,
                stats.player1_wins,
                stats.player2_wins,
                stats.draws
            );
        }
    }

    stats.player1_avg_move_time_ms =
        avg_ns_per_move_ms(stats.player1_total_time_ns, stats.player1_moves);
    stats.player2_avg_move_time_ms =
        avg_ns_per_move_ms(stats.player2_total_time_ns, stats.player2_moves);

    let total_ns = stats
        .player1_total_time_ns
        .saturating_add(stats.player2_total_time_ns);
    let total_moves = stats.player1_moves.saturating_add(stats.player2_moves);
    stats.overall_avg_move_time_ms = avg_ns_per_move_ms(total_ns, total_moves);

    Ok(stats)
}

#[inline]
fn avg_ns_per_move_ms(total_ns: u128, moves: u32) -> f64 {
    if moves == 0 {
        0.0
    } else {
        (total_ns as f64) / (moves as f64) / 1_000_000.0
    }
}

/// Play random legal moves that do not end the game.
fn apply_seeded_random_opening(
    board: &mut Board,
    seed: u64,
    min_plies: u8,
    max_plies: u8,
) -> Result<Vec<Move>, String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut opening_moves = Vec::<Move>::new();

    let low = min_plies.min(max_plies);
    let high = max_plies.max(min_plies);
    let target_plies = if low == high {
        low
    } else {
        rng.random_range(low..=high)
    };

    for _ in 0..target_plies {
        let quiet: Vec<Move> = ordered_moves(board)
            .into_iter()
            .filter(|&mv| {
                let mut probe = board.clone();
                probe.apply_move(mv).is_ok() && !probe.check_winner().is_over()
            })
            .collect();
        let Some(&chosen) = quiet.choose(&mut rng) else {
            break;
        };
        board.apply_move(chosen).map_err(|e| e.to_string())?;
        opening_moves.push(chosen);
    }

    Ok(opening_moves)
}

#[cfg(test)]
mod tests {
    use super::{
        play_engine_match, play_engine_match_series, MatchConfig, MatchOutcome, MatchSeriesConfig,
        PlayerId, SeriesOutcome,
    };
    use crate::engines::engine_bee::BeeEngine;
    use crate::engines::engine_random::RandomEngine;
    use crate::engines::engine_trait::Engine;
    use crate::game_state::board_types::*;

    fn bee(config: &str) -> Box<dyn Engine> {
        let mut engine = BeeEngine::new();
        engine.setup(config).expect("config should parse");
        Box::new(engine)
    }

    #[test]
    fn engine_match_harness_runs_random_vs_bee() {
        let mut white = RandomEngine::with_seed(1);
        let mut red = bee("depth=2 time=0 seed=1");
        let result = play_engine_match(
            &mut white,
            red.as_mut(),
            42,
            &MatchConfig {
                opening_min_plies: 2,
                opening_max_plies: 4,
                time_limit_ms: None,
                ..MatchConfig::default()
            },
        )
        .expect("match should run");

        assert!(result.opening_moves.len() >= 2);
        assert!(result.white_move_count + result.red_move_count > 0);
        assert!(result.final_board.check_winner().is_over());
        assert_eq!(
            result.final_board.move_count(),
            result.opening_moves.len() + result.played_moves.len()
        );
    }

    #[test]
    fn search_engine_beats_random_on_small_board() {
        let start = Board::new(4, 4, 3, 8, 8).expect("valid board");
        let stats = play_engine_match_series(
            || bee("depth=4 time=0 seed=7"),
            || Box::new(RandomEngine::with_seed(3)),
            MatchSeriesConfig {
                games: 4,
                base_seed: 99,
                per_game: MatchConfig {
                    start,
                    opening_min_plies: 0,
                    opening_max_plies: 0,
                    time_limit_ms: None,
                },
                verbose: false,
            },
        )
        .expect("series should run");

        assert_eq!(stats.games, 4);
        assert_eq!(stats.outcomes.len(), 4);
        assert_eq!(
            stats.player1_wins + stats.player2_wins + stats.draws,
            stats.games
        );
        assert!(stats.player1_wins >= stats.player2_wins);
        assert!(stats.overall_avg_move_time_ms >= 0.0);
        assert!(stats.outcomes.iter().all(|o| match o {
            SeriesOutcome::PlayerWin { player, .. } =>
                matches!(player, PlayerId::Player1 | PlayerId::Player2),
            SeriesOutcome::Draw => true,
        }));
    }

    #[test]
    fn same_seed_replays_same_game() {
        let config = MatchConfig {
            time_limit_ms: None,
            ..MatchConfig::default()
        };
        let play = || {
            let mut white = bee("depth=2 time=0 seed=5");
            let mut red = bee("depth=3 time=0 seed=5");
            play_engine_match(white.as_mut(), red.as_mut(), 11, &config).expect("match should run")
        };
        let a = play();
        let b = play();
        assert_eq!(a.opening_moves, b.opening_moves);
        assert_eq!(a.played_moves, b.played_moves);
        assert!(matches!(
            a.outcome,
            MatchOutcome::WhiteWin | MatchOutcome::RedWin | MatchOutcome::Draw
        ));
    }
}
