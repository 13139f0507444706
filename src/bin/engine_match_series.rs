//! Standalone engine-vs-engine series runner.
//!
//! Run with:
//! `cargo run --release --bin engine_match_series`
//! `cargo run --release --bin engine_match_series -- --verbose`
//!
//! Set `RUST_LOG=shape_links=debug` to see per-depth search logs on stderr.

use shape_links::engines::engine_bee::BeeEngine;
use shape_links::engines::engine_trait::Engine;
use shape_links::utils::engine_match_harness::{
    play_engine_match_series, MatchConfig, MatchSeriesConfig,
};
use tracing_subscriber::EnvFilter;

fn bee(config: &str) -> Box<dyn Engine> {
    let mut engine = BeeEngine::new();
    if let Err(err) = engine.setup(config) {
        eprintln!("invalid engine config '{config}': {err}");
    }
    Box::new(engine)
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose" || a == "-v");

    // Customize these two lines to experiment with different configurations.
    let player1 = || bee("search=pvs eval=honeycomb time=100");
    let player2 = || bee("search=alphabeta eval=neighbors time=100");

    let stats = play_engine_match_series(
        player1,
        player2,
        MatchSeriesConfig {
            games: 10,
            base_seed: 1234,
            per_game: MatchConfig {
                opening_min_plies: 0,
                opening_max_plies: 4,
                time_limit_ms: Some(100),
                ..MatchConfig::default()
            },
            verbose,
        },
    )?;

    println!("{}", stats.report());
    println!("outcomes: {:?}", stats.outcomes);
    Ok(())
}
