//! Crate root module declarations for the shape-links search engine.
//!
//! Exposes the board model, the search core (hashing, transposition table,
//! negamax and iterative deepening), the engine layer, the stdio protocol and
//! utility helpers so binaries, benches and tests share stable module paths.

pub mod game_state {
    pub mod board;
    pub mod board_errors;
    pub mod board_rules;
    pub mod board_types;
    pub mod undo_state;
}

pub mod search {
    pub mod board_scoring;
    pub mod cancellation;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod negamax;
    pub mod score;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_bee;
    pub mod engine_config;
    pub mod engine_random;
    pub mod engine_trait;
    pub mod time_management;
}

pub mod protocol {
    pub mod protocol_top;
}

pub mod utils {
    pub mod engine_match_harness;
    pub mod render_board;
}
