//! Stdio front-end for the engine.
//!
//! Protocol replies go to stdout; tracing output goes to stderr and is
//! filtered with `RUST_LOG` (e.g. `RUST_LOG=shape_links=debug`).

use shape_links::protocol::protocol_top::run_stdio_loop;
use tracing_subscriber::EnvFilter;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    run_stdio_loop()
}
