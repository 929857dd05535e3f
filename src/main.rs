//! Headless 2048 runner (default binary).
//!
//! Reads commands from stdin and writes protocol messages to stdout, one JSON
//! object per line. Logs go to stderr; filter with `RUST_LOG`.

use std::io::{self, BufReader};

use anyhow::{Context, Result};
use env_logger::Env;

use twenty48::adapter::{run, AdapterConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = AdapterConfig::from_env();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = run(&config, BufReader::new(io::stdin()), &mut out)
        .context("game session failed")?;

    log::info!(
        "episode {} finished: {} moves, max tile {}, game over: {}",
        summary.episode_id,
        summary.moves,
        summary.max_value,
        summary.game_over
    );
    Ok(())
}
