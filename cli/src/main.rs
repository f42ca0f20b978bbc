//! chess-mcts - Monte Carlo Tree Search move picker
//!
//! By default a one-shot command that:
//! 1. Loads search settings from config.toml, env vars and flags
//! 2. Parses the position given with `--fen`
//! 3. Runs a UCT search with the chosen leaf evaluator
//! 4. Prints `bestmove <uci>` on stdout
//!
//! With `--stdin` it instead answers one FEN per input line until the
//! input closes.

use anyhow::Result;
use clap::Parser;
use std::io;
use tracing::info;

mod config;
mod runner;

use crate::config::Config;
use crate::runner::Runner;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the answer; logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;

    let runner = Runner::new(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if config.stdin {
        info!("Reading positions from stdin, one FEN per line");
        let answered = runner.run_lines(io::stdin().lock(), &mut out)?;
        info!(answered, "Input closed");
        Ok(())
    } else {
        runner.run_fen(&config.fen, &mut out)
    }
}
