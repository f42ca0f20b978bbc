//! Command-line configuration for chess-mcts
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig, EvaluatorKind};
use games_chess::STARTPOS;
use mcts::SearchConfig;
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_iterations() -> u32 {
    CENTRAL_CONFIG.search.iterations
}

fn default_exploration() -> f32 {
    CENTRAL_CONFIG.search.exploration_constant as f32
}

fn default_max_rollout_depth() -> u32 {
    CENTRAL_CONFIG.search.max_rollout_depth
}

fn default_time_budget_ms() -> u64 {
    CENTRAL_CONFIG.search.time_budget_ms
}

fn default_branching_factor() -> usize {
    CENTRAL_CONFIG.search.branching_factor
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.search.seed
}

fn default_evaluator() -> EvaluatorKind {
    CENTRAL_CONFIG.evaluator.kind
}

fn default_material_scale() -> f32 {
    CENTRAL_CONFIG.evaluator.material_scale_cp as f32
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "chess-mcts")]
#[command(about = "Pick a chess move with Monte Carlo Tree Search")]
#[command(
    long_about = "Runs a UCT search from the given FEN position and prints the most
visited root move as `bestmove <uci>` (or `bestmove (none)` when the side to
move has no legal move).

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Position to search, in Forsyth-Edwards Notation
    #[arg(long, default_value = STARTPOS)]
    pub fen: String,

    /// Read one FEN per line from stdin and answer each, ignoring --fen
    #[arg(long)]
    pub stdin: bool,

    /// Number of search iterations
    #[arg(long, default_value_t = default_iterations())]
    pub iterations: u32,

    /// UCB1 exploration constant
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f32,

    /// Maximum plies per random rollout
    #[arg(long, default_value_t = default_max_rollout_depth())]
    pub max_rollout_depth: u32,

    /// Wall-clock limit in milliseconds (0 to disable)
    #[arg(long, default_value_t = default_time_budget_ms())]
    pub time_budget_ms: u64,

    /// Root moves considered (0 for all)
    #[arg(long, default_value_t = default_branching_factor())]
    pub branching_factor: usize,

    /// Seed for the rollout RNG
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Leaf evaluator (rollout, material)
    #[arg(long, default_value_t = default_evaluator())]
    pub evaluator: EvaluatorKind,

    /// Centipawn scale for the material evaluator
    #[arg(long, default_value_t = default_material_scale())]
    pub material_scale: f32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Print visit counts and mean values of every root move
    #[arg(long)]
    pub show_stats: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.fen.trim().is_empty() {
            return Err(anyhow!("fen cannot be empty"));
        }

        if self.iterations == 0 {
            return Err(anyhow!("iterations must be greater than 0"));
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(anyhow!(
                "exploration must be a non-negative number, got {}",
                self.exploration
            ));
        }

        if self.max_rollout_depth == 0 {
            return Err(anyhow!("max_rollout_depth must be greater than 0"));
        }

        if !self.material_scale.is_finite() || self.material_scale <= 0.0 {
            return Err(anyhow!(
                "material_scale must be positive, got {}",
                self.material_scale
            ));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn time_budget(&self) -> Option<Duration> {
        (self.time_budget_ms > 0).then(|| Duration::from_millis(self.time_budget_ms))
    }

    /// Search parameters for the mcts crate.
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default()
            .with_iterations(self.iterations)
            .with_exploration_constant(self.exploration)
            .with_max_rollout_depth(self.max_rollout_depth)
            .with_seed(self.seed);
        if let Some(budget) = self.time_budget() {
            config = config.with_time_budget(budget);
        }
        if self.branching_factor > 0 {
            config = config.with_branching_factor(self.branching_factor);
        }
        config
    }
}
