//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so the binary runs without
//! any config file on disk.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    evaluator: EvaluatorDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    iterations: u32,
    exploration_constant: f64,
    max_rollout_depth: u32,
    time_budget_ms: u64,
    branching_factor: usize,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct EvaluatorDefaults {
    kind: String,
    material_scale_cp: f64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Search
pub fn iterations() -> u32 {
    DEFAULTS.search.iterations
}
pub fn exploration_constant() -> f64 {
    DEFAULTS.search.exploration_constant
}
pub fn max_rollout_depth() -> u32 {
    DEFAULTS.search.max_rollout_depth
}
pub fn time_budget_ms() -> u64 {
    DEFAULTS.search.time_budget_ms
}
pub fn branching_factor() -> usize {
    DEFAULTS.search.branching_factor
}
pub fn seed() -> u64 {
    DEFAULTS.search.seed
}

// Evaluator
pub fn evaluator_kind() -> &'static str {
    &DEFAULTS.evaluator.kind
}
pub fn material_scale_cp() -> f64 {
    DEFAULTS.evaluator.material_scale_cp
}
