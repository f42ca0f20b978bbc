//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;
use std::time::Duration;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_exploration() -> f64 {
    defaults::exploration_constant()
}
fn d_rollout_depth() -> u32 {
    defaults::max_rollout_depth()
}
fn d_time_budget_ms() -> u64 {
    defaults::time_budget_ms()
}
fn d_branching_factor() -> usize {
    defaults::branching_factor()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_kind() -> EvaluatorKind {
    // Unknown names in the embedded file fall back to rollouts
    defaults::evaluator_kind().parse().unwrap_or_default()
}
fn d_material_scale() -> f64 {
    defaults::material_scale_cp()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub evaluator: EvaluatorSection,
}

/// Settings shared by every entry point
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Search budget and UCT parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchSection {
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    #[serde(default = "d_exploration")]
    pub exploration_constant: f64,
    #[serde(default = "d_rollout_depth")]
    pub max_rollout_depth: u32,
    /// Wall-clock limit in milliseconds (0 = none)
    #[serde(default = "d_time_budget_ms")]
    pub time_budget_ms: u64,
    /// Root moves considered (0 = all)
    #[serde(default = "d_branching_factor")]
    pub branching_factor: usize,
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl SearchSection {
    pub fn time_budget(&self) -> Option<Duration> {
        (self.time_budget_ms > 0).then(|| Duration::from_millis(self.time_budget_ms))
    }

    pub fn branching_factor(&self) -> Option<usize> {
        (self.branching_factor > 0).then_some(self.branching_factor)
    }
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            exploration_constant: defaults::exploration_constant(),
            max_rollout_depth: defaults::max_rollout_depth(),
            time_budget_ms: defaults::time_budget_ms(),
            branching_factor: defaults::branching_factor(),
            seed: defaults::seed(),
        }
    }
}

/// Leaf evaluation strategy
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    /// Uniformly random playouts
    #[default]
    Rollout,
    /// Static material balance
    Material,
}

impl EvaluatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluatorKind::Rollout => "rollout",
            EvaluatorKind::Material => "material",
        }
    }
}

impl std::str::FromStr for EvaluatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rollout" => Ok(EvaluatorKind::Rollout),
            "material" => Ok(EvaluatorKind::Material),
            other => Err(format!(
                "unknown evaluator '{}', expected 'rollout' or 'material'",
                other
            )),
        }
    }
}

impl std::fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluator configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EvaluatorSection {
    #[serde(default = "d_kind")]
    pub kind: EvaluatorKind,
    /// Centipawn scale of the material evaluator's tanh squash
    #[serde(default = "d_material_scale")]
    pub material_scale_cp: f64,
}

impl Default for EvaluatorSection {
    fn default() -> Self {
        Self {
            kind: d_kind(),
            material_scale_cp: defaults::material_scale_cp(),
        }
    }
}
