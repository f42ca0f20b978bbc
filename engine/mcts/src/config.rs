//! MCTS configuration parameters.

use std::time::Duration;

use crate::search::SearchError;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Number of iterations (select, expand, simulate, backpropagate) per search.
    pub iterations: u32,

    /// Exploration constant C in the UCB1 formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    /// The usual choice is ~1.4 (sqrt 2).
    pub exploration_constant: f32,

    /// Maximum number of plies a random rollout may play before it is scored
    /// as a draw. Only meaningful with a rollout evaluator.
    pub max_rollout_depth: u32,

    /// Optional wall-clock budget, checked before each iteration starts.
    pub time_budget: Option<Duration>,

    /// Optional cap on the number of root moves considered. The first
    /// `branching_factor` legal moves in oracle order are kept.
    pub branching_factor: Option<usize>,

    /// Seed for stochastic evaluators built from this config.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            exploration_constant: 1.4,
            max_rollout_depth: 100,
            time_budget: None,
            branching_factor: None,
            seed: 0,
        }
    }
}

impl SearchConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 50,
            exploration_constant: 1.4,
            max_rollout_depth: 20,
            time_budget: None,
            branching_factor: None,
            seed: 42,
        }
    }

    /// Builder pattern: set number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set the UCB1 exploration constant.
    pub fn with_exploration_constant(mut self, c: f32) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: set the rollout depth limit.
    pub fn with_max_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    /// Builder pattern: set a wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Builder pattern: cap the number of root moves.
    pub fn with_branching_factor(mut self, factor: usize) -> Self {
        self.branching_factor = Some(factor);
        self
    }

    /// Builder pattern: set the evaluator seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject configurations the search cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.iterations == 0 {
            return Err(SearchError::InvalidConfig(
                "iterations must be greater than 0".into(),
            ));
        }

        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration_constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }

        if self.max_rollout_depth == 0 {
            return Err(SearchError::InvalidConfig(
                "max_rollout_depth must be greater than 0".into(),
            ));
        }

        if self.branching_factor == Some(0) {
            return Err(SearchError::InvalidConfig(
                "branching_factor must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.iterations, 1000);
        assert!((config.exploration_constant - 1.4).abs() < 1e-6);
        assert_eq!(config.max_rollout_depth, 100);
        assert!(config.time_budget.is_none());
        assert!(config.branching_factor.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_iterations(100)
            .with_exploration_constant(2.0)
            .with_max_rollout_depth(30)
            .with_time_budget(Duration::from_millis(250))
            .with_branching_factor(10)
            .with_seed(7);

        assert_eq!(config.iterations, 100);
        assert!((config.exploration_constant - 2.0).abs() < 1e-6);
        assert_eq!(config.max_rollout_depth, 30);
        assert_eq!(config.time_budget, Some(Duration::from_millis(250)));
        assert_eq!(config.branching_factor, Some(10));
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let err = SearchConfig::default()
            .with_iterations(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("iterations"));
    }

    #[test]
    fn test_validate_rejects_bad_exploration_constant() {
        let negative = SearchConfig::default().with_exploration_constant(-1.0);
        assert!(negative.validate().is_err());

        let nan = SearchConfig::default().with_exploration_constant(f32::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_zero_exploration() {
        let greedy = SearchConfig::default().with_exploration_constant(0.0);
        assert!(greedy.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_rollout_depth() {
        let err = SearchConfig::default()
            .with_max_rollout_depth(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("max_rollout_depth"));
    }

    #[test]
    fn test_validate_rejects_zero_branching_factor() {
        let err = SearchConfig::default()
            .with_branching_factor(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("branching_factor"));
    }
}
