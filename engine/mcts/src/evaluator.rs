//! Evaluator trait for position evaluation.
//!
//! The evaluator turns a position into a scalar in [-1, 1] from the point of
//! view of the side to move. Two strategies are provided: random rollouts
//! driven by the oracle, and a single call into a value model (a learned
//! network, or any deterministic function standing in for one).

use engine_core::{Oracle, OracleError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::trace;

use crate::config::SearchConfig;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Evaluator unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed evaluator output: {0}")]
    Malformed(String),

    #[error("Oracle error during evaluation: {0}")]
    Oracle(#[from] OracleError),
}

impl EvaluatorError {
    /// Whether the search may drop the current iteration and continue.
    ///
    /// Every evaluator failure is recoverable except an illegal move surfacing
    /// from the oracle, which means the rollout itself is broken.
    pub fn is_recoverable(&self) -> bool {
        match self {
            EvaluatorError::Oracle(e) => e.is_recoverable(),
            _ => true,
        }
    }
}

/// Trait for position evaluators.
///
/// Implementations could be:
/// - RolloutEvaluator: Random playouts to a terminal state or depth limit
/// - ValueEvaluator: One call into a value model
pub trait Evaluator<O: Oracle> {
    /// Evaluate `position` for the side to move.
    ///
    /// # Returns
    /// A value in [-1.0, 1.0]: -1.0 is a certain loss, +1.0 a certain win.
    fn evaluate(&mut self, oracle: &O, position: &O::Position) -> Result<f32, EvaluatorError>;
}

/// Random rollout evaluator that plays uniformly random legal moves until
/// the oracle reports a finished game or `max_depth` plies have been played.
///
/// A finished game scores +1/-1/0 for the side to move at the start of the
/// rollout. Running out of depth, or reaching a position the oracle calls
/// ongoing but without moves, scores 0.
#[derive(Debug, Clone)]
pub struct RolloutEvaluator {
    /// Maximum rollout depth to prevent endless games
    max_depth: u32,
    rng: ChaCha20Rng,
}

impl RolloutEvaluator {
    pub fn new(max_depth: u32, seed: u64) -> Self {
        Self {
            max_depth,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Build a rollout evaluator from the search configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.max_rollout_depth, config.seed)
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

impl<O: Oracle> Evaluator<O> for RolloutEvaluator {
    fn evaluate(&mut self, oracle: &O, position: &O::Position) -> Result<f32, EvaluatorError> {
        let mut current = position.clone();
        let mut depth = 0u32;

        loop {
            let terminal = oracle.terminal(&current)?;
            // `terminal` is for the side to move after `depth` plies
            let terminal = if depth % 2 == 0 {
                terminal
            } else {
                terminal.flipped()
            };
            if let Some(value) = terminal.value() {
                trace!(depth, value, "Rollout reached terminal position");
                return Ok(value);
            }

            if depth >= self.max_depth {
                trace!(depth, "Rollout depth exhausted");
                return Ok(0.0);
            }

            let moves = oracle.legal_moves(&current)?;
            if moves.is_empty() {
                return Ok(0.0);
            }

            let pick = self.rng.gen_range(0..moves.len());
            current = oracle.apply(&current, &moves[pick])?;
            depth += 1;
        }
    }
}

/// A value function over positions, e.g. a trained network.
pub trait ValueModel<P> {
    /// Value of `position` for the side to move, nominally in [-1, 1].
    fn value(&self, position: &P) -> Result<f32, EvaluatorError>;
}

impl<P, F> ValueModel<P> for F
where
    F: Fn(&P) -> Result<f32, EvaluatorError>,
{
    fn value(&self, position: &P) -> Result<f32, EvaluatorError> {
        self(position)
    }
}

/// Evaluator that asks a value model once per position, with no rollout.
///
/// Non-finite outputs are rejected as malformed; finite outputs outside
/// [-1, 1] are clamped.
#[derive(Debug, Clone)]
pub struct ValueEvaluator<M> {
    model: M,
}

impl<M> ValueEvaluator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

impl<O, M> Evaluator<O> for ValueEvaluator<M>
where
    O: Oracle,
    M: ValueModel<O::Position>,
{
    fn evaluate(&mut self, _oracle: &O, position: &O::Position) -> Result<f32, EvaluatorError> {
        let value = self.model.value(position)?;
        if !value.is_finite() {
            return Err(EvaluatorError::Malformed(format!(
                "value model returned {}",
                value
            )));
        }
        Ok(value.clamp(-1.0, 1.0))
    }
}
