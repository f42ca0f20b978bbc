//! MCTS search implementation.
//!
//! Implements the core MCTS loop, one full cycle per iteration:
//! 1. Selection: descend with UCB1 while nodes are fully expanded
//! 2. Expansion: turn one untried move into a child
//! 3. Simulation: terminal outcome, or one evaluator call
//! 4. Backpropagation: update statistics along the path to the root
//!
//! Cancellation is cooperative: the deadline and the cancel flag are checked
//! before an iteration starts, never in the middle of one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use engine_core::{Oracle, Terminal};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::NodeId;
use crate::tree::{BestChildCriterion, MctsTree, TreeError};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),

    /// The tree bookkeeping and the oracle disagree. Always a defect.
    #[error("Search invariant violated: {0}")]
    Invariant(String),

    #[error("Root position unavailable: {0}")]
    RootUnavailable(String),
}

/// Why the iteration loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The root has no legal move (or is already finished); nothing was searched
    NoLegalMoves,
    /// The root has a single legal move; one iteration was run
    ForcedMove,
    /// All configured iterations were run
    BudgetExhausted,
    /// The wall-clock budget expired
    TimeBudget,
    /// The cancel flag was raised
    Cancelled,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Most visited root move, `None` if the root has no legal move
    pub best_move: Option<M>,

    /// Iterations started, including abandoned ones
    pub iterations_run: u32,

    /// Iterations abandoned because an adapter failed
    pub failed_iterations: u32,

    /// Visit count of the root
    pub root_visits: u32,

    /// Mean value at the root for the side to move
    pub value: f32,

    pub stop_reason: StopReason,

    pub elapsed: Duration,
}

impl<M> SearchResult<M> {
    /// Iterations that were backpropagated.
    pub fn completed_iterations(&self) -> u32 {
        self.iterations_run - self.failed_iterations
    }
}

/// How a single iteration went wrong.
enum IterationError {
    /// Drop this iteration and keep searching
    Recoverable(String),
    /// Abort the search
    Fatal(SearchError),
}

impl From<TreeError> for IterationError {
    fn from(e: TreeError) -> Self {
        if e.is_recoverable() {
            IterationError::Recoverable(e.to_string())
        } else {
            IterationError::Fatal(SearchError::Invariant(e.to_string()))
        }
    }
}

impl From<EvaluatorError> for IterationError {
    fn from(e: EvaluatorError) -> Self {
        if e.is_recoverable() {
            IterationError::Recoverable(e.to_string())
        } else {
            IterationError::Fatal(SearchError::Invariant(e.to_string()))
        }
    }
}

/// MCTS search state.
pub struct MctsSearch<'a, O: Oracle, E: Evaluator<O>> {
    tree: MctsTree<O::Position, O::Move>,
    oracle: &'a O,
    evaluator: &'a mut E,
    config: SearchConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a, O: Oracle, E: Evaluator<O>> MctsSearch<'a, O, E> {
    /// Create a new MCTS search rooted at `root_position`.
    ///
    /// Validates the configuration and asks the oracle for the root's legal
    /// moves, keeping at most `branching_factor` of them.
    pub fn new(
        oracle: &'a O,
        evaluator: &'a mut E,
        config: SearchConfig,
        root_position: O::Position,
    ) -> Result<Self, SearchError> {
        config.validate()?;

        let mut tree = MctsTree::new(root_position);
        tree.prepare(oracle, tree.root(), config.branching_factor)
            .map_err(|e| {
                if e.is_recoverable() {
                    SearchError::RootUnavailable(e.to_string())
                } else {
                    SearchError::Invariant(e.to_string())
                }
            })?;

        Ok(Self {
            tree,
            oracle,
            evaluator,
            config,
            cancel: None,
        })
    }

    /// Stop before the next iteration once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run the search until the budget, the deadline or the cancel flag stops it.
    pub fn run(&mut self) -> Result<SearchResult<O::Move>, SearchError> {
        let start = Instant::now();
        let deadline = self.config.time_budget.map(|budget| start + budget);

        let root = self.tree.get(self.tree.root());
        let candidates = root.children.len() + root.untried_moves().len();

        if candidates == 0 {
            debug!(terminal = ?root.terminal(), "Root has no legal move, skipping search");
            return Ok(self.result(StopReason::NoLegalMoves, 0, 0, start));
        }

        // A forced move needs no comparison; one iteration still values it
        let (budget, mut stop_reason) = if candidates == 1 {
            (1, StopReason::ForcedMove)
        } else {
            (self.config.iterations, StopReason::BudgetExhausted)
        };

        let mut iterations_run = 0u32;
        let mut failed_iterations = 0u32;

        while iterations_run < budget {
            if self.is_cancelled() {
                stop_reason = StopReason::Cancelled;
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                stop_reason = StopReason::TimeBudget;
                break;
            }

            iterations_run += 1;
            match self.iterate() {
                Ok(()) => {}
                Err(IterationError::Recoverable(reason)) => {
                    failed_iterations += 1;
                    debug!(iteration = iterations_run, %reason, "Iteration abandoned");
                }
                Err(IterationError::Fatal(e)) => return Err(e),
            }
        }

        if failed_iterations > 0 {
            warn!(
                failed_iterations,
                iterations_run, "Search finished with abandoned iterations"
            );
        }

        let result = self.result(stop_reason, iterations_run, failed_iterations, start);
        debug!(
            iterations = result.iterations_run,
            failed = result.failed_iterations,
            nodes = self.tree.len(),
            root_visits = result.root_visits,
            value = result.value,
            stop_reason = ?result.stop_reason,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "MCTS search complete"
        );
        Ok(result)
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    fn iterate(&mut self) -> Result<(), IterationError> {
        let leaf_id = self.select_and_expand()?;
        let value = self.simulate(leaf_id)?;
        self.tree.backpropagate(leaf_id, value);

        trace!(
            leaf = leaf_id.0,
            value = value,
            root_visits = self.tree.get(self.tree.root()).visit_count,
            "MCTS iteration complete"
        );
        Ok(())
    }

    /// Descend with UCB1 while nodes are fully expanded, then expand one move
    /// if the node reached still has untried moves.
    fn select_and_expand(&mut self) -> Result<NodeId, IterationError> {
        let exploration = self.config.exploration_constant as f64;
        let mut current = self.tree.root();

        loop {
            self.tree.prepare(self.oracle, current, None)?;
            let node = self.tree.get(current);

            if node.is_terminal() {
                return Ok(current);
            }

            if !node.is_fully_expanded() {
                return Ok(self.tree.expand(self.oracle, current)?);
            }

            match self.tree.select_child(current, exploration) {
                Some(child_id) => current = child_id,
                None => return Ok(current),
            }
        }
    }

    /// Value of `leaf_id` for its side to move.
    fn simulate(&mut self, leaf_id: NodeId) -> Result<f32, IterationError> {
        self.tree.prepare(self.oracle, leaf_id, None)?;

        let leaf = self.tree.get(leaf_id);
        if let Some(value) = leaf.terminal().and_then(Terminal::value) {
            return Ok(value);
        }

        let value = self.evaluator.evaluate(self.oracle, &leaf.position)?;
        if !value.is_finite() {
            return Err(IterationError::Recoverable(format!(
                "evaluator returned {}",
                value
            )));
        }
        Ok(value.clamp(-1.0, 1.0))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn result(
        &self,
        stop_reason: StopReason,
        iterations_run: u32,
        failed_iterations: u32,
        start: Instant,
    ) -> SearchResult<O::Move> {
        let root_id = self.tree.root();
        let root = self.tree.get(root_id);

        let best_move = match self.tree.best_child(root_id, BestChildCriterion::MostVisits) {
            Some(child_id) => self.tree.get(child_id).incoming_move.clone(),
            None => {
                // Stopped before anything was expanded; fall back to the first candidate
                let fallback = root.untried_moves().last().cloned();
                if fallback.is_some() {
                    warn!(?stop_reason, "No root child expanded, returning first legal move");
                }
                fallback
            }
        };

        SearchResult {
            best_move,
            iterations_run,
            failed_iterations,
            root_visits: root.visit_count,
            // Root statistics are stored for the opponent of the side to move
            value: -root.mean_value() as f32,
            stop_reason,
            elapsed: start.elapsed(),
        }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<O::Position, O::Move> {
        &self.tree
    }
}

/// Convenience function to run a single MCTS search.
pub fn search<O: Oracle, E: Evaluator<O>>(
    oracle: &O,
    evaluator: &mut E,
    root_position: O::Position,
    config: SearchConfig,
) -> Result<SearchResult<O::Move>, SearchError> {
    let mut search = MctsSearch::new(oracle, evaluator, config, root_position)?;
    search.run()
}
