//! Monte Carlo Tree Search (MCTS) for two-player, zero-sum, perfect-information games.
//!
//! This crate provides a game-agnostic UCT search that works with any rules
//! oracle implementing the `engine-core` [`Oracle`](engine_core::Oracle) trait.
//! Chess support lives in the `games-chess` crate.
//!
//! # Overview
//!
//! MCTS builds a search tree by running iterations. Each iteration consists of
//! four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB1 to balance exploration and
//!    exploitation
//! 2. **Expansion**: When reaching a node with untried moves, create one child
//! 3. **Simulation**: Score the new position with its terminal outcome or with
//!    an [`Evaluator`] (random rollout or a value model)
//! 4. **Backpropagation**: Update visit counts and value sums along the path
//!    from leaf to root, flipping the sign at each ply
//!
//! After the budget is spent the most visited root child is returned.
//!
//! # Usage
//!
//! ```rust
//! use games_chess::{format_move, parse_fen, ChessOracle, STARTPOS};
//! use mcts::{search, RolloutEvaluator, SearchConfig};
//!
//! let oracle = ChessOracle::new();
//! let board = parse_fen(STARTPOS).unwrap();
//!
//! let config = SearchConfig::default().with_iterations(64).with_seed(7);
//! let mut evaluator = RolloutEvaluator::from_config(&config);
//!
//! let result = search(&oracle, &mut evaluator, board.clone(), config).unwrap();
//! let best = result.best_move.unwrap();
//! println!("bestmove {}", format_move(&board, &best));
//! ```
//!
//! # Configuration
//!
//! The [`SearchConfig`] struct controls search behavior:
//!
//! - `iterations`: Number of iterations per search (default: 1000)
//! - `exploration_constant`: UCB1 exploration constant (default: 1.4)
//! - `max_rollout_depth`: Ply cap for random rollouts (default: 100)
//! - `time_budget`: Optional wall-clock limit
//! - `branching_factor`: Optional cap on the root moves considered
//! - `seed`: Seed for the rollout RNG
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------+
//! |                      MctsSearch                       |
//! |  +-----------+   +-----------+   +----------------+   |
//! |  | MctsTree  |   |  Oracle   |   |   Evaluator    |   |
//! |  | (arena)   |   | (rules)   |   | (rollout/model)|   |
//! |  +-----------+   +-----------+   +----------------+   |
//! |        select -> expand -> simulate -> backprop       |
//! +-------------------------------------------------------+
//! ```
//!
//! The search is single threaded. Tree parallelism would need per-node
//! locking or virtual loss and is not provided.

pub mod config;
pub mod evaluator;
pub mod node;
pub mod search;
pub mod tree;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use config::SearchConfig;
pub use evaluator::{Evaluator, EvaluatorError, RolloutEvaluator, ValueEvaluator, ValueModel};
pub use node::{MctsNode, NodeId};
pub use search::{search, MctsSearch, SearchError, SearchResult, StopReason};
pub use tree::{BestChildCriterion, ChildSummary, MctsTree, TreeError, TreeStats};
