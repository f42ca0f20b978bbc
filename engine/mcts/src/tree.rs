//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for node storage. Nodes are stored in a
//! contiguous Vec and referenced by NodeId indices; parent links are plain
//! indices used only to walk back up during backpropagation. The whole arena
//! is dropped with the tree at the end of a search.

use std::fmt::Debug;

use engine_core::{Oracle, OracleError, Terminal};
use thiserror::Error;
use tracing::warn;

use crate::node::{MctsNode, NodeId};

/// Errors raised by tree-shaping operations.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Node {0:?} has no untried moves")]
    NoUntriedMoves(NodeId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl TreeError {
    /// Only adapter failures are recoverable; everything else is a defect.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TreeError::Oracle(e) => e.is_recoverable(),
            TreeError::NoUntriedMoves(_) => false,
        }
    }
}

/// How the final move is picked among a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BestChildCriterion {
    /// Robust child: highest visit count
    #[default]
    MostVisits,
    /// Highest mean value among visited children
    HighestMean,
}

/// Per-child summary for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSummary<M> {
    pub mv: M,
    pub visits: u32,
    /// Mean value for the player who chose this move
    pub mean_value: f64,
}

/// MCTS tree with arena-based node storage.
#[derive(Debug, Clone)]
pub struct MctsTree<P, M> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<P, M>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<P, M> MctsTree<P, M> {
    /// Create a new tree holding only the root position.
    pub fn new(root_position: P) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_position)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<P, M> {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<P, M> {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node and return its ID.
    fn allocate(&mut self, node: MctsNode<P, M>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<P, M>] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest UCB1 score.
    ///
    /// Equal scores keep the child that comes first in `children`, so the
    /// walk is reproducible for a deterministic evaluator.
    pub fn select_child(&self, node_id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per child
        let ln_parent_visits = (node.visit_count.max(1) as f64).ln();

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let score = self.get(child_id).ucb_score(ln_parent_visits, exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Pick the best child of `node_id` under `criterion`, first one on ties.
    pub fn best_child(&self, node_id: NodeId, criterion: BestChildCriterion) -> Option<NodeId> {
        let children = &self.get(node_id).children;
        let mut best = *children.first()?;

        for &child_id in &children[1..] {
            let candidate = self.get(child_id);
            let incumbent = self.get(best);
            let better = match criterion {
                BestChildCriterion::MostVisits => candidate.visit_count > incumbent.visit_count,
                BestChildCriterion::HighestMean => {
                    candidate.visit_count > 0
                        && (incumbent.visit_count == 0
                            || candidate.mean_value() > incumbent.mean_value())
                }
            };
            if better {
                best = child_id;
            }
        }
        Some(best)
    }

    /// Backpropagate a simulation result from `leaf_id` to the root.
    ///
    /// `value` is from the point of view of the side to move at the leaf.
    /// Each node stores results for the player who moved into it, so the leaf
    /// receives `-value` and the sign flips at every step up.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f32) {
        let mut current_id = leaf_id;
        let mut current_value = -(value as f64);

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.value_sum += current_value;

            // Negate for the other player
            current_value = -current_value;

            current_id = node.parent;
        }
    }

    /// Summaries of a node's children in expansion order.
    pub fn child_summaries(&self, node_id: NodeId) -> Vec<ChildSummary<M>>
    where
        M: Clone,
    {
        self.get(node_id)
            .children
            .iter()
            .filter_map(|&id| {
                let child = self.get(id);
                child.incoming_move.clone().map(|mv| ChildSummary {
                    mv,
                    visits: child.visit_count,
                    mean_value: child.mean_value(),
                })
            })
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_children: root.children.len(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0u32)];

        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(self.get(id).children.iter().map(|&child| (child, depth + 1)));
        }
        max_depth
    }
}

impl<P: Clone, M: Clone + PartialEq + Debug> MctsTree<P, M> {
    /// Compute and cache the terminal status and untried moves of a node.
    ///
    /// Does nothing if the node is already prepared. `move_cap` keeps only
    /// the first `cap` legal moves in oracle order; the search uses it for
    /// the root's branching factor.
    pub fn prepare<O>(
        &mut self,
        oracle: &O,
        node_id: NodeId,
        move_cap: Option<usize>,
    ) -> Result<(), TreeError>
    where
        O: Oracle<Position = P, Move = M>,
    {
        let node = self.get(node_id);
        if node.is_prepared() {
            return Ok(());
        }

        let mut terminal = oracle.terminal(&node.position)?;
        let mut moves = if terminal.is_terminal() {
            Vec::new()
        } else {
            oracle.legal_moves(&node.position)?
        };

        if !terminal.is_terminal() && moves.is_empty() {
            warn!(
                node = node_id.0,
                "Oracle reported an ongoing position without legal moves, scoring it as a draw"
            );
            terminal = Terminal::Draw;
        }

        if let Some(cap) = move_cap {
            moves.truncate(cap);
        }
        // Expansion pops from the back; reverse so children follow oracle order
        moves.reverse();

        let node = self.get_mut(node_id);
        node.terminal = Some(terminal);
        node.untried_moves = Some(moves);
        Ok(())
    }

    /// Expand one untried move of `node_id` into a new child.
    ///
    /// The move is only removed from the untried list once the oracle has
    /// produced the child position, so a recoverable oracle failure leaves
    /// the node unchanged.
    pub fn expand<O>(&mut self, oracle: &O, node_id: NodeId) -> Result<NodeId, TreeError>
    where
        O: Oracle<Position = P, Move = M>,
    {
        self.prepare(oracle, node_id, None)?;

        let node = self.get(node_id);
        let mv = node
            .untried_moves()
            .last()
            .cloned()
            .ok_or(TreeError::NoUntriedMoves(node_id))?;
        let position = oracle.apply(&node.position, &mv)?;

        if let Some(untried) = self.get_mut(node_id).untried_moves.as_mut() {
            untried.pop();
        }

        let child_id = self.allocate(MctsNode::new_child(node_id, mv, position));
        self.get_mut(node_id).children.push(child_id);
        Ok(child_id)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_children: usize,
    pub max_depth: u32,
}
