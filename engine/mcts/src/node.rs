//! MCTS tree node representation.
//!
//! Each node represents a position reached by playing `incoming_move` from the
//! parent. Nodes store the visit statistics used for UCB1 selection and for
//! picking the final move.

use engine_core::Terminal;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the MCTS tree.
///
/// `value_sum` is accumulated from the point of view of the player who made
/// `incoming_move`, i.e. the side to move at the parent. A parent can
/// therefore rank its children by their mean value directly.
#[derive(Debug, Clone)]
pub struct MctsNode<P, M> {
    /// Position represented by this node
    pub position: P,

    /// Move that led here from the parent (None for root)
    pub incoming_move: Option<M>,

    /// Parent node index (NONE for root). Only used to walk upwards.
    pub parent: NodeId,

    /// Children in expansion order
    pub children: Vec<NodeId>,

    /// Number of simulations that passed through this node
    pub visit_count: u32,

    /// Sum of backpropagated outcomes.
    /// Q = value_sum / visit_count
    pub value_sum: f64,

    /// Moves not yet expanded into children. `None` until the oracle has been
    /// consulted for this node.
    pub(crate) untried_moves: Option<Vec<M>>,

    /// Cached terminal status. `None` until the oracle has been consulted.
    pub(crate) terminal: Option<Terminal>,
}

impl<P, M> MctsNode<P, M> {
    /// Create a new root node.
    pub fn new_root(position: P) -> Self {
        Self {
            position,
            incoming_move: None,
            parent: NodeId::NONE,
            children: Vec::new(),
            visit_count: 0,
            value_sum: 0.0,
            untried_moves: None,
            terminal: None,
        }
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, incoming_move: M, position: P) -> Self {
        Self {
            position,
            incoming_move: Some(incoming_move),
            parent,
            children: Vec::new(),
            visit_count: 0,
            value_sum: 0.0,
            untried_moves: None,
            terminal: None,
        }
    }

    /// Whether the untried moves and terminal status have been computed.
    #[inline]
    pub fn is_prepared(&self) -> bool {
        self.untried_moves.is_some() && self.terminal.is_some()
    }

    /// Moves still waiting to be expanded. Empty before preparation.
    pub fn untried_moves(&self) -> &[M] {
        self.untried_moves.as_deref().unwrap_or(&[])
    }

    /// Cached terminal status, if computed.
    #[inline]
    pub fn terminal(&self) -> Option<Terminal> {
        self.terminal
    }

    /// Terminal according to the cached oracle answer.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some_and(Terminal::is_terminal)
    }

    /// Prepared and no untried moves left.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.as_ref().is_some_and(Vec::is_empty)
    }

    /// Calculate mean value Q = value_sum / visit_count.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f64
        }
    }

    /// UCB1 score used by the parent during selection.
    ///
    /// UCB1 = Q + c * sqrt(ln(N_parent) / N)
    ///
    /// Takes pre-computed ln(N_parent) to avoid a log per child. An unvisited
    /// node scores +inf so it is tried before any visited sibling is revisited.
    #[inline]
    pub fn ucb_score(&self, ln_parent_visits: f64, exploration: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let n = self.visit_count as f64;
        self.mean_value() + exploration * (ln_parent_visits / n).sqrt()
    }
}
