//! Position oracle contract.
//!
//! The oracle is the rules engine: it enumerates legal moves, applies a move
//! to produce a new position, and reports whether a position is finished.
//! The search never looks inside a position or a move; it only hands them
//! back to the oracle.

use std::fmt::Debug;

use crate::terminal::Terminal;

/// Rules engine consumed by the search.
///
/// Implementations must be pure with respect to their inputs: `apply` returns
/// a fresh position and never mutates the one it was given.
///
/// # Type Parameters
///
/// * `Position` - Full game state, treated as an opaque value by callers
/// * `Move` - A single ply, used as an edge label and as the search output
///
/// # Example
///
/// ```rust
/// use engine_core::{Oracle, OracleError, Terminal};
///
/// /// Players alternately remove one or two stones; taking the last stone wins.
/// #[derive(Debug)]
/// struct Stones;
///
/// impl Oracle for Stones {
///     type Position = u32;
///     type Move = u32;
///
///     fn legal_moves(&self, position: &u32) -> Result<Vec<u32>, OracleError> {
///         Ok((1..=2).filter(|take| take <= position).collect())
///     }
///
///     fn apply(&self, position: &u32, mv: &u32) -> Result<u32, OracleError> {
///         if *mv == 0 || mv > position || *mv > 2 {
///             return Err(OracleError::illegal_move(mv, position));
///         }
///         Ok(position - mv)
///     }
///
///     fn terminal(&self, position: &u32) -> Result<Terminal, OracleError> {
///         Ok(if *position == 0 { Terminal::Loss } else { Terminal::Ongoing })
///     }
/// }
///
/// let oracle = Stones;
/// assert_eq!(oracle.legal_moves(&1).unwrap(), vec![1]);
/// assert_eq!(oracle.terminal(&0).unwrap(), Terminal::Loss);
/// ```
pub trait Oracle {
    /// Game state type
    type Position: Clone;

    /// Move type
    type Move: Clone + PartialEq + Debug;

    /// Enumerate the legal moves from `position` in a stable order.
    ///
    /// An empty list means the side to move has no legal move; whether that
    /// is a loss or a draw is answered by [`Oracle::terminal`].
    fn legal_moves(&self, position: &Self::Position) -> Result<Vec<Self::Move>, OracleError>;

    /// Apply `mv` to `position` and return the resulting position.
    ///
    /// Returns [`OracleError::IllegalMove`] if `mv` is not legal in `position`.
    fn apply(
        &self,
        position: &Self::Position,
        mv: &Self::Move,
    ) -> Result<Self::Position, OracleError>;

    /// Report whether `position` is finished, from the side to move's point of view.
    fn terminal(&self, position: &Self::Position) -> Result<Terminal, OracleError>;
}

/// Errors reported by an oracle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OracleError {
    /// A move outside the legal set reached `apply`. Callers treat this as a
    /// defect in their own bookkeeping, never as a runtime condition.
    #[error("Illegal move {mv} in position {position}")]
    IllegalMove { mv: String, position: String },

    /// The rules engine could not be reached (crashed subprocess, timeout).
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    /// The rules engine answered with something that could not be understood.
    #[error("Malformed oracle response: {0}")]
    Malformed(String),
}

impl OracleError {
    /// Build an [`OracleError::IllegalMove`] from debug renderings of the inputs.
    pub fn illegal_move(mv: &impl Debug, position: &impl Debug) -> Self {
        Self::IllegalMove {
            mv: format!("{:?}", mv),
            position: format!("{:?}", position),
        }
    }

    /// Whether a search may discard the current iteration and carry on.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::IllegalMove { .. })
    }
}
