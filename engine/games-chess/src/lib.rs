//! Chess position oracle for the search core
//!
//! This crate adapts the `cozy-chess` rules engine to the
//! [`engine_core::Oracle`] contract. Positions are `cozy_chess::Board` values
//! and moves are `cozy_chess::Move` values; both are opaque to the search.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Oracle, Terminal};
//! use games_chess::{parse_fen, ChessOracle};
//!
//! let oracle = ChessOracle::new();
//! let board = parse_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
//!
//! let moves = oracle.legal_moves(&board).unwrap();
//! assert!(!moves.is_empty());
//! assert_eq!(oracle.terminal(&board).unwrap(), Terminal::Ongoing);
//! ```

mod material;

pub use material::{piece_value_cp, MaterialModel};

use cozy_chess::util::{display_uci_move, parse_uci_move};
use cozy_chess::{Board, GameStatus, Move};
use engine_core::{Oracle, OracleError, Terminal};

/// FEN of the standard starting position.
pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors produced while translating caller input into chess values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChessError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Invalid move '{text}': {reason}")]
    InvalidMove { text: String, reason: String },
}

/// Parse a FEN string into a board.
pub fn parse_fen(fen: &str) -> Result<Board, ChessError> {
    Board::from_fen(fen.trim(), false).map_err(|e| ChessError::InvalidFen {
        fen: fen.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Parse a move in UCI notation (e.g. `e2e4`, `e7e8q`, castling as `e1g1`)
/// and check it is legal in `board`.
pub fn parse_move(board: &Board, text: &str) -> Result<Move, ChessError> {
    let text = text.trim();
    let mv = parse_uci_move(board, text).map_err(|e| ChessError::InvalidMove {
        text: text.to_string(),
        reason: format!("{:?}", e),
    })?;

    if !board.is_legal(mv) {
        return Err(ChessError::InvalidMove {
            text: text.to_string(),
            reason: "not legal in this position".to_string(),
        });
    }
    Ok(mv)
}

/// Render a move of `board` in UCI notation.
///
/// cozy-chess encodes castling as the king capturing its own rook; this
/// writes the king's destination square instead (`e1g1`, not `e1h1`).
pub fn format_move(board: &Board, mv: &Move) -> String {
    display_uci_move(board, *mv).to_string()
}

/// Chess rules engine exposed through the oracle contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChessOracle;

impl ChessOracle {
    pub fn new() -> Self {
        Self
    }
}

impl Oracle for ChessOracle {
    type Position = Board;
    type Move = Move;

    fn legal_moves(&self, position: &Board) -> Result<Vec<Move>, OracleError> {
        let mut moves = Vec::new();
        position.generate_moves(|piece_moves| {
            moves.extend(piece_moves);
            false
        });
        Ok(moves)
    }

    fn apply(&self, position: &Board, mv: &Move) -> Result<Board, OracleError> {
        if !position.is_legal(*mv) {
            return Err(OracleError::IllegalMove {
                mv: mv.to_string(),
                position: position.to_string(),
            });
        }

        let mut next = position.clone();
        next.play_unchecked(*mv);
        Ok(next)
    }

    fn terminal(&self, position: &Board) -> Result<Terminal, OracleError> {
        let terminal = match position.status() {
            // cozy-chess reports `Won` when the side to move has been mated
            GameStatus::Won => Terminal::Loss,
            GameStatus::Drawn => Terminal::Draw,
            GameStatus::Ongoing if bare_kings(position) => Terminal::Draw,
            GameStatus::Ongoing => Terminal::Ongoing,
        };
        Ok(terminal)
    }
}

/// Only the two kings remain.
fn bare_kings(board: &Board) -> bool {
    board.occupied().len() == 2
}
