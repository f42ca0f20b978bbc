//! Material balance value model.
//!
//! A cheap, deterministic stand-in for a learned value function: counts
//! material from the side to move's point of view and squashes the
//! centipawn difference into [-1, 1].

use cozy_chess::{Board, Piece};

/// Centipawn value of a piece. The king carries no material value.
pub fn piece_value_cp(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 0,
    }
}

/// Material evaluation squashed with `tanh(cp / scale)`.
#[derive(Debug, Clone, Copy)]
pub struct MaterialModel {
    /// Centipawn difference that maps to tanh(1) ≈ 0.76
    pub scale_cp: f32,
}

impl Default for MaterialModel {
    fn default() -> Self {
        Self { scale_cp: 400.0 }
    }
}

impl MaterialModel {
    pub fn new(scale_cp: f32) -> Self {
        Self { scale_cp }
    }

    /// Material difference in centipawns for the side to move.
    pub fn balance_cp(&self, board: &Board) -> i32 {
        let us = board.side_to_move();
        let them = !us;
        Piece::ALL
            .iter()
            .map(|&piece| {
                let ours = board.colored_pieces(us, piece).len() as i32;
                let theirs = board.colored_pieces(them, piece).len() as i32;
                (ours - theirs) * piece_value_cp(piece)
            })
            .sum()
    }

    /// Value in [-1, 1] for the side to move.
    pub fn value(&self, board: &Board) -> f32 {
        (self.balance_cp(board) as f32 / self.scale_cp).tanh()
    }
}
