//! Subtraction game used by the integration tests.

use engine_core::{Oracle, OracleError, Terminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Take(pub u32);

/// Take 1..=max_take stones; whoever takes the last stone wins.
#[derive(Debug, Clone, Copy)]
pub struct Nim {
    pub max_take: u32,
}

impl Oracle for Nim {
    type Position = u32;
    type Move = Take;

    fn legal_moves(&self, position: &u32) -> Result<Vec<Take>, OracleError> {
        Ok((1..=self.max_take.min(*position)).map(Take).collect())
    }

    fn apply(&self, position: &u32, mv: &Take) -> Result<u32, OracleError> {
        if mv.0 == 0 || mv.0 > self.max_take || mv.0 > *position {
            return Err(OracleError::illegal_move(mv, position));
        }
        Ok(position - mv.0)
    }

    fn terminal(&self, position: &u32) -> Result<Terminal, OracleError> {
        Ok(if *position == 0 {
            Terminal::Loss
        } else {
            Terminal::Ongoing
        })
    }
}
