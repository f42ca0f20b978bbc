//! Small deterministic game and evaluators shared by unit tests.

use std::cell::Cell;

use engine_core::{Oracle, OracleError, Terminal};

use crate::evaluator::{Evaluator, EvaluatorError};

/// Number of stones taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NimMove(pub u32);

/// Subtraction game: take 1..=max_take stones, whoever takes the last stone
/// wins. The position is the number of stones left.
#[derive(Debug)]
pub struct Nim {
    max_take: u32,
    list_illegal_move: bool,
    legal_move_calls: Cell<u32>,
    fail_next_apply: Cell<bool>,
}

impl Nim {
    pub fn new(max_take: u32) -> Self {
        Self {
            max_take,
            list_illegal_move: false,
            legal_move_calls: Cell::new(0),
            fail_next_apply: Cell::new(false),
        }
    }

    /// An oracle whose move list contains a move `apply` rejects.
    pub fn with_illegal_listing(max_take: u32) -> Self {
        Self {
            list_illegal_move: true,
            ..Self::new(max_take)
        }
    }

    pub fn legal_move_calls(&self) -> u32 {
        self.legal_move_calls.get()
    }

    /// Make the next `apply` fail with a recoverable error.
    pub fn fail_next_apply(&self) {
        self.fail_next_apply.set(true);
    }
}

impl Oracle for Nim {
    type Position = u32;
    type Move = NimMove;

    fn legal_moves(&self, position: &u32) -> Result<Vec<NimMove>, OracleError> {
        self.legal_move_calls.set(self.legal_move_calls.get() + 1);
        let mut moves: Vec<NimMove> = (1..=self.max_take)
            .filter(|take| take <= position)
            .map(NimMove)
            .collect();
        if self.list_illegal_move && *position > 0 {
            moves.push(NimMove(position + 1));
        }
        Ok(moves)
    }

    fn apply(&self, position: &u32, mv: &NimMove) -> Result<u32, OracleError> {
        if self.fail_next_apply.replace(false) {
            return Err(OracleError::Unavailable("injected failure".into()));
        }
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

/// Returns a fixed value and counts calls.
#[derive(Debug, Default)]
pub struct CountingEvaluator {
    pub value: f32,
    pub calls: u32,
}

impl<O: Oracle> Evaluator<O> for CountingEvaluator {
    fn evaluate(&mut self, _oracle: &O, _position: &O::Position) -> Result<f32, EvaluatorError> {
        self.calls += 1;
        Ok(self.value)
    }
}

/// Fails on every `fail_every`-th call, returns 0.0 otherwise.
#[derive(Debug)]
pub struct FlakyEvaluator {
    pub fail_every: u32,
    pub calls: u32,
}

impl FlakyEvaluator {
    pub fn always_failing() -> Self {
        Self {
            fail_every: 1,
            calls: 0,
        }
    }
}

impl<O: Oracle> Evaluator<O> for FlakyEvaluator {
    fn evaluate(&mut self, _oracle: &O, _position: &O::Position) -> Result<f32, EvaluatorError> {
        self.calls += 1;
        if self.calls % self.fail_every == 0 {
            return Err(EvaluatorError::Unavailable("evaluator offline".into()));
        }
        Ok(0.0)
    }
}

/// Exact value for Nim with `max_take` 3: multiples of four lose.
#[derive(Debug, Default)]
pub struct PerfectNimEvaluator;

impl Evaluator<Nim> for PerfectNimEvaluator {
    fn evaluate(&mut self, _oracle: &Nim, position: &u32) -> Result<f32, EvaluatorError> {
        Ok(if position % 4 == 0 { -1.0 } else { 1.0 })
    }
}
