//! Core contract between the search and the rules engine
//!
//! This crate provides the position oracle abstraction:
//! - `Oracle`: legal move enumeration, move application, terminal test
//! - `Terminal`: finished-game status for the side to move
//! - `OracleError`: failures split into invariant violations and recoverable
//!   adapter failures

pub mod oracle;
pub mod terminal;

pub use oracle::{Oracle, OracleError};
pub use terminal::Terminal;
