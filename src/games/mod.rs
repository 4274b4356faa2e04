//! Game engines.

pub mod scrabble;
