//! Text delta computation
//!
//! This module provides a trait-based architecture for turning two content
//! snapshots into the text that was added and deleted between them. The
//! default algorithm is a line-set difference; positional algorithms backed
//! by `similar` are available as alternatives.

pub mod algorithms;
pub mod generator;
pub mod lines;

pub use algorithms::{
    DiffAlgorithm, DiffAlgorithmType, LineSetAlgorithm, MyersAlgorithm, PatienceAlgorithm,
    TextDelta,
};
pub use generator::DiffEngine;
pub use lines::split_lines;

/// Convenience function: line-set delta as `(added_text, deleted_text)`
pub fn diff(old: &str, new: &str) -> (String, String) {
    LineSetAlgorithm.diff(old, new).into_parts()
}

/// Number of characters in `text`, counted as Unicode scalar values
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}
