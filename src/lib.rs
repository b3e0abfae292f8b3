//! An ordered map backed by a red black tree with parent links, and the collections built on it.
//!
//! - `red_black_tree::RedBlackMap` is the map itself: bidirectional cursors, bound queries,
//!   range erasure, and ascending, descending and level order folds.
//! - `dictionary::Dictionary` is a unique-keyed wrapper with set operations.
//! - `matrix::Matrix` stores a dense matrix in a map keyed by row-major cell index.
//! - `summation::Sum` is an overflow-checked accumulator for the folds.

mod entry;
mod error;

pub mod arena;
pub mod dictionary;
pub mod matrix;
pub mod red_black_tree;
pub mod summation;

pub use self::error::{Error, Result};
