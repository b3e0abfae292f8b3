//! Self-balancing binary search tree where every node is colored red or black, no red node has a
//! red child, and every root to leaf path holds the same number of black nodes.
//!
//! Nodes are stored in a `TypedArena` and link to their children and parent by handle. Empty child
//! slots stand in for the black sentinel leaf. Iteration walks parent links, so cursors move in
//! both directions without an auxiliary stack.

mod cursor;
mod map;
mod node;
mod traverse;
mod tree;

pub use self::cursor::{Cursor, CursorMut, Position};
pub use self::map::{
    Keys, RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter, Values, DEFAULT_CHUNK_SIZE,
};
pub use self::tree::Stats;
pub use compare::{Compare, Natural};
