use serde_derive::{Deserialize, Serialize};

/// A key-value pair stored in a node.
///
/// Deletion may swap entries between nodes, so an entry's position in storage is not stable across
/// removals.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Entry<T, U> {
    pub key: T,
    pub value: U,
}

impl<T, U> Entry<T, U> {
    pub fn new(key: T, value: U) -> Self {
        Entry { key, value }
    }

    pub fn as_pair(&self) -> (&T, &U) {
        (&self.key, &self.value)
    }

    pub fn as_pair_mut(&mut self) -> (&T, &mut U) {
        (&self.key, &mut self.value)
    }

    pub fn into_pair(self) -> (T, U) {
        (self.key, self.value)
    }
}
