use crate::red_black_tree::map::RedBlackMap;
use crate::red_black_tree::node::Link;
use std::fmt;

/// A detached reference to a slot of a `RedBlackMap`: either an entry or the end.
///
/// Positions do not borrow the map, so they can be held across mutations. The map does not track
/// them: after an insertion or removal, a position may name a different entry or none at all.
/// Using a position whose entry was removed panics; using one whose slot was reused silently
/// refers to the new entry. Two positions are equal when they name the same slot of the same map.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Position {
    pub(crate) node: Link,
    pub(crate) map_id: usize,
}

impl Position {
    pub(crate) fn new(node: Link, map_id: usize) -> Self {
        Position { node, map_id }
    }

    /// Returns `true` if this is the end position of its map.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

/// A bidirectional cursor over the entries of a `RedBlackMap`.
///
/// The cursor points either at an entry or at the end, which sits past the largest entry.
/// Moving past the end in either direction, or reading the entry at the end, panics.
///
/// # Examples
///
/// ```
/// use rb_collections::red_black_tree::RedBlackMap;
///
/// let map: RedBlackMap<u32, &str> = vec![(1, "a"), (2, "b")].into_iter().collect();
///
/// let mut cursor = map.begin();
/// assert_eq!(cursor.entry(), Some((&1, &"a")));
/// cursor.move_next();
/// assert_eq!(cursor.key(), &2);
/// cursor.move_next();
/// assert!(cursor.is_end());
/// assert_eq!(cursor, map.end());
/// ```
pub struct Cursor<'a, T, U, C> {
    map: &'a RedBlackMap<T, U, C>,
    node: Link,
}

impl<'a, T, U, C> Cursor<'a, T, U, C> {
    pub(crate) fn new(map: &'a RedBlackMap<T, U, C>, node: Link) -> Self {
        Cursor { map, node }
    }

    /// Returns a position that can be passed back to the map after the cursor is gone.
    pub fn position(&self) -> Position {
        Position::new(self.node, self.map.id)
    }

    /// Returns `true` if the cursor is at the end.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Returns the entry under the cursor, or `None` at the end.
    pub fn entry(&self) -> Option<(&'a T, &'a U)> {
        let map = self.map;
        self.node
            .map(|handle| map.tree.node(handle).entry.as_pair())
    }

    /// Returns the key under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn key(&self) -> &'a T {
        self.entry().expect("Error: dereferencing the end cursor.").0
    }

    /// Returns the value under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn value(&self) -> &'a U {
        self.entry().expect("Error: dereferencing the end cursor.").1
    }

    /// Moves to the next entry in ascending order, or to the end after the largest entry.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn move_next(&mut self) {
        let handle = self.node.expect("Error: advancing past the end cursor.");
        self.node = self.map.tree.successor(handle);
    }

    /// Moves to the previous entry in ascending order, or to the end before the smallest entry.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn move_prev(&mut self) {
        let handle = self.node.expect("Error: retreating from the end cursor.");
        self.node = self.map.tree.predecessor(handle);
    }
}

impl<'a, T, U, C> Clone for Cursor<'a, T, U, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, U, C> Copy for Cursor<'a, T, U, C> {}

impl<'a, T, U, C> PartialEq for Cursor<'a, T, U, C> {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
    }
}

impl<'a, T, U, C> Eq for Cursor<'a, T, U, C> {}

impl<'a, T, U, C> fmt::Debug for Cursor<'a, T, U, C>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("entry", &self.entry())
            .finish()
    }
}

/// A bidirectional cursor over the entries of a `RedBlackMap` that can change values and erase
/// entries.
///
/// # Examples
///
/// ```
/// use rb_collections::red_black_tree::RedBlackMap;
///
/// let mut map: RedBlackMap<u32, u32> = (0..4).map(|key| (key, key)).collect();
///
/// let mut cursor = map.begin_mut();
/// while !cursor.is_end() {
///     if cursor.key() % 2 == 0 {
///         cursor.erase();
///     } else {
///         *cursor.value_mut() *= 10;
///         cursor.move_next();
///     }
/// }
///
/// assert_eq!(map.iter().collect::<Vec<(&u32, &u32)>>(), vec![(&1, &10), (&3, &30)]);
/// ```
pub struct CursorMut<'a, T, U, C> {
    map: &'a mut RedBlackMap<T, U, C>,
    node: Link,
}

impl<'a, T, U, C> CursorMut<'a, T, U, C> {
    pub(crate) fn new(map: &'a mut RedBlackMap<T, U, C>, node: Link) -> Self {
        CursorMut { map, node }
    }

    /// Returns a detached position for the entry under the cursor, usable after the cursor is
    /// dropped.
    pub fn position(&self) -> Position {
        Position::new(self.node, self.map.id)
    }

    /// Returns `true` if the cursor is past the largest entry.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Returns a read-only cursor at the same entry.
    pub fn as_cursor(&self) -> Cursor<'_, T, U, C> {
        Cursor::new(&*self.map, self.node)
    }

    /// Returns the entry under the cursor, or `None` at the end.
    pub fn entry(&self) -> Option<(&T, &U)> {
        self.as_cursor().entry()
    }

    /// Returns the key and a mutable reference to the value under the cursor, or `None` at the
    /// end.
    pub fn entry_mut(&mut self) -> Option<(&T, &mut U)> {
        let node = self.node?;
        Some(self.map.tree.node_mut(node).entry.as_pair_mut())
    }

    /// Returns the key under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn key(&self) -> &T {
        self.as_cursor().key()
    }

    /// Returns the value under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn value(&self) -> &U {
        self.as_cursor().value()
    }

    /// Returns a mutable reference to the value under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn value_mut(&mut self) -> &mut U {
        self.entry_mut()
            .expect("Error: dereferencing the end cursor.")
            .1
    }

    /// Converts the cursor into a mutable reference to the value under it, borrowed for as long
    /// as the map was.
    pub fn into_value_mut(self) -> Option<&'a mut U> {
        let CursorMut { map, node } = self;
        match node {
            Some(handle) => Some(&mut map.tree.node_mut(handle).entry.value),
            None => None,
        }
    }

    /// Moves to the next entry in ascending order, or to the end after the largest entry.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn move_next(&mut self) {
        let handle = self.node.expect("Error: advancing past the end cursor.");
        self.node = self.map.tree.successor(handle);
    }

    /// Moves to the previous entry in ascending order, or to the end before the smallest entry.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn move_prev(&mut self) {
        let handle = self.node.expect("Error: retreating from the end cursor.");
        self.node = self.map.tree.predecessor(handle);
    }

    /// Removes the entry under the cursor and moves to the entry that followed it. At the end this
    /// does nothing and returns `None`.
    pub fn erase(&mut self) -> Option<(T, U)> {
        let handle = self.node?;
        let mut tracked = [self.map.tree.successor(handle)];
        let entry = self.map.tree.remove(handle, &mut tracked);
        self.node = tracked[0];
        Some(entry.into_pair())
    }
}

impl<'a, T, U, C> fmt::Debug for CursorMut<'a, T, U, C>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("entry", &self.entry())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::red_black_tree::RedBlackMap;

    fn map_of(keys: &[u32]) -> RedBlackMap<u32, u32> {
        keys.iter().map(|key| (*key, key * 10)).collect()
    }

    #[test]
    fn test_walk_forward_and_back() {
        let map = map_of(&[5, 3, 8, 1, 4]);
        let mut cursor = map.begin();
        let mut keys = Vec::new();
        while !cursor.is_end() {
            keys.push(*cursor.key());
            cursor.move_next();
        }
        assert_eq!(keys, vec![1, 3, 4, 5, 8]);

        let mut cursor = map.back();
        keys.clear();
        while !cursor.is_end() {
            keys.push(*cursor.key());
            cursor.move_prev();
        }
        assert_eq!(keys, vec![8, 5, 4, 3, 1]);
    }

    #[test]
    fn test_equality_uses_map_identity() {
        let map = map_of(&[1]);
        let copy = map.clone();
        assert_eq!(map.begin(), map.begin());
        assert_ne!(map.begin(), map.end());
        assert_ne!(map.end(), copy.end());
    }

    #[test]
    #[should_panic]
    fn test_move_next_past_end() {
        let map = map_of(&[1]);
        let mut cursor = map.end();
        cursor.move_next();
    }

    #[test]
    #[should_panic]
    fn test_move_prev_from_end() {
        let map = map_of(&[1]);
        let mut cursor = map.end();
        cursor.move_prev();
    }

    #[test]
    #[should_panic]
    fn test_key_at_end() {
        let map = map_of(&[]);
        map.end().key();
    }

    #[test]
    fn test_cursor_mut_value() {
        let mut map = map_of(&[1, 2]);
        {
            let mut cursor = map.begin_mut();
            *cursor.value_mut() = 7;
            cursor.move_next();
            assert_eq!(cursor.as_cursor().entry(), Some((&2, &20)));
        }
        assert_eq!(map.get(&1), Ok(&7));
    }

    #[test]
    fn test_cursor_mut_erase_moves_to_next() {
        let mut map = map_of(&(0..32).collect::<Vec<u32>>());
        let mut cursor = map.find_mut(&10);
        assert_eq!(cursor.erase(), Some((10, 100)));
        assert_eq!(cursor.key(), &11);
        assert_eq!(cursor.erase(), Some((11, 110)));
        assert_eq!(cursor.key(), &12);
        map.validate().unwrap();
        assert_eq!(map.len(), 30);
    }

    #[test]
    fn test_cursor_mut_erase_at_end() {
        let mut map = map_of(&[1]);
        let mut cursor = map.end_mut();
        assert_eq!(cursor.erase(), None);
        assert!(cursor.is_end());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_into_value_mut() {
        let mut map = map_of(&[1]);
        if let Some(value) = map.find_mut(&1).into_value_mut() {
            *value += 1;
        }
        assert_eq!(map[&1], 11);
        assert_eq!(map.find_mut(&2).into_value_mut(), None);
    }
}
