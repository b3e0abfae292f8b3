use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::red_black_tree::cursor::{Cursor, CursorMut, Position};
use crate::red_black_tree::node::{Link, Side};
use crate::red_black_tree::traverse;
use crate::red_black_tree::tree::{Stats, Tree};
use compare::{Compare, Natural};
use log::debug;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Index, IndexMut};
use std::result;
use std::sync::atomic::{self, AtomicUsize};
use std::vec;

/// The number of nodes a map allocates at a time unless told otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    NEXT_ID.fetch_add(1, atomic::Ordering::Relaxed)
}

fn into_result<A>(result: result::Result<A, Infallible>) -> A {
    match result {
        Ok(acc) => acc,
        Err(never) => match never {},
    }
}

/// An ordered map implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree. Every node is colored red or black, no
/// red node has a red child, and every path from the root to an empty slot passes through the same
/// number of black nodes, which keeps the height within twice the logarithm of the size.
///
/// Keys may repeat: pushing a key that already exists adds another entry after the existing ones.
/// Lookups return the first matching entry in ascending order. Keys are ordered by a comparator,
/// `Natural` by default.
///
/// # Examples
///
/// ```
/// use rb_collections::red_black_tree::RedBlackMap;
///
/// let mut map = RedBlackMap::new();
/// map.push(0, 1);
/// map.push(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert!(map.get(&1).is_err());
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some((&0, &1)));
/// assert_eq!(map.lower_bound(&2).key(), &3);
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct RedBlackMap<T, U, C = Natural<T>> {
    pub(crate) tree: Tree<T, U>,
    pub(crate) comparator: C,
    pub(crate) id: usize,
}

impl<T, U> RedBlackMap<T, U>
where
    T: Ord,
{
    /// Constructs a new, empty `RedBlackMap<T, U>` ordered by `Ord`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }

    /// Constructs a new, empty `RedBlackMap<T, U>` that allocates `chunk_size` nodes at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self::with_comparator_and_chunk_size(compare::natural(), chunk_size)
    }
}

impl<T, U, C> RedBlackMap<T, U, C> {
    /// Constructs a new, empty `RedBlackMap<T, U, C>` ordered by `comparator`. Any
    /// `Fn(&T, &T) -> Ordering` closure is a comparator, as are the adaptors of the `compare`
    /// crate.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::{Compare, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::with_comparator(compare::natural::<u32>().rev());
    /// map.push(1, "a");
    /// map.push(3, "c");
    /// map.push(2, "b");
    ///
    /// assert_eq!(map.keys().collect::<Vec<&u32>>(), vec![&3, &2, &1]);
    /// assert!(map.comparator().compares_lt(&3, &1));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_chunk_size(comparator, DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackMap<T, U, C>` ordered by `comparator` that allocates
    /// `chunk_size` nodes at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_comparator_and_chunk_size(comparator: C, chunk_size: usize) -> Self {
        RedBlackMap {
            tree: Tree::new(chunk_size),
            comparator,
            id: next_id(),
        }
    }

    /// Returns the comparator that orders the keys of the map.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.push(1, 1);
    /// map.push(1, 2);
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the map, removing all entries. Positions into the map are invalidated.
    pub fn clear(&mut self) {
        debug!("clearing map with {} entries", self.len());
        self.tree.clear();
    }

    fn position(&self, node: Link) -> Position {
        Position::new(node, self.id)
    }

    // Checks that `position` came from this map and still names a live node.
    fn resolve(&self, position: Position) -> Link {
        assert!(
            position.map_id == self.id,
            "Error: position belongs to a different map.",
        );
        if let Some(handle) = position.node {
            assert!(
                self.tree.arena.contains(handle),
                "Error: position refers to an erased entry.",
            );
        }
        position.node
    }

    /// Returns a cursor at the smallest entry, or at the end if the map is empty.
    pub fn begin(&self) -> Cursor<'_, T, U, C> {
        Cursor::new(self, self.tree.first())
    }

    /// Returns a cursor at the largest entry, or at the end if the map is empty.
    pub fn back(&self) -> Cursor<'_, T, U, C> {
        Cursor::new(self, self.tree.last())
    }

    /// Returns the end cursor.
    pub fn end(&self) -> Cursor<'_, T, U, C> {
        Cursor::new(self, None)
    }

    /// Returns a mutable cursor at the smallest entry, or at the end if the map is empty.
    pub fn begin_mut(&mut self) -> CursorMut<'_, T, U, C> {
        let first = self.tree.first();
        CursorMut::new(self, first)
    }

    /// Returns the end cursor, mutably borrowing the map.
    pub fn end_mut(&mut self) -> CursorMut<'_, T, U, C> {
        CursorMut::new(self, None)
    }

    /// Returns a cursor at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` belongs to a different map or its entry was erased.
    pub fn cursor(&self, position: Position) -> Cursor<'_, T, U, C> {
        let node = self.resolve(position);
        Cursor::new(self, node)
    }

    /// Returns a mutable cursor at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` belongs to a different map or its entry was erased.
    pub fn cursor_mut(&mut self, position: Position) -> CursorMut<'_, T, U, C> {
        let node = self.resolve(position);
        CursorMut::new(self, node)
    }

    /// Removes the entry at `position` and returns the position of the entry that followed it.
    /// Erasing the end position does nothing and returns the end position.
    ///
    /// Rebalancing is logarithmic, but an entry with two children first measures the height of
    /// both of its subtrees, which is linear in their size.
    ///
    /// # Panics
    ///
    /// Panics if `position` belongs to a different map or its entry was erased.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map: RedBlackMap<u32, u32> = (0..3).map(|key| (key, key)).collect();
    /// let position = map.find(&1).position();
    /// let next = map.erase(position);
    /// assert_eq!(map.cursor(next).key(), &2);
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn erase(&mut self, position: Position) -> Position {
        let handle = match self.resolve(position) {
            Some(handle) => handle,
            None => return position,
        };
        let mut tracked = [self.tree.successor(handle)];
        self.tree.remove(handle, &mut tracked);
        self.position(tracked[0])
    }

    /// Removes every entry from `first` up to but not including `last` and returns the position of
    /// the entry that was at `last`.
    ///
    /// # Panics
    ///
    /// Panics if either position belongs to a different map or names an erased entry, or if `last`
    /// does not follow `first`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map: RedBlackMap<u32, u32> = (0..10).map(|key| (key, key)).collect();
    /// let first = map.lower_bound(&2).position();
    /// let last = map.lower_bound(&8).position();
    /// map.erase_range(first, last);
    /// assert_eq!(map.keys().cloned().collect::<Vec<u32>>(), vec![0, 1, 8, 9]);
    /// ```
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        let mut curr = self.resolve(first);
        let mut last = self.resolve(last);
        let mut erased = 0;
        while curr != last {
            let handle = curr.expect("Error: reached the end before the last position.");
            let mut tracked = [self.tree.successor(handle), last];
            self.tree.remove(handle, &mut tracked);
            curr = tracked[0];
            last = tracked[1];
            erased += 1;
        }
        debug!("erased {} entries in range", erased);
        self.position(last)
    }

    /// Returns an iterator over the map in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.push(1, 1);
    /// map.push(2, 2);
    /// map.push(3, 3);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next_back(), Some((&3, &3)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackMapIter<'_, T, U> {
        RedBlackMapIter {
            tree: &self.tree,
            front: self.tree.first(),
            back: self.tree.last(),
            len: self.len(),
        }
    }

    /// Returns an iterator over the keys of the map in ascending order.
    pub fn keys(&self) -> Keys<'_, T, U> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map in ascending key order.
    pub fn values(&self) -> Values<'_, T, U> {
        Values { inner: self.iter() }
    }

    /// Returns the entry with the smallest key, or `None` if the map is empty.
    pub fn min(&self) -> Option<(&T, &U)> {
        self.begin().entry()
    }

    /// Returns the entry with the largest key, or `None` if the map is empty.
    pub fn max(&self) -> Option<(&T, &U)> {
        self.back().entry()
    }

    /// Folds `f` over the entries in ascending key order and returns the accumulator.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, &str> = vec![(2, "b"), (1, "a"), (3, "c")].into_iter().collect();
    /// let joined = map.traverse_lnr(String::new(), |mut acc, _, value| {
    ///     acc.push_str(value);
    ///     acc
    /// });
    /// assert_eq!(joined, "abc");
    /// ```
    pub fn traverse_lnr<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, &T, &U) -> A,
    {
        into_result(self.try_traverse_lnr(init, |acc, key, value| Ok(f(acc, key, value))))
    }

    /// Folds `f` over the entries in descending key order and returns the accumulator.
    pub fn traverse_rnl<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, &T, &U) -> A,
    {
        into_result(self.try_traverse_rnl(init, |acc, key, value| Ok(f(acc, key, value))))
    }

    /// Folds `f` over the entries level by level from the root, left to right within a level, and
    /// returns the accumulator.
    pub fn traverse_breadth<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, &T, &U) -> A,
    {
        into_result(self.try_traverse_breadth(init, |acc, key, value| Ok(f(acc, key, value))))
    }

    /// Folds a fallible `f` over the entries in ascending key order, stopping at the first error.
    pub fn try_traverse_lnr<A, E, F>(&self, init: A, f: F) -> result::Result<A, E>
    where
        F: FnMut(A, &T, &U) -> result::Result<A, E>,
    {
        traverse::depth_first(&self.tree, Side::Left, init, f)
    }

    /// Folds a fallible `f` over the entries in descending key order, stopping at the first error.
    pub fn try_traverse_rnl<A, E, F>(&self, init: A, f: F) -> result::Result<A, E>
    where
        F: FnMut(A, &T, &U) -> result::Result<A, E>,
    {
        traverse::depth_first(&self.tree, Side::Right, init, f)
    }

    /// Folds a fallible `f` over the entries in level order, stopping at the first error.
    pub fn try_traverse_breadth<A, E, F>(&self, init: A, f: F) -> result::Result<A, E>
    where
        F: FnMut(A, &T, &U) -> result::Result<A, E>,
    {
        traverse::breadth_first(&self.tree, init, f)
    }
}

impl<T, U, C> RedBlackMap<T, U, C>
where
    C: Compare<T>,
{
    /// Constructs a map from a sequence of key-value pairs ordered by `comparator`.
    pub fn from_pairs<I>(comparator: C, pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
    {
        let mut map = Self::with_comparator(comparator);
        map.extend(pairs);
        map
    }

    fn attach(&mut self, key: T, value: U) -> CursorMut<'_, T, U, C> {
        let handle = self.tree.insert(Entry::new(key, value), &self.comparator);
        CursorMut::new(self, Some(handle))
    }

    /// Adds a key-value pair to the map and returns a cursor at it. An existing equal key is kept
    /// and the new entry is placed after it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.push(1, "a");
    /// *map.push(1, "b").value_mut() = "c";
    /// assert_eq!(map.values().collect::<Vec<&&str>>(), vec![&"a", &"c"]);
    /// ```
    pub fn push(&mut self, key: T, value: U) -> CursorMut<'_, T, U, C> {
        self.attach(key, value)
    }

    /// Adds a key-value pair to the map and returns a cursor at it.
    pub fn insert(&mut self, pair: (T, U)) -> CursorMut<'_, T, U, C> {
        let (key, value) = pair;
        self.attach(key, value)
    }

    /// Adds an entry whose value is built by `make_value` and returns a cursor at it.
    pub fn emplace<F>(&mut self, key: T, make_value: F) -> CursorMut<'_, T, U, C>
    where
        F: FnOnce() -> U,
    {
        self.attach(key, make_value())
    }

    /// Returns a cursor at the first entry whose key equals `key`, or the end cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.push(1, 1);
    /// assert_eq!(map.find(&1).value(), &1);
    /// assert!(map.find(&0).is_end());
    /// ```
    pub fn find(&self, key: &T) -> Cursor<'_, T, U, C> {
        Cursor::new(self, self.tree.find(key, &self.comparator))
    }

    /// Returns a mutable cursor at the first entry whose key equals `key`, or the end cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.push(1, 1);
    /// map.push(1, 2);
    ///
    /// let mut cursor = map.find_mut(&1);
    /// *cursor.value_mut() = 10;
    /// cursor.move_next();
    /// assert_eq!(cursor.entry(), Some((&1, &2)));
    /// assert!(map.find_mut(&0).is_end());
    /// ```
    pub fn find_mut(&mut self, key: &T) -> CursorMut<'_, T, U, C> {
        let node = self.tree.find(key, &self.comparator);
        CursorMut::new(self, node)
    }

    /// Returns the number of entries whose key equals `key`.
    pub fn count(&self, key: &T) -> usize {
        let mut count = 0;
        let mut curr = self.tree.find(key, &self.comparator);
        while let Some(handle) = curr {
            if !self.comparator.compares_eq(&self.tree.node(handle).entry.key, key) {
                break;
            }
            count += 1;
            curr = self.tree.successor(handle);
        }
        count
    }

    /// Returns `true` if some entry has a key equal to `key`.
    pub fn contains_key(&self, key: &T) -> bool {
        self.tree.find(key, &self.comparator).is_some()
    }

    /// Returns an immutable reference to the value of the first entry whose key equals `key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if no entry has the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::Error;
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.push(1, 1);
    /// assert_eq!(map.get(&0), Err(Error::KeyNotFound));
    /// assert_eq!(map.get(&1), Ok(&1));
    /// ```
    pub fn get(&self, key: &T) -> Result<&U> {
        self.tree
            .find(key, &self.comparator)
            .map(|handle| &self.tree.node(handle).entry.value)
            .ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value of the first entry whose key equals `key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if no entry has the key.
    pub fn get_mut(&mut self, key: &T) -> Result<&mut U> {
        match self.tree.find(key, &self.comparator) {
            Some(handle) => Ok(&mut self.tree.node_mut(handle).entry.value),
            None => Err(Error::KeyNotFound),
        }
    }

    /// Removes the first entry whose key equals `key` and returns it, or `None` if there is no
    /// such entry. Costs the same as `erase`.
    pub fn remove(&mut self, key: &T) -> Option<(T, U)> {
        let handle = self.tree.find(key, &self.comparator)?;
        Some(self.tree.remove(handle, &mut []).into_pair())
    }

    /// Returns a cursor at the first entry whose key is not less than `key`, or the end cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, ()> = vec![(1, ()), (3, ())].into_iter().collect();
    /// assert_eq!(map.lower_bound(&1).key(), &1);
    /// assert_eq!(map.lower_bound(&2).key(), &3);
    /// assert!(map.lower_bound(&4).is_end());
    /// ```
    pub fn lower_bound(&self, key: &T) -> Cursor<'_, T, U, C> {
        Cursor::new(self, self.tree.lower_bound(key, &self.comparator))
    }

    /// Returns a cursor at the first entry whose key is greater than `key`, or the end cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, ()> = vec![(1, ()), (3, ())].into_iter().collect();
    /// assert_eq!(map.upper_bound(&1).key(), &3);
    /// assert!(map.upper_bound(&3).is_end());
    /// ```
    pub fn upper_bound(&self, key: &T) -> Cursor<'_, T, U, C> {
        Cursor::new(self, self.tree.upper_bound(key, &self.comparator))
    }

    /// Returns a mutable cursor at the first entry whose key is not less than `key`, or the end
    /// cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map: RedBlackMap<u32, u32> = vec![(1, 1), (3, 3), (5, 5)].into_iter().collect();
    /// *map.lower_bound_mut(&2).value_mut() = 30;
    /// *map.upper_bound_mut(&3).value_mut() = 50;
    /// assert_eq!(map.values().collect::<Vec<&u32>>(), vec![&1, &30, &50]);
    /// assert!(map.lower_bound_mut(&6).is_end());
    /// ```
    pub fn lower_bound_mut(&mut self, key: &T) -> CursorMut<'_, T, U, C> {
        let node = self.tree.lower_bound(key, &self.comparator);
        CursorMut::new(self, node)
    }

    /// Returns a mutable cursor at the first entry whose key is greater than `key`, or the end
    /// cursor.
    pub fn upper_bound_mut(&mut self, key: &T) -> CursorMut<'_, T, U, C> {
        let node = self.tree.upper_bound(key, &self.comparator);
        CursorMut::new(self, node)
    }

    /// Checks every red black invariant, the parent links, the key order and the entry count.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = (0..100).map(|key| (key, key)).collect();
    /// let stats = map.validate().unwrap();
    /// assert_eq!(stats.entries(), 100);
    /// assert!(stats.height() <= 2 * stats.black_height());
    /// ```
    pub fn validate(&self) -> Result<Stats> {
        self.tree.validate(&self.comparator)
    }
}

impl<T, U, C> Clone for RedBlackMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        debug!("cloning map with {} entries", self.len());
        RedBlackMap {
            tree: self.tree.clone(),
            comparator: self.comparator.clone(),
            id: next_id(),
        }
    }
}

impl<T, U, C> Default for RedBlackMap<T, U, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, U, C> fmt::Debug for RedBlackMap<T, U, C>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, U, C> PartialEq for RedBlackMap<T, U, C>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U, C> Eq for RedBlackMap<T, U, C>
where
    T: Eq,
    U: Eq,
{
}

impl<T, U, C> Extend<(T, U)> for RedBlackMap<T, U, C>
where
    C: Compare<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (T, U)>,
    {
        let before = self.len();
        for (key, value) in iter {
            self.push(key, value);
        }
        debug!("loaded {} entries", self.len() - before);
    }
}

impl<T, U, C> FromIterator<(T, U)> for RedBlackMap<T, U, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
    {
        Self::from_pairs(C::default(), iter)
    }
}

impl<'a, T, U, C> Index<&'a T> for RedBlackMap<T, U, C>
where
    C: Compare<T>,
{
    type Output = U;

    fn index(&self, key: &T) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<'a, T, U, C> IndexMut<&'a T> for RedBlackMap<T, U, C>
where
    C: Compare<T>,
{
    fn index_mut(&mut self, key: &T) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}

impl<T, U, C> Serialize for RedBlackMap<T, U, C>
where
    T: Serialize,
    U: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter().map(|(key, value)| Entry::new(key, value)))
    }
}

impl<'de, T, U, C> Deserialize<'de> for RedBlackMap<T, U, C>
where
    T: Deserialize<'de>,
    U: Deserialize<'de>,
    C: Compare<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries: Vec<Entry<T, U>> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().map(Entry::into_pair).collect())
    }
}

impl<T, U, C> IntoIterator for RedBlackMap<T, U, C> {
    type IntoIter = RedBlackMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        let RedBlackMap { mut tree, .. } = self;
        let mut handles = Vec::with_capacity(tree.len());
        let mut curr = tree.first();
        while let Some(handle) = curr {
            handles.push(handle);
            curr = tree.successor(handle);
        }
        let entries: Vec<(T, U)> = handles
            .into_iter()
            .map(|handle| tree.arena.free(handle).entry.into_pair())
            .collect();
        RedBlackMapIntoIter {
            inner: entries.into_iter(),
        }
    }
}

impl<'a, T, U, C> IntoIterator for &'a RedBlackMap<T, U, C> {
    type IntoIter = RedBlackMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackMap<T, U, C>`.
///
/// This iterator traverses the elements of the map in ascending order and yields owned entries.
pub struct RedBlackMapIntoIter<T, U> {
    inner: vec::IntoIter<(T, U)>,
}

impl<T, U> Iterator for RedBlackMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, U> DoubleEndedIterator for RedBlackMapIntoIter<T, U> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T, U> ExactSizeIterator for RedBlackMapIntoIter<T, U> {}

/// An iterator for `RedBlackMap<T, U, C>`.
///
/// This iterator traverses the elements of the map in ascending order and yields immutable
/// references. It walks parent links, so it needs no auxiliary stack.
pub struct RedBlackMapIter<'a, T, U> {
    tree: &'a Tree<T, U>,
    front: Link,
    back: Link,
    len: usize,
}

impl<'a, T, U> Iterator for RedBlackMapIter<'a, T, U> {
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let tree = self.tree;
        let handle = self.front?;
        self.front = tree.successor(handle);
        self.len -= 1;
        Some(tree.node(handle).entry.as_pair())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T, U> DoubleEndedIterator for RedBlackMapIter<'a, T, U> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let tree = self.tree;
        let handle = self.back?;
        self.back = tree.predecessor(handle);
        self.len -= 1;
        Some(tree.node(handle).entry.as_pair())
    }
}

impl<'a, T, U> ExactSizeIterator for RedBlackMapIter<'a, T, U> {}

/// An iterator over the keys of a `RedBlackMap<T, U, C>` in ascending order.
pub struct Keys<'a, T, U> {
    inner: RedBlackMapIter<'a, T, U>,
}

impl<'a, T, U> Iterator for Keys<'a, T, U> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T, U> DoubleEndedIterator for Keys<'a, T, U> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

/// An iterator over the values of a `RedBlackMap<T, U, C>` in ascending key order.
pub struct Values<'a, T, U> {
    inner: RedBlackMapIter<'a, T, U>,
}

impl<'a, T, U> Iterator for Values<'a, T, U> {
    type Item = &'a U;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T, U> DoubleEndedIterator for Values<'a, T, U> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}
