//! Unique-keyed dictionary backed by a red black tree.

use crate::error::Result;
use crate::red_black_tree::{Compare, Natural, RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::iter::FromIterator;
use std::mem;
use std::result;

/// An ordered dictionary that holds at most one value per key.
///
/// Pushing a key that already exists replaces its value. Keys are ordered by a comparator,
/// `Natural` by default.
///
/// # Examples
///
/// ```
/// use rb_collections::dictionary::Dictionary;
///
/// let mut dict = Dictionary::new();
/// assert_eq!(dict.push("b", 2), None);
/// assert_eq!(dict.push("a", 1), None);
/// assert_eq!(dict.push("b", 3), Some(2));
///
/// assert_eq!(dict.get(&"b"), Ok(&3));
/// assert_eq!(dict.len(), 2);
/// assert_eq!(dict.drop_key(&"a"), Some(1));
/// assert!(!dict.contains_key(&"a"));
/// ```
pub struct Dictionary<T, U, C = Natural<T>> {
    map: RedBlackMap<T, U, C>,
}

impl<T, U> Dictionary<T, U>
where
    T: Ord,
{
    /// Constructs a new, empty `Dictionary<T, U>` ordered by `Ord`.
    pub fn new() -> Self {
        Dictionary {
            map: RedBlackMap::new(),
        }
    }
}

impl<T, U, C> Dictionary<T, U, C> {
    /// Constructs a new, empty `Dictionary<T, U, C>` ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Dictionary {
            map: RedBlackMap::with_comparator(comparator),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns an iterator over the dictionary in ascending key order.
    pub fn iter(&self) -> RedBlackMapIter<'_, T, U> {
        self.map.iter()
    }

    /// Returns the map that backs the dictionary.
    pub fn as_map(&self) -> &RedBlackMap<T, U, C> {
        &self.map
    }
}

impl<T, U, C> Dictionary<T, U, C>
where
    C: Compare<T>,
{
    /// Inserts a key-value pair. If the key already exists, its value is replaced and the old value
    /// is returned.
    pub fn push(&mut self, key: T, value: U) -> Option<U> {
        let mut cursor = self.map.find_mut(&key);
        if cursor.is_end() {
            self.map.push(key, value);
            return None;
        }
        Some(mem::replace(cursor.value_mut(), value))
    }

    /// Returns an immutable reference to the value associated with `key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if the key does not exist.
    pub fn get(&self, key: &T) -> Result<&U> {
        self.map.get(key)
    }

    /// Returns a mutable reference to the value associated with `key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if the key does not exist.
    pub fn get_mut(&mut self, key: &T) -> Result<&mut U> {
        self.map.get_mut(key)
    }

    /// Removes `key` and returns its value, or `None` if the key does not exist.
    pub fn drop_key(&mut self, key: &T) -> Option<U> {
        self.map.remove(key).map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &T) -> bool {
        self.map.contains_key(key)
    }

    fn filtered<F>(&self, mut keep: F) -> Self
    where
        T: Clone,
        U: Clone,
        C: Clone,
        F: FnMut(&T) -> bool,
    {
        let mut ret = Dictionary::with_comparator(self.map.comparator().clone());
        for (key, value) in self.iter().filter(|(key, _)| keep(key)) {
            ret.map.push(key.clone(), value.clone());
        }
        ret
    }

    /// Returns a dictionary with the entries of both dictionaries. Where both hold a key, the
    /// value from `self` wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::dictionary::Dictionary;
    ///
    /// let first: Dictionary<u32, &str> = vec![(1, "a"), (2, "b")].into_iter().collect();
    /// let second: Dictionary<u32, &str> = vec![(2, "x"), (3, "c")].into_iter().collect();
    ///
    /// let union = first.union(&second);
    /// assert_eq!(union.iter().collect::<Vec<_>>(), vec![(&1, &"a"), (&2, &"b"), (&3, &"c")]);
    /// ```
    pub fn union(&self, other: &Self) -> Self
    where
        T: Clone,
        U: Clone,
        C: Clone,
    {
        let mut ret = self.filtered(|_| true);
        for (key, value) in other.iter() {
            if !self.contains_key(key) {
                ret.map.push(key.clone(), value.clone());
            }
        }
        ret
    }

    /// Returns a dictionary with the entries of `self` whose keys are also in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::dictionary::Dictionary;
    ///
    /// let first: Dictionary<u32, &str> = vec![(1, "a"), (2, "b")].into_iter().collect();
    /// let second: Dictionary<u32, &str> = vec![(2, "x"), (3, "c")].into_iter().collect();
    ///
    /// let intersection = first.intersection(&second);
    /// assert_eq!(intersection.iter().collect::<Vec<_>>(), vec![(&2, &"b")]);
    /// ```
    pub fn intersection(&self, other: &Self) -> Self
    where
        T: Clone,
        U: Clone,
        C: Clone,
    {
        self.filtered(|key| other.contains_key(key))
    }

    /// Returns a dictionary with the entries of `self` whose keys are not in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::dictionary::Dictionary;
    ///
    /// let first: Dictionary<u32, &str> = vec![(1, "a"), (2, "b")].into_iter().collect();
    /// let second: Dictionary<u32, &str> = vec![(2, "x"), (3, "c")].into_iter().collect();
    ///
    /// let complement = first.complement(&second);
    /// assert_eq!(complement.iter().collect::<Vec<_>>(), vec![(&1, &"a")]);
    /// ```
    pub fn complement(&self, other: &Self) -> Self
    where
        T: Clone,
        U: Clone,
        C: Clone,
    {
        self.filtered(|key| !other.contains_key(key))
    }
}

impl<T, U, C> Clone for Dictionary<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        Dictionary {
            map: self.map.clone(),
        }
    }
}

impl<T, U, C> Default for Dictionary<T, U, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, U, C> fmt::Debug for Dictionary<T, U, C>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.map, f)
    }
}

impl<T, U, C> PartialEq for Dictionary<T, U, C>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T, U, C> Extend<(T, U)> for Dictionary<T, U, C>
where
    C: Compare<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (T, U)>,
    {
        for (key, value) in iter {
            self.push(key, value);
        }
    }
}

impl<T, U, C> FromIterator<(T, U)> for Dictionary<T, U, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
    {
        let mut ret = Self::default();
        ret.extend(iter);
        ret
    }
}

impl<T, U, C> IntoIterator for Dictionary<T, U, C> {
    type IntoIter = RedBlackMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a, T, U, C> IntoIterator for &'a Dictionary<T, U, C> {
    type IntoIter = RedBlackMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, U, C> Serialize for Dictionary<T, U, C>
where
    T: Serialize,
    U: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.map.serialize(serializer)
    }
}

impl<'de, T, U, C> Deserialize<'de> for Dictionary<T, U, C>
where
    T: Deserialize<'de>,
    U: Deserialize<'de>,
    C: Compare<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map: RedBlackMap<T, U, C> = RedBlackMap::deserialize(deserializer)?;
        Ok(map.into_iter().collect())
    }
}
