use crate::arena::{Handle, TypedArena};
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::red_black_tree::node::{Color, Link, Node, Side};
use compare::Compare;
use log::trace;
use std::cmp::Ordering;
use std::mem;

/// The node graph of a red black tree. Nodes live in an arena and refer to each other by handle,
/// so rotations only rewrite links and never move a node between owners.
#[derive(Clone)]
pub struct Tree<T, U> {
    pub arena: TypedArena<Node<T, U>>,
    pub root: Link,
}

impl<T, U> Tree<T, U> {
    pub fn new(chunk_size: usize) -> Self {
        Tree {
            arena: TypedArena::new(chunk_size),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    #[inline]
    pub fn node(&self, handle: Handle) -> &Node<T, U> {
        &self.arena[handle]
    }

    #[inline]
    pub fn node_mut(&mut self, handle: Handle) -> &mut Node<T, U> {
        &mut self.arena[handle]
    }

    /// Returns the color of a slot; the sentinel is black.
    #[inline]
    pub fn color(&self, link: Link) -> Color {
        link.map_or(Color::Black, |handle| self.node(handle).color)
    }

    #[inline]
    fn is_red(&self, link: Link) -> bool {
        self.color(link) == Color::Red
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).color = color;
    }

    /// Returns which child slot of its parent `handle` occupies.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is the root.
    pub fn side_of(&self, handle: Handle) -> Side {
        let parent = self
            .node(handle)
            .parent
            .expect("Error: querying the side of a node without a parent.");
        if self.node(parent).left == Some(handle) {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn extreme_of(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.node(handle).child(side) {
            handle = child;
        }
        handle
    }

    pub fn min_of(&self, handle: Handle) -> Handle {
        self.extreme_of(handle, Side::Left)
    }

    pub fn max_of(&self, handle: Handle) -> Handle {
        self.extreme_of(handle, Side::Right)
    }

    pub fn first(&self) -> Link {
        self.root.map(|root| self.min_of(root))
    }

    pub fn last(&self) -> Link {
        self.root.map(|root| self.max_of(root))
    }

    // Walks towards `side` in key order: `Right` gives the successor, `Left` the predecessor.
    fn step(&self, handle: Handle, side: Side) -> Link {
        if let Some(child) = self.node(handle).child(side) {
            return Some(self.extreme_of(child, side.opposite()));
        }
        let mut curr = handle;
        while let Some(parent) = self.node(curr).parent {
            if self.node(parent).child(side) != Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    pub fn successor(&self, handle: Handle) -> Link {
        self.step(handle, Side::Right)
    }

    pub fn predecessor(&self, handle: Handle) -> Link {
        self.step(handle, Side::Left)
    }

    /// Returns the number of nodes on the longest downward path from `link`.
    pub fn height(&self, link: Link) -> usize {
        self.leaf_depths(link).1
    }

    // Returns the depths of the shallowest and deepest leaves below `link`, counting from one.
    fn leaf_depths(&self, link: Link) -> (usize, usize) {
        let (mut min_depth, mut max_depth) = (usize::max_value(), 0);
        let mut stack = Vec::new();
        stack.extend(link.map(|handle| (handle, 1)));
        while let Some((handle, depth)) = stack.pop() {
            let node = self.node(handle);
            if node.is_leaf() {
                min_depth = min_depth.min(depth);
                max_depth = max_depth.max(depth);
            }
            for child in [node.left, node.right].iter().flatten() {
                stack.push((*child, depth + 1));
            }
        }
        if max_depth == 0 {
            (0, 0)
        } else {
            (min_depth, max_depth)
        }
    }

    // Points the slot that held `old` (a child of `parent`, or the root) at `new`.
    fn replace_child(&mut self, parent: Link, old: Handle, new: Link) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = if self.node(parent).left == Some(old) {
                    Side::Left
                } else {
                    Side::Right
                };
                self.node_mut(parent).set_child(side, new);
            },
        }
    }

    //            (p)                      (p)
    //             |                        |
    //           pivot                    riser
    //           /   \          ->        /   \
    //          a   riser              pivot   c
    //              /   \              /   \
    //           inner   c            a   inner
    //
    // Rotates `pivot` down towards `side`; the drawing shows `side == Left`.
    fn rotate(&mut self, pivot: Handle, side: Side) {
        let riser = self
            .node(pivot)
            .child(side.opposite())
            .expect("Error: rotating towards an empty child.");
        trace!("rotate {:?} at {:?}", side, pivot);

        let inner = self.node(riser).child(side);
        self.node_mut(pivot).set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(pivot);
        }

        let parent = self.node(pivot).parent;
        self.node_mut(riser).parent = parent;
        self.replace_child(parent, pivot, Some(riser));

        self.node_mut(riser).set_child(side, Some(pivot));
        self.node_mut(pivot).parent = Some(riser);
    }

    fn swap_entries(&mut self, a: Handle, b: Handle) {
        let (x, y) = self.arena.get_pair_mut(a, b);
        mem::swap(&mut x.entry, &mut y.entry);
    }

    /// Attaches a new red node for `entry` and rebalances. Keys that compare equal to an existing
    /// key descend right, so the new node follows every equal key in order.
    pub fn insert<C>(&mut self, entry: Entry<T, U>, comparator: &C) -> Handle
    where
        C: Compare<T>,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = self.node(handle);
            side = if comparator.compares_lt(&entry.key, &node.entry.key) {
                Side::Left
            } else {
                Side::Right
            };
            parent = Some(handle);
            curr = node.child(side);
        }

        let handle = self.arena.allocate(Node::new(entry, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) => self.node_mut(parent).set_child(side, Some(handle)),
        }
        self.insert_fixup(handle);
        handle
    }

    fn insert_fixup(&mut self, mut node: Handle) {
        loop {
            let parent = match self.node(node).parent {
                Some(parent) if self.is_red(Some(parent)) => parent,
                _ => break,
            };
            let grandparent = match self.node(parent).parent {
                Some(grandparent) => grandparent,
                None => {
                    self.set_color(parent, Color::Black);
                    break;
                },
            };

            let parent_side = self.side_of(parent);
            let uncle = self.node(grandparent).child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|uncle| self.is_red(Some(*uncle))) {
                trace!("insert fixup: red uncle at {:?}", uncle);
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.side_of(node) != parent_side {
                trace!("insert fixup: inside child at {:?}", node);
                self.rotate(parent, parent_side);
                node = parent;
                continue;
            }

            trace!("insert fixup: outside child at {:?}", node);
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, parent_side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Removes the entry stored at `target` and returns it.
    ///
    /// Entries are swapped down the tree until the doomed entry sits in a leaf, so other entries
    /// can change nodes. Every link in `tracked` names a node holding some other entry and is
    /// rewritten to name the node holding that same entry after the removal.
    ///
    /// A node with two children swaps with its predecessor when the left subtree is strictly
    /// taller and with its successor otherwise. Measuring both subtrees walks them, so removing
    /// such a node costs time linear in the size of its subtree.
    pub fn remove(&mut self, target: Handle, tracked: &mut [Link]) -> Entry<T, U> {
        let mut node = target;
        loop {
            let (left, right) = (self.node(node).left, self.node(node).right);
            let replacement = match (left, right) {
                (Some(left), Some(right)) => {
                    if self.height(Some(left)) > self.height(Some(right)) {
                        self.max_of(left)
                    } else {
                        self.min_of(right)
                    }
                },
                (Some(child), None) | (None, Some(child)) => child,
                (None, None) => break,
            };
            self.swap_entries(node, replacement);
            for link in tracked.iter_mut() {
                if *link == Some(replacement) {
                    *link = Some(node);
                }
            }
            node = replacement;
        }

        let parent = self.node(node).parent;
        let side = parent.map(|_| self.side_of(node));
        self.replace_child(parent, node, None);
        let removed = self.arena.free(node);

        if let (Color::Black, Some(parent), Some(side)) = (removed.color, parent, side) {
            self.remove_fixup(parent, side);
        }
        removed.entry
    }

    // The `side` slot of `parent` is one black short of its sibling subtree.
    fn remove_fixup(&mut self, mut parent: Handle, mut side: Side) {
        loop {
            let mut sibling = self
                .node(parent)
                .child(side.opposite())
                .expect("Error: expected a sibling for a black deficient slot.");

            if self.is_red(Some(sibling)) {
                trace!("remove fixup: red sibling at {:?}", sibling);
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self
                    .node(parent)
                    .child(side.opposite())
                    .expect("Error: expected a sibling after rotation.");
            }

            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                if self.is_red(Some(parent)) {
                    self.set_color(parent, Color::Black);
                    return;
                }
                trace!("remove fixup: pushing deficiency above {:?}", parent);
                match self.node(parent).parent {
                    None => return,
                    Some(grandparent) => {
                        side = self.side_of(parent);
                        parent = grandparent;
                        continue;
                    },
                }
            }

            if !self.is_red(far) {
                trace!("remove fixup: red near nephew of {:?}", sibling);
                let near = near.expect("Error: expected a red near nephew.");
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = near;
            }

            trace!("remove fixup: red far nephew of {:?}", sibling);
            let far = self
                .node(sibling)
                .child(side.opposite())
                .expect("Error: expected a red far nephew.");
            let parent_color = self.node(parent).color;
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            self.set_color(far, Color::Black);
            self.rotate(parent, side);
            return;
        }
    }

    /// Returns the first node in order whose key does not compare less than `key`.
    pub fn lower_bound<C>(&self, key: &T, comparator: &C) -> Link
    where
        C: Compare<T>,
    {
        self.bound(|node_key| comparator.compare(node_key, key) != Ordering::Less)
    }

    /// Returns the first node in order whose key compares greater than `key`.
    pub fn upper_bound<C>(&self, key: &T, comparator: &C) -> Link
    where
        C: Compare<T>,
    {
        self.bound(|node_key| comparator.compare(node_key, key) == Ordering::Greater)
    }

    /// Returns the first node in order whose key compares equal to `key`.
    pub fn find<C>(&self, key: &T, comparator: &C) -> Link
    where
        C: Compare<T>,
    {
        self.lower_bound(key, comparator)
            .filter(|handle| comparator.compares_eq(&self.node(*handle).entry.key, key))
    }

    // Keys are non-decreasing in order, so `accepts` is false on a prefix and true on the rest.
    fn bound<F>(&self, accepts: F) -> Link
    where
        F: Fn(&T) -> bool,
    {
        let mut curr = self.root;
        let mut candidate = None;
        while let Some(handle) = curr {
            let node = self.node(handle);
            if accepts(&node.entry.key) {
                candidate = Some(handle);
                curr = node.left;
            } else {
                curr = node.right;
            }
        }
        candidate
    }

    /// Checks every structural invariant and returns statistics on the tree.
    pub fn validate<C>(&self, comparator: &C) -> Result<Stats>
    where
        C: Compare<T>,
    {
        let root = match self.root {
            None => {
                if self.len() != 0 {
                    return Err(Error::LengthMismatch {
                        expected: self.len(),
                        actual: 0,
                    });
                }
                return Ok(Stats::new(0, mem::size_of::<Node<T, U>>()));
            },
            Some(root) => root,
        };

        if self.is_red(Some(root)) {
            return Err(Error::RedRoot);
        }
        if self.node(root).parent.is_some() {
            return Err(Error::BrokenParentLink);
        }

        let black_height = self.validate_subtree(root, false)?;

        let mut count = 0;
        let mut prev: Option<Handle> = None;
        let mut curr = self.first();
        while let Some(handle) = curr {
            if let Some(prev) = prev {
                let (prev_key, key) = (&self.node(prev).entry.key, &self.node(handle).entry.key);
                if comparator.compares_lt(key, prev_key) {
                    return Err(Error::SortOrder);
                }
            }
            count += 1;
            prev = Some(handle);
            curr = self.successor(handle);
        }
        if count != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: count,
            });
        }

        let (min_leaf_depth, max_leaf_depth) = self.leaf_depths(self.root);
        let mut stats = Stats::new(count, mem::size_of::<Node<T, U>>());
        stats.height = max_leaf_depth;
        stats.black_height = black_height;
        stats.min_leaf_depth = min_leaf_depth;
        stats.max_leaf_depth = max_leaf_depth;
        Ok(stats)
    }

    // Returns the black height below `handle`, counting `handle` itself.
    fn validate_subtree(&self, handle: Handle, from_red: bool) -> Result<usize> {
        let node = self.node(handle);
        let red = node.color == Color::Red;
        if from_red && red {
            return Err(Error::ConsecutiveReds);
        }

        let mut blacks = [0, 0];
        for (index, child) in [node.left, node.right].iter().enumerate() {
            if let Some(child) = child {
                if self.node(*child).parent != Some(handle) {
                    return Err(Error::BrokenParentLink);
                }
                blacks[index] = self.validate_subtree(*child, red)?;
            }
        }
        if blacks[0] != blacks[1] {
            return Err(Error::UnbalancedBlacks {
                left: blacks[0],
                right: blacks[1],
            });
        }
        Ok(blacks[0] + if red { 0 } else { 1 })
    }
}

/// Statistics on a red black tree, returned by validation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    entries: usize,
    node_size: usize,
    height: usize,
    black_height: usize,
    min_leaf_depth: usize,
    max_leaf_depth: usize,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            ..Default::default()
        }
    }

    /// Returns the number of entries in the tree.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Returns the size of a single node in bytes, including the key, value, color and links.
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of black nodes on every path from the root to a leaf.
    pub fn black_height(&self) -> usize {
        self.black_height
    }

    /// Returns the depth of the shallowest leaf, counting the root as one.
    pub fn min_leaf_depth(&self) -> usize {
        self.min_leaf_depth
    }

    /// Returns the depth of the deepest leaf, counting the root as one.
    pub fn max_leaf_depth(&self) -> usize {
        self.max_leaf_depth
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::entry::Entry;
    use crate::red_black_tree::node::{Color, Side};
    use compare::Natural;

    fn natural() -> Natural<u32> {
        compare::natural()
    }

    fn tree_of(keys: &[u32]) -> Tree<u32, ()> {
        let mut tree = Tree::new(4);
        for key in keys {
            tree.insert(Entry::new(*key, ()), &natural());
        }
        tree
    }

    fn keys(tree: &Tree<u32, ()>) -> Vec<u32> {
        let mut ret = Vec::new();
        let mut curr = tree.first();
        while let Some(handle) = curr {
            ret.push(tree.node(handle).entry.key);
            curr = tree.successor(handle);
        }
        ret
    }

    #[test]
    fn test_insert_recolors_root() {
        let tree = tree_of(&[1]);
        let root = tree.root.unwrap();
        assert_eq!(tree.node(root).color, Color::Black);
        assert!(tree.node(root).parent.is_none());
    }

    #[test]
    fn test_insert_outside_rotation() {
        let tree = tree_of(&[1, 2, 3]);
        let root = tree.root.unwrap();
        assert_eq!(tree.node(root).entry.key, 2);
        assert_eq!(tree.color(tree.node(root).left), Color::Red);
        assert_eq!(tree.color(tree.node(root).right), Color::Red);
        assert!(tree.validate(&natural()).is_ok());
    }

    #[test]
    fn test_insert_inside_rotation() {
        let tree = tree_of(&[3, 1, 2]);
        let root = tree.root.unwrap();
        assert_eq!(tree.node(root).entry.key, 2);
        assert!(tree.validate(&natural()).is_ok());
    }

    #[test]
    fn test_insert_red_uncle() {
        let tree = tree_of(&[2, 1, 3, 4]);
        let root = tree.root.unwrap();
        assert_eq!(tree.color(tree.node(root).left), Color::Black);
        assert_eq!(tree.color(tree.node(root).right), Color::Black);
        assert_eq!(tree.validate(&natural()).unwrap().black_height(), 2);
    }

    #[test]
    fn test_successor_predecessor() {
        let tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(keys(&tree), vec![1, 3, 4, 5, 7, 8, 9]);

        let mut ret = Vec::new();
        let mut curr = tree.last();
        while let Some(handle) = curr {
            ret.push(tree.node(handle).entry.key);
            curr = tree.predecessor(handle);
        }
        assert_eq!(ret, vec![9, 8, 7, 5, 4, 3, 1]);
    }

    #[test]
    fn test_remove_leaf_and_internal() {
        let mut tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let target = tree.find(&3, &natural()).unwrap();
        let mut tracked = [tree.successor(target), tree.find(&1, &natural())];
        let entry = tree.remove(target, &mut tracked);
        assert_eq!(entry.key, 3);
        assert_eq!(tree.node(tracked[0].unwrap()).entry.key, 4);
        assert_eq!(tree.node(tracked[1].unwrap()).entry.key, 1);
        assert_eq!(keys(&tree), vec![1, 4, 5, 7, 8, 9]);
        tree.validate(&natural()).unwrap();

        let target = tree.find(&9, &natural()).unwrap();
        let mut tracked = [tree.successor(target)];
        assert_eq!(tree.remove(target, &mut tracked).key, 9);
        assert!(tracked[0].is_none());
        assert_eq!(keys(&tree), vec![1, 4, 5, 7, 8]);
        tree.validate(&natural()).unwrap();
    }

    #[test]
    fn test_remove_swaps_with_taller_side() {
        let mut tree = tree_of(&[5, 3, 8, 1, 4, 7, 9, 0]);
        let target = tree.find(&5, &natural()).unwrap();
        assert!(tree.height(tree.node(target).left) > tree.height(tree.node(target).right));
        assert_eq!(tree.remove(target, &mut []).key, 5);
        assert_eq!(tree.node(target).entry.key, 4);
        assert_eq!(keys(&tree), vec![0, 1, 3, 4, 7, 8, 9]);
        tree.validate(&natural()).unwrap();

        let mut tree = tree_of(&[2, 1, 3]);
        let target = tree.find(&2, &natural()).unwrap();
        assert_eq!(tree.remove(target, &mut []).key, 2);
        assert_eq!(tree.node(target).entry.key, 3);
        tree.validate(&natural()).unwrap();
    }

    #[test]
    fn test_remove_all_in_order() {
        let mut tree = tree_of(&(0..64).collect::<Vec<u32>>());
        for key in 0..64 {
            let target = tree.find(&key, &natural()).unwrap();
            tree.remove(target, &mut []);
            tree.validate(&natural()).unwrap();
        }
        assert!(tree.root.is_none());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_bounds() {
        let tree = tree_of(&[1, 3, 3, 5]);
        let key_of = |link: Option<_>| link.map(|handle| tree.node(handle).entry.key);
        assert_eq!(key_of(tree.lower_bound(&3, &natural())), Some(3));
        assert_eq!(key_of(tree.upper_bound(&3, &natural())), Some(5));
        assert_eq!(key_of(tree.lower_bound(&6, &natural())), None);
        assert_eq!(key_of(tree.upper_bound(&0, &natural())), Some(1));
        assert_eq!(tree.find(&2, &natural()), None);
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let mut tree = Tree::new(4);
        for value in 0..8 {
            tree.insert(Entry::new(1, value), &natural());
        }
        let found = tree.find(&1, &natural()).unwrap();
        assert_eq!(tree.node(found).entry.value, 0);
        assert_eq!(tree.predecessor(found), None);
    }

    #[test]
    #[should_panic]
    fn test_side_of_root() {
        let tree = tree_of(&[1]);
        tree.side_of(tree.root.unwrap());
    }

    #[test]
    fn test_side_of_children() {
        let tree = tree_of(&[2, 1, 3]);
        let root = tree.root.unwrap();
        assert_eq!(tree.side_of(tree.node(root).left.unwrap()), Side::Left);
        assert_eq!(tree.side_of(tree.node(root).right.unwrap()), Side::Right);
    }

    #[test]
    fn test_height() {
        let tree = tree_of(&(0..7).collect::<Vec<u32>>());
        assert_eq!(tree.height(tree.root), 4);
        assert_eq!(tree.height(None), 0);

        let stats = tree.validate(&natural()).unwrap();
        assert_eq!(stats.min_leaf_depth(), 2);
        assert_eq!(stats.max_leaf_depth(), 4);
        assert_eq!(stats.entries(), 7);
    }
}
