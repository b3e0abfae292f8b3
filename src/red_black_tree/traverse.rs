use crate::red_black_tree::node::Side;
use crate::red_black_tree::tree::Tree;
use std::collections::VecDeque;

/// Folds `f` over every entry in key order, smallest first when `first` is `Left` and largest
/// first when it is `Right`. Uses an explicit stack, so the depth of the tree never touches the
/// call stack. Stops at the first error.
pub fn depth_first<T, U, A, E, F>(tree: &Tree<T, U>, first: Side, init: A, mut f: F) -> Result<A, E>
where
    F: FnMut(A, &T, &U) -> Result<A, E>,
{
    let mut acc = init;
    let mut stack = Vec::new();
    let mut curr = tree.root;
    loop {
        while let Some(handle) = curr {
            stack.push(handle);
            curr = tree.node(handle).child(first);
        }
        match stack.pop() {
            None => return Ok(acc),
            Some(handle) => {
                let node = tree.node(handle);
                acc = f(acc, &node.entry.key, &node.entry.value)?;
                curr = node.child(first.opposite());
            },
        }
    }
}

/// Folds `f` over every entry level by level, left to right within a level.
pub fn breadth_first<T, U, A, E, F>(tree: &Tree<T, U>, init: A, mut f: F) -> Result<A, E>
where
    F: FnMut(A, &T, &U) -> Result<A, E>,
{
    let mut acc = init;
    let mut queue = VecDeque::new();
    queue.extend(tree.root);
    while let Some(handle) = queue.pop_front() {
        let node = tree.node(handle);
        acc = f(acc, &node.entry.key, &node.entry.value)?;
        queue.extend(node.left);
        queue.extend(node.right);
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::{breadth_first, depth_first};
    use crate::entry::Entry;
    use crate::red_black_tree::node::Side;
    use crate::red_black_tree::tree::Tree;

    fn tree_of(keys: &[u32]) -> Tree<u32, u32> {
        let mut tree = Tree::new(8);
        for key in keys {
            tree.insert(Entry::new(*key, key * 10), &compare::natural::<u32>());
        }
        tree
    }

    fn push_key(mut keys: Vec<u32>, key: &u32, _: &u32) -> Result<Vec<u32>, ()> {
        keys.push(*key);
        Ok(keys)
    }

    #[test]
    fn test_depth_first() {
        let tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(
            depth_first(&tree, Side::Left, Vec::new(), push_key),
            Ok(vec![1, 2, 3, 4, 5, 6, 7]),
        );
        assert_eq!(
            depth_first(&tree, Side::Right, Vec::new(), push_key),
            Ok(vec![7, 6, 5, 4, 3, 2, 1]),
        );
    }

    #[test]
    fn test_breadth_first() {
        let tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(
            breadth_first(&tree, Vec::new(), push_key),
            Ok(vec![4, 2, 6, 1, 3, 5, 7]),
        );
    }

    #[test]
    fn test_empty() {
        let tree = tree_of(&[]);
        assert_eq!(depth_first(&tree, Side::Left, Vec::new(), push_key), Ok(vec![]));
        assert_eq!(breadth_first(&tree, Vec::new(), push_key), Ok(vec![]));
    }

    #[test]
    fn test_stops_at_error() {
        let tree = tree_of(&[1, 2, 3, 4]);
        let mut seen = Vec::new();
        let ret = depth_first(&tree, Side::Left, 0, |acc, key: &u32, value: &u32| {
            if *key == 3 {
                return Err(acc);
            }
            seen.push(*key);
            Ok(acc + value)
        });
        assert_eq!(ret, Err(30));
        assert_eq!(seen, vec![1, 2]);
    }
}
