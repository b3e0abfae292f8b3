use crate::arena::Handle;
use crate::entry::Entry;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// Which child slot of a node a link occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A child or parent slot. `None` stands in for the sentinel leaf, which is always black.
pub type Link = Option<Handle>;

/// A struct representing an internal node of a red black tree. The node is owned by the arena of
/// its tree; `parent` is a back reference and never owns anything.
#[derive(Clone)]
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub color: Color,
    pub parent: Link,
    pub left: Link,
    pub right: Link,
}

impl<T, U> Node<T, U> {
    pub fn new(entry: Entry<T, U>, parent: Link) -> Self {
        Node {
            entry,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set_child(&mut self, side: Side, link: Link) {
        match side {
            Side::Left => self.left = link,
            Side::Right => self.right = link,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
