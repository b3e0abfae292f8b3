//! Chunked slot allocator used as node storage by the trees in this crate.

use std::mem;
use std::ops::{Index, IndexMut};

/// A handle to an object allocated in a `TypedArena<T>`.
///
/// Handles stay valid until the object is freed. Afterwards the slot may be handed out again, so a
/// stale handle can silently name a different object.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk_index: usize,
    block_index: usize,
}

#[derive(Clone)]
enum Block<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// A typed allocator that stores objects in fixed size chunks and recycles freed slots through an
/// intrusive free list.
///
/// Chunks are never reallocated once created, so growing the arena does not move existing objects.
/// Dropping or clearing the arena releases every object at once without walking any structure the
/// objects form among themselves.
///
/// # Examples
///
/// ```
/// use rb_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(16);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
#[derive(Clone)]
pub struct TypedArena<T> {
    head: Option<Handle>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    len: usize,
}

impl<T> TypedArena<T> {
    fn block(&self, handle: Handle) -> Option<&Block<T>> {
        self.chunks
            .get(handle.chunk_index)
            .and_then(|chunk| chunk.get(handle.block_index))
    }

    /// Constructs a new, empty `TypedArena<T>` that allocates `chunk_size` slots at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert_eq!(arena.chunk_size(), 1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Error: chunk size must be positive.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
        }
    }

    /// Returns the number of slots allocated per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocates an object and returns a handle to it. Vacant slots are reused before a new chunk
    /// is created.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(4);
    /// let x = arena.allocate("x");
    /// assert_eq!(arena.get(x), Some(&"x"));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        match self.head.take() {
            Some(handle) => {
                let vacant = mem::replace(
                    &mut self.chunks[handle.chunk_index][handle.block_index],
                    Block::Occupied(value),
                );
                match vacant {
                    Block::Vacant(next) => self.head = next,
                    Block::Occupied(_) => panic!("Error: free list points at an occupied block."),
                }
                self.len += 1;
                handle
            },
            None => {
                let needs_chunk = self
                    .chunks
                    .last()
                    .map_or(true, |chunk| chunk.len() == self.chunk_size);
                if needs_chunk {
                    self.chunks.push(Vec::with_capacity(self.chunk_size));
                }
                let chunk_index = self.chunks.len() - 1;
                let last_chunk = &mut self.chunks[chunk_index];
                last_chunk.push(Block::Occupied(value));
                self.len += 1;
                Handle {
                    chunk_index,
                    block_index: last_chunk.len() - 1,
                }
            },
        }
    }

    /// Deallocates an object and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not name a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(4);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// assert_eq!(arena.get(x), None);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        if self.block(handle).is_none() {
            panic!("Error: attempting to free invalid block.");
        }
        let old_block = mem::replace(
            &mut self.chunks[handle.chunk_index][handle.block_index],
            Block::Vacant(self.head),
        );
        match old_block {
            Block::Vacant(next) => {
                self.chunks[handle.chunk_index][handle.block_index] = Block::Vacant(next);
                panic!("Error: attempting to free vacant block.");
            },
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(handle);
                value
            },
        }
    }

    /// Returns `true` if `handle` names a live object.
    pub fn contains(&self, handle: Handle) -> bool {
        match self.block(handle) {
            Some(Block::Occupied(_)) => true,
            _ => false,
        }
    }

    /// Returns an immutable reference to an object, or `None` if the handle does not name a live
    /// object.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.block(handle) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object, or `None` if the handle does not name a live
    /// object.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self
            .chunks
            .get_mut(handle.chunk_index)
            .and_then(|chunk| chunk.get_mut(handle.block_index))
        {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns mutable references to two distinct live objects.
    ///
    /// # Panics
    ///
    /// Panics if the handles are equal or either does not name a live object.
    pub fn get_pair_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        assert!(a != b, "Error: expected two distinct handles.");
        let a_is_first = (a.chunk_index, a.block_index) < (b.chunk_index, b.block_index);
        let (first, second, swapped) = if a_is_first {
            (a, b, false)
        } else {
            (b, a, true)
        };

        let (first_block, second_block) = if first.chunk_index == second.chunk_index {
            let chunk = &mut self.chunks[first.chunk_index];
            let (head, tail) = chunk.split_at_mut(second.block_index);
            (&mut head[first.block_index], &mut tail[0])
        } else {
            let (head, tail) = self.chunks.split_at_mut(second.chunk_index);
            (
                &mut head[first.chunk_index][first.block_index],
                &mut tail[0][second.block_index],
            )
        };

        match (first_block, second_block) {
            (Block::Occupied(x), Block::Occupied(y)) => {
                if swapped {
                    (y, x)
                } else {
                    (x, y)
                }
            },
            _ => panic!("Error: entry out of bounds."),
        }
    }

    /// Drops every object and releases all chunks.
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.len = 0;
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: entry out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: entry out of bounds.")
    }
}
