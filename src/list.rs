//! Persistent singly linked list
//!
//! Prepending allocates one node that points at the existing head; nothing
//! reachable from an older head is ever touched again, so any clone of a list
//! is a stable snapshot. Values accumulate newest-first and are materialized
//! in insertion order with [`ImmutableList::to_vec_ordered`].

use std::sync::Arc;

struct Node<T> {
    value: T,
    next: Option<Arc<Node<T>>>,
}

/// Immutable, structurally shared list with O(1) prepend
pub struct ImmutableList<T> {
    head: Option<Arc<Node<T>>>,
    len: usize,
}

impl<T> ImmutableList<T> {
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Returns a new list with `value` in front of this one.
    #[must_use]
    pub fn prepend(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Node {
                value,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Most recently prepended value
    pub fn head(&self) -> Option<&T> {
        self.head.as_deref().map(|node| &node.value)
    }

    /// Iterates newest-first
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            cursor: self.head.as_deref(),
            remaining: self.len,
        }
    }

    /// Whether both lists share the same head node
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Clone> ImmutableList<T> {
    /// Copies the values out oldest-first.
    pub fn to_vec_ordered(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(self.iter().cloned());
        out.reverse();
        out
    }
}

impl<T> Clone for ImmutableList<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for ImmutableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ImmutableList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// Long chains would otherwise drop recursively, one stack frame per node.
impl<T> Drop for ImmutableList<T> {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// Newest-first iterator over an [`ImmutableList`]
pub struct Iter<'a, T> {
    cursor: Option<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor?;
        self.cursor = node.next.as_deref();
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a ImmutableList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
