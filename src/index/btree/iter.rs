//! Ordered traversal over the leaf chain.

use std::iter::FusedIterator;

use crate::common::NodeId;
use crate::index::btree::arena::NodeArena;
use crate::index::btree::tree::BPlusTree;

/// Iterator over `(&K, &V)` in ascending key order.
///
/// Walks `next` handles from the leftmost leaf, and `prev` handles from the
/// rightmost leaf when iterated from the back. The two ends never cross:
/// the iterator stops once it has yielded `len` entries.
///
/// Created by [`BPlusTree::iter`].
pub struct Iter<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    /// Leaf and position of the next entry from the front.
    front: Option<(NodeId, usize)>,
    /// Leaf and one-past position of the next entry from the back.
    back: Option<(NodeId, usize)>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            let arena = self.arena;
            let (id, pos) = self.front?;
            let leaf = arena.leaf(id).ok()?;
            if pos < leaf.len() {
                self.front = Some((id, pos + 1));
                self.remaining -= 1;
                return Some((&leaf.keys[pos], &leaf.values[pos]));
            }
            self.front = leaf.next.map(|next| (next, 0));
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            let arena = self.arena;
            let (id, end) = self.back?;
            let leaf = arena.leaf(id).ok()?;
            if end > 0 {
                self.back = Some((id, end - 1));
                self.remaining -= 1;
                return Some((&leaf.keys[end - 1], &leaf.values[end - 1]));
            }
            self.back = match leaf.prev {
                Some(prev) => Some((prev, arena.leaf(prev).ok()?.len())),
                None => None,
            };
        }
        None
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> BPlusTree<K, V> {
    /// Iterate over all entries in ascending key order.
    ///
    /// A tree whose root path is corrupted iterates as empty;
    /// [`check_invariants`](BPlusTree::check_invariants) reports the fault.
    ///
    /// # Example
    /// ```
    /// use linkleaf::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(2).unwrap();
    /// for k in [20, 10, 30] {
    ///     tree.insert(k, k * 2).unwrap();
    /// }
    ///
    /// let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![10, 20, 30]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        let arena = self.arena();
        let front = self.first_leaf().ok().flatten().map(|id| (id, 0));
        let back = self
            .last_leaf()
            .ok()
            .flatten()
            .and_then(|id| Some((id, arena.leaf(id).ok()?.len())));
        let remaining = if front.is_some() && back.is_some() {
            self.len()
        } else {
            0
        };

        Iter {
            arena,
            front,
            back,
            remaining,
        }
    }

    /// Smallest entry.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Largest entry.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.iter().next_back()
    }
}

impl<'a, K, V> IntoIterator for &'a BPlusTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
