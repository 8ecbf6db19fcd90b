//! SharedIndex - a B+ tree behind a reader/writer lock.

use std::borrow::Borrow;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::{Result, TreeConfig};
use crate::index::btree::{BPlusTree, StatsSnapshot};

/// A [`BPlusTree`] shared between threads.
///
/// # Thread Safety
/// - `tree`: `RwLock`, many readers, one writer
///
/// Each method takes the lock once, so every call is atomic with respect
/// to other callers. Use [`read`](Self::read) / [`write`](Self::write) to
/// group several operations under one lock.
///
/// # Usage
/// ```
/// use linkleaf::SharedIndex;
/// use std::sync::Arc;
/// use std::thread;
///
/// let index = Arc::new(SharedIndex::with_order(2).unwrap());
///
/// let writer = {
///     let index = Arc::clone(&index);
///     thread::spawn(move || {
///         for k in 0..100u32 {
///             index.insert(k, k * 10).unwrap();
///         }
///     })
/// };
/// writer.join().unwrap();
///
/// assert_eq!(index.get(&42).unwrap(), Some(420));
/// ```
pub struct SharedIndex<K, V> {
    tree: RwLock<BPlusTree<K, V>>,
}

impl<K, V> SharedIndex<K, V> {
    /// Wrap an existing tree.
    pub fn new(tree: BPlusTree<K, V>) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }

    /// Create an empty shared tree of the given order.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order` is 0.
    pub fn with_order(order: usize) -> Result<Self> {
        Ok(Self::new(BPlusTree::with_config(TreeConfig::new(order)?)))
    }

    /// Acquire shared access to the tree.
    pub fn read(&self) -> RwLockReadGuard<'_, BPlusTree<K, V>> {
        self.tree.read()
    }

    /// Acquire exclusive access to the tree.
    pub fn write(&self) -> RwLockWriteGuard<'_, BPlusTree<K, V>> {
        self.tree.write()
    }

    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    /// Snapshot of the tree's structural counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.tree.read().stats().snapshot()
    }

    /// Unwrap the tree.
    pub fn into_inner(self) -> BPlusTree<K, V> {
        self.tree.into_inner()
    }
}

impl<K: Ord + Clone, V> SharedIndex<K, V> {
    /// Insert under the write lock. See [`BPlusTree::insert`].
    pub fn insert(&self, key: K, value: V) -> Result<Option<V>> {
        self.tree.write().insert(key, value)
    }

    /// Delete under the write lock. See [`BPlusTree::delete`].
    pub fn delete<Q>(&self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.write().delete(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.read().contains_key(key)
    }
}

impl<K: Ord + Clone, V: Clone> SharedIndex<K, V> {
    /// Look up `key` under the read lock and clone the value out.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Ok(self.tree.read().search(key)?.cloned())
    }
}

impl<K, V> Default for SharedIndex<K, V> {
    fn default() -> Self {
        Self::new(BPlusTree::default())
    }
}
