//! The B+ tree driver: search, insert, delete.
//!
//! Every operation enters at the root and recurses down to a leaf.
//! Structural fixes are applied on the way back up: a split is returned to
//! the parent as `(separator, right node)`, and an underflowed child is
//! rebalanced by its parent against a sibling.

use std::borrow::Borrow;
use std::mem;

use tracing::{debug, trace};

use crate::common::{Error, NodeId, Result, TreeConfig};
use crate::index::btree::arena::NodeArena;
use crate::index::btree::bisect::{find_key_location, find_key_range, locate_separator};
use crate::index::btree::node::{IndexNode, LeafNode, Node};
use crate::index::btree::rebalance::{
    resolve_index_underflow, resolve_leaf_underflow, Rebalance, Side,
};
use crate::index::btree::split::{split_index, split_leaf};
use crate::index::btree::stats::TreeStats;

/// An in-memory B+ tree mapping unique ordered keys to values.
///
/// # Structure
/// ```text
///                      ┌─────────┐
///                      │  [ 30 ] │              IndexNode
///                      └──┬───┬──┘
///               ┌─────────┘   └─────────┐
///          ┌────┴────┐             ┌────┴────┐
///          │[ 10 20 ]│             │[ 40 50 ]│  IndexNode
///          └─┬──┬──┬─┘             └─┬──┬──┬─┘
///            ▼  ▼  ▼                 ▼  ▼  ▼
///          [1 5]⇄[10 15]⇄[20 25]⇄[30 35]⇄[40 45]⇄[50 55]   LeafNode chain
/// ```
///
/// Every non-root node holds between `order` and `2 * order` keys. Nodes
/// live in a slot arena and refer to each other by [`NodeId`]; the leaf
/// chain links are handles, not owners.
///
/// # Usage
/// ```
/// use linkleaf::BPlusTree;
///
/// let mut tree = BPlusTree::new(2).unwrap();
/// for i in 1..=10 {
///     tree.insert(i, format!("v{}", i)).unwrap();
/// }
///
/// assert_eq!(tree.search(&4).unwrap(), Some(&"v4".to_string()));
/// assert_eq!(tree.delete(&4).unwrap(), Some("v4".to_string()));
/// assert_eq!(tree.search(&4).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct BPlusTree<K, V> {
    /// Fanout configuration (immutable after construction).
    config: TreeConfig,

    /// Owns every node.
    arena: NodeArena<K, V>,

    /// Root node, or `None` when the tree holds no entries.
    root: Option<NodeId>,

    /// Number of entries.
    len: usize,

    /// Structural change counters.
    stats: TreeStats,
}

/// What a recursive insert reports to its caller.
struct InsertOutcome<K, V> {
    /// Previous value when the key already existed.
    replaced: Option<V>,
    /// Separator and new right sibling when the node split.
    split: Option<(K, NodeId)>,
}

impl<K, V> InsertOutcome<K, V> {
    fn unchanged(replaced: Option<V>) -> Self {
        Self {
            replaced,
            split: None,
        }
    }
}

impl<K, V> BPlusTree<K, V> {
    /// Create an empty tree of the given order.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order` is 0.
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::with_config(TreeConfig::new(order)?))
    }

    /// Create an empty tree from a validated config.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            arena: NodeArena::new(),
            root: None,
            len: 0,
            stats: TreeStats::new(),
        }
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    #[inline]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.config.order()
    }

    /// Number of entries in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Structural change counters.
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Number of levels: 0 when empty, 1 for a lone leaf root.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(id) = current {
            height += 1;
            current = match self.arena.get(id) {
                Ok(Node::Index(index)) => index.children.first().copied(),
                _ => None,
            };
        }
        height
    }

    /// Remove every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    #[inline]
    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub(crate) fn arena(&self) -> &NodeArena<K, V> {
        &self.arena
    }

    #[cfg(test)]
    pub(crate) fn arena_mut(&mut self) -> &mut NodeArena<K, V> {
        &mut self.arena
    }

    /// Leftmost leaf, head of the leaf chain.
    pub(crate) fn first_leaf(&self) -> Result<Option<NodeId>> {
        self.edge_leaf(|index| index.children.first().copied())
    }

    /// Rightmost leaf, tail of the leaf chain.
    pub(crate) fn last_leaf(&self) -> Result<Option<NodeId>> {
        self.edge_leaf(|index| index.children.last().copied())
    }

    fn edge_leaf(&self, pick: impl Fn(&IndexNode<K>) -> Option<NodeId>) -> Result<Option<NodeId>> {
        let Some(mut current) = self.root else {
            return Ok(None);
        };
        loop {
            match self.arena.get(current)? {
                Node::Leaf(_) => return Ok(Some(current)),
                Node::Index(index) => {
                    index.check_fanout(current)?;
                    current = pick(index).ok_or(Error::CorruptedNode {
                        node: current,
                        keys: index.len(),
                        children: 0,
                    })?;
                }
            }
        }
    }
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    // ========================================================================
    // Public API: Search
    // ========================================================================

    /// Look up the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    /// - `Error::CorruptedNode` if an index node on the path does not have
    ///   exactly one more child than keys
    /// - `Error::DanglingNode` if a child handle names no node
    pub fn search<Q>(&self, key: &Q) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(mut current) = self.root else {
            return Ok(None);
        };
        loop {
            match self.arena.get(current)? {
                Node::Index(index) => {
                    index.check_fanout(current)?;
                    current = index.children[find_key_range(&index.keys, key)];
                }
                Node::Leaf(leaf) => {
                    return Ok(find_key_location(&leaf.keys, key).map(|pos| &leaf.values[pos]));
                }
            }
        }
    }

    /// Whether `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Ok(self.search(key)?.is_some())
    }

    // ========================================================================
    // Public API: Insert
    // ========================================================================

    /// Insert `value` under `key`.
    ///
    /// If the key is already present its value is replaced in place and the
    /// old value returned; the tree shape does not change.
    ///
    /// # Errors
    /// Propagates structural faults found on the descent path.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let Some(root) = self.root else {
            let id = self.arena.alloc(Node::Leaf(LeafNode::new(key, value)));
            self.root = Some(id);
            self.len = 1;
            return Ok(None);
        };

        let InsertOutcome { replaced, split } = self.insert_into(root, key, value)?;

        if let Some((separator, right)) = split {
            let new_root = self
                .arena
                .alloc(Node::Index(IndexNode::new(separator, root, right)));
            self.root = Some(new_root);
            TreeStats::bump(&self.stats.root_splits);
            debug!(root = %new_root, height = self.height(), "root split, tree grew");
        }

        if replaced.is_none() {
            self.len += 1;
        }
        Ok(replaced)
    }

    fn insert_into(&mut self, id: NodeId, key: K, value: V) -> Result<InsertOutcome<K, V>> {
        let order = self.config.order();
        let max_keys = self.config.max_keys();

        let (pos, child) = match self.arena.get_mut(id)? {
            Node::Leaf(leaf) => {
                let pos = match leaf.keys.binary_search(&key) {
                    Ok(pos) => {
                        let old = mem::replace(&mut leaf.values[pos], value);
                        return Ok(InsertOutcome::unchanged(Some(old)));
                    }
                    Err(pos) => pos,
                };
                leaf.insert_at(pos, key, value);
                if leaf.len() <= max_keys {
                    return Ok(InsertOutcome::unchanged(None));
                }
                let (separator, right) = split_leaf(leaf, order);
                let right_id = self.link_split_leaf(id, right)?;
                return Ok(InsertOutcome {
                    replaced: None,
                    split: Some((separator, right_id)),
                });
            }
            Node::Index(index) => {
                index.check_fanout(id)?;
                let pos = find_key_range(&index.keys, &key);
                (pos, index.children[pos])
            }
        };

        let InsertOutcome { replaced, split } = self.insert_into(child, key, value)?;
        let Some((separator, right)) = split else {
            return Ok(InsertOutcome::unchanged(replaced));
        };

        let index = self.arena.index_mut(id)?;
        index.keys.insert(pos, separator);
        index.children.insert(pos + 1, right);
        if index.len() <= max_keys {
            return Ok(InsertOutcome::unchanged(replaced));
        }

        let (separator, right_node) = split_index(index, order);
        let right_id = self.arena.alloc(Node::Index(right_node));
        TreeStats::bump(&self.stats.index_splits);
        trace!(left = %id, right = %right_id, "index node split");

        Ok(InsertOutcome {
            replaced,
            split: Some((separator, right_id)),
        })
    }

    /// Store the right half of a split leaf and splice it into the chain
    /// between `left` and `left`'s old successor.
    fn link_split_leaf(&mut self, left: NodeId, mut right: LeafNode<K, V>) -> Result<NodeId> {
        let old_next = right.next;
        right.prev = Some(left);
        let right_id = self.arena.alloc(Node::Leaf(right));

        self.arena.leaf_mut(left)?.next = Some(right_id);
        if let Some(next) = old_next {
            self.arena.leaf_mut(next)?.prev = Some(right_id);
        }

        TreeStats::bump(&self.stats.leaf_splits);
        trace!(left = %left, right = %right_id, "leaf split");
        Ok(right_id)
    }

    // ========================================================================
    // Public API: Delete
    // ========================================================================

    /// Remove `key` and return its value.
    ///
    /// Deleting an absent key returns `Ok(None)` and leaves the tree
    /// untouched.
    ///
    /// # Errors
    /// Propagates structural faults found on the descent path or while
    /// rebalancing.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(root) = self.root else {
            return Ok(None);
        };

        let removed = self.delete_from(root, key)?;
        if removed.is_none() {
            return Ok(None);
        }
        self.len -= 1;

        // The root has no lower bound; it only changes when it runs dry.
        let replacement = match self.arena.get(root)? {
            Node::Leaf(leaf) if leaf.is_empty() => Some(None),
            Node::Index(index) if index.is_empty() => {
                index.check_fanout(root)?;
                Some(Some(index.children[0]))
            }
            _ => None,
        };
        if let Some(new_root) = replacement {
            self.arena.free(root)?;
            self.root = new_root;
            if let Some(new_root) = new_root {
                TreeStats::bump(&self.stats.root_collapses);
                debug!(root = %new_root, height = self.height(), "root collapsed, tree shrank");
            }
        }

        Ok(removed)
    }

    fn delete_from<Q>(&mut self, id: NodeId, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (pos, child) = match self.arena.get_mut(id)? {
            Node::Leaf(leaf) => {
                return Ok(find_key_location(&leaf.keys, key).map(|pos| leaf.remove_at(pos).1));
            }
            Node::Index(index) => {
                index.check_fanout(id)?;
                let pos = find_key_range(&index.keys, key);
                (pos, index.children[pos])
            }
        };

        let removed = self.delete_from(child, key)?;
        if removed.is_none() {
            return Ok(None);
        }

        if self.arena.get(child)?.is_underflowed(self.config.order()) {
            self.rebalance_child(id, pos)?;
        }
        Ok(removed)
    }

    /// Fix the underflowed child at `pos` of `parent_id`.
    ///
    /// The leftmost child borrows from or merges with its right sibling;
    /// every other child uses its left sibling.
    fn rebalance_child(&mut self, parent_id: NodeId, pos: usize) -> Result<()> {
        let parent = self.arena.index(parent_id)?;
        let corrupted = Error::CorruptedNode {
            node: parent_id,
            keys: parent.len(),
            children: parent.children.len(),
        };
        let (sibling_pos, side) = if pos == 0 {
            (1, Side::Right)
        } else {
            (pos - 1, Side::Left)
        };
        let child_id = parent.children[pos];
        let Some(&sibling_id) = parent.children.get(sibling_pos) else {
            return Err(corrupted);
        };

        // Nothing moves until the parent key between the pair is confirmed.
        let separator = pos.min(sibling_pos);
        let (left_id, right_id) = match side {
            Side::Right => (child_id, sibling_id),
            Side::Left => (sibling_id, child_id),
        };
        let located = locate_separator(
            &parent.keys,
            self.arena.get(left_id)?.keys(),
            self.arena.get(right_id)?.keys(),
        );
        if located != Some(separator) {
            return Err(corrupted);
        }

        let mut smaller = self.arena.take(child_id)?;
        let mut bigger = match self.arena.take(sibling_id) {
            Ok(node) => node,
            Err(err) => {
                self.arena.put(child_id, smaller);
                return Err(err);
            }
        };
        let outcome =
            self.resolve_underflow(&mut smaller, &mut bigger, side, sibling_id, parent_id, separator);
        self.arena.put(child_id, smaller);
        self.arena.put(sibling_id, bigger);

        match outcome? {
            Rebalance::Redistributed => {
                TreeStats::bump(&self.stats.redistributions);
                trace!(node = %child_id, sibling = %sibling_id, "redistributed one entry");
            }
            Rebalance::Merged => {
                let parent = self.arena.index_mut(parent_id)?;
                parent.keys.remove(separator);
                let drained = parent.children.remove(separator);
                let survivor = parent.children[separator];

                if let Node::Leaf(_) = self.arena.free(drained)? {
                    if let Some(prev) = self.arena.leaf(survivor)?.prev {
                        self.arena.leaf_mut(prev)?.next = Some(survivor);
                    }
                }
                TreeStats::bump(&self.stats.merges);
                trace!(drained = %drained, survivor = %survivor, "merged siblings");
            }
        }
        Ok(())
    }

    fn resolve_underflow(
        &mut self,
        smaller: &mut Node<K, V>,
        bigger: &mut Node<K, V>,
        side: Side,
        sibling_id: NodeId,
        parent_id: NodeId,
        separator: usize,
    ) -> Result<Rebalance> {
        let order = self.config.order();
        let parent = self.arena.index_mut(parent_id)?;

        match (smaller, bigger) {
            (Node::Leaf(smaller), Node::Leaf(bigger)) => {
                // The helper must also be the chain neighbour on that side.
                let linked = match side {
                    Side::Right => smaller.next,
                    Side::Left => smaller.prev,
                };
                if linked != Some(sibling_id) {
                    return Err(Error::CorruptedNode {
                        node: parent_id,
                        keys: parent.len(),
                        children: parent.children.len(),
                    });
                }
                Ok(resolve_leaf_underflow(smaller, bigger, side, parent, separator, order))
            }
            (Node::Index(smaller), Node::Index(bigger)) => {
                Ok(resolve_index_underflow(smaller, bigger, side, parent, separator, order))
            }
            (smaller, _) => Err(Error::NodeKindMismatch {
                node: sibling_id,
                expected: smaller.kind(),
            }),
        }
    }
}

impl<K, V> Default for BPlusTree<K, V> {
    fn default() -> Self {
        Self::with_config(TreeConfig::default())
    }
}
