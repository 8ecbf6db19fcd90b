//! Slot arena that owns every node of a tree.
//!
//! Nodes refer to each other only through [`NodeId`] handles, so parent
//! links and leaf sibling links are plain data and never form ownership
//! cycles.

use crate::common::{Error, NodeId, NodeKind, Result};
use crate::index::btree::node::{IndexNode, LeafNode, Node};

/// Owns the nodes of one tree.
///
/// # Layout
/// ```text
/// slots:     [Some(Leaf)] [None] [Some(Index)] [Some(Leaf)] ...
///                            ▲
/// free_list: [NodeId(1)] ────┘   (LIFO, reused by the next alloc)
/// ```
#[derive(Debug, Clone)]
pub struct NodeArena<K, V> {
    /// Node storage, indexed by `NodeId.0`. `None` marks a vacant slot.
    slots: Vec<Option<Node<K, V>>>,

    /// Stack of vacant slots (LIFO for locality).
    free_list: Vec<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `node` and return its handle, reusing a vacant slot if any.
    pub fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free_list.pop() {
            Some(id) => {
                debug_assert!(self.slots[id.0].is_none());
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId::new(self.slots.len() - 1)
            }
        }
    }

    /// Remove the node permanently and recycle its slot.
    pub fn free(&mut self, id: NodeId) -> Result<Node<K, V>> {
        let node = self.take(id)?;
        self.free_list.push(id);
        Ok(node)
    }

    /// Move a node out of its slot without recycling the slot.
    ///
    /// The caller must [`put`](Self::put) it back before the slot is read
    /// again.
    pub(crate) fn take(&mut self, id: NodeId) -> Result<Node<K, V>> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(Error::DanglingNode(id))
    }

    /// Return a node taken with [`take`](Self::take).
    pub(crate) fn put(&mut self, id: NodeId, node: Node<K, V>) {
        debug_assert!(self.slots[id.0].is_none());
        self.slots[id.0] = Some(node);
    }

    pub fn get(&self, id: NodeId) -> Result<&Node<K, V>> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(Error::DanglingNode(id))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node<K, V>> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(Error::DanglingNode(id))
    }

    pub fn leaf(&self, id: NodeId) -> Result<&LeafNode<K, V>> {
        match self.get(id)? {
            Node::Leaf(leaf) => Ok(leaf),
            Node::Index(_) => Err(mismatch(id, NodeKind::Leaf)),
        }
    }

    pub fn leaf_mut(&mut self, id: NodeId) -> Result<&mut LeafNode<K, V>> {
        match self.get_mut(id)? {
            Node::Leaf(leaf) => Ok(leaf),
            Node::Index(_) => Err(mismatch(id, NodeKind::Leaf)),
        }
    }

    pub fn index(&self, id: NodeId) -> Result<&IndexNode<K>> {
        match self.get(id)? {
            Node::Index(index) => Ok(index),
            Node::Leaf(_) => Err(mismatch(id, NodeKind::Index)),
        }
    }

    pub fn index_mut(&mut self, id: NodeId) -> Result<&mut IndexNode<K>> {
        match self.get_mut(id)? {
            Node::Index(index) => Ok(index),
            Node::Leaf(_) => Err(mismatch(id, NodeKind::Index)),
        }
    }

    /// Number of live nodes.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Drop every node and forget all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }
}

impl<K, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn mismatch(node: NodeId, expected: NodeKind) -> Error {
    Error::NodeKindMismatch { node, expected }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_get() {
        let mut arena: NodeArena<u32, &str> = NodeArena::new();
        let id = arena.alloc(Node::Leaf(LeafNode::new(1, "one")));

        assert_eq!(arena.leaf(id).unwrap().keys, [1]);
        assert!(matches!(
            arena.index(id),
            Err(Error::NodeKindMismatch {
                expected: NodeKind::Index,
                ..
            })
        ));
        assert_eq!(arena.live_count(), 1);
    }

    #[test]
    fn test_free_recycles_slot() {
        let mut arena: NodeArena<u32, u32> = NodeArena::new();
        let a = arena.alloc(Node::Leaf(LeafNode::new(1, 1)));
        let b = arena.alloc(Node::Leaf(LeafNode::new(2, 2)));

        arena.free(a).unwrap();
        assert!(matches!(arena.get(a), Err(Error::DanglingNode(_))));
        assert_eq!(arena.live_count(), 1);

        // LIFO: the freed slot comes back first
        let c = arena.alloc(Node::Leaf(LeafNode::new(3, 3)));
        assert_eq!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn test_take_and_put() {
        let mut arena: NodeArena<u32, u32> = NodeArena::new();
        let id = arena.alloc(Node::Leaf(LeafNode::new(1, 1)));

        let node = arena.take(id).unwrap();
        assert!(arena.get(id).is_err());
        // Taken slots are not free
        assert_eq!(arena.live_count(), 1);

        arena.put(id, node);
        assert!(arena.get(id).is_ok());
    }

    #[test]
    fn test_out_of_range_id() {
        let arena: NodeArena<u32, u32> = NodeArena::new();
        assert!(matches!(arena.get(NodeId::new(99)), Err(Error::DanglingNode(_))));
    }
}
