//! Node types for the B+ tree.
//!
//! A [`Node`] is either a [`LeafNode`] (keys + values + sibling links) or an
//! [`IndexNode`] (keys + child handles). Dispatch is by `match`, never by
//! downcasting.

use crate::common::{Error, NodeId, NodeKind, Result};

/// A leaf: keys paired 1:1 with values, linked to its neighbours.
///
/// `prev` and `next` are non-owning handles; following `next` from the
/// leftmost leaf visits every entry in ascending key order.
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) values: Vec<V>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

impl<K, V> LeafNode<K, V> {
    /// Create an unlinked leaf holding a single entry.
    pub fn new(key: K, value: V) -> Self {
        Self {
            keys: vec![key],
            values: vec![value],
            prev: None,
            next: None,
        }
    }

    /// Create an unlinked leaf from parallel key/value vectors.
    pub(crate) fn from_parts(keys: Vec<K>, values: Vec<V>) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self {
            keys,
            values,
            prev: None,
            next: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn insert_at(&mut self, pos: usize, key: K, value: V) {
        self.keys.insert(pos, key);
        self.values.insert(pos, value);
    }

    pub(crate) fn remove_at(&mut self, pos: usize) -> (K, V) {
        let key = self.keys.remove(pos);
        let value = self.values.remove(pos);
        (key, value)
    }
}

/// An internal node: `k` keys and `k + 1` children.
///
/// `children[i]` covers `[keys[i-1], keys[i])`, with the outer bounds open.
#[derive(Debug, Clone)]
pub struct IndexNode<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<NodeId>,
}

impl<K> IndexNode<K> {
    /// Create the two-child node that sits above a split root.
    pub fn new(separator: K, left: NodeId, right: NodeId) -> Self {
        Self {
            keys: vec![separator],
            children: vec![left, right],
        }
    }

    pub(crate) fn from_parts(keys: Vec<K>, children: Vec<NodeId>) -> Self {
        debug_assert_eq!(keys.len() + 1, children.len());
        Self { keys, children }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check `children == keys + 1`, reporting the node as corrupted otherwise.
    pub(crate) fn check_fanout(&self, id: NodeId) -> Result<()> {
        if self.children.len() != self.keys.len() + 1 {
            return Err(Error::CorruptedNode {
                node: id,
                keys: self.keys.len(),
                children: self.children.len(),
            });
        }
        Ok(())
    }
}

/// A tree node: leaf or index.
#[derive(Debug, Clone)]
pub enum Node<K, V> {
    Leaf(LeafNode<K, V>),
    Index(IndexNode<K>),
}

impl<K, V> Node<K, V> {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf(_) => NodeKind::Leaf,
            Node::Index(_) => NodeKind::Index,
        }
    }

    #[inline]
    pub fn keys(&self) -> &[K] {
        match self {
            Node::Leaf(leaf) => &leaf.keys,
            Node::Index(index) => &index.keys,
        }
    }

    /// A node is underflowed when it holds fewer than `order` keys.
    ///
    /// The root is exempt; callers decide whether the check applies.
    #[inline]
    pub fn is_underflowed(&self, order: usize) -> bool {
        self.keys().len() < order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_insert_remove() {
        let mut leaf = LeafNode::new(10, "ten");
        leaf.insert_at(0, 5, "five");
        leaf.insert_at(2, 20, "twenty");

        assert_eq!(leaf.keys, [5, 10, 20]);
        assert_eq!(leaf.values, ["five", "ten", "twenty"]);

        assert_eq!(leaf.remove_at(1), (10, "ten"));
        assert_eq!(leaf.len(), 2);
    }

    #[test]
    fn test_underflow_threshold() {
        let node: Node<i32, ()> = Node::Leaf(LeafNode::from_parts(vec![1, 2], vec![(), ()]));
        assert!(!node.is_underflowed(2));
        assert!(node.is_underflowed(3));
    }

    #[test]
    fn test_index_fanout_check() {
        let good = IndexNode::new(5, NodeId::new(0), NodeId::new(1));
        assert!(good.check_fanout(NodeId::new(2)).is_ok());

        let bad = IndexNode {
            keys: vec![5, 6],
            children: vec![NodeId::new(0), NodeId::new(1)],
        };
        assert!(matches!(
            bad.check_fanout(NodeId::new(2)),
            Err(Error::CorruptedNode {
                keys: 2,
                children: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_node_kind() {
        let index: Node<i32, i32> = Node::Index(IndexNode::new(1, NodeId::new(0), NodeId::new(1)));
        assert_eq!(index.kind(), NodeKind::Index);
        assert!(matches!(index, Node::Index(_)));

        let leaf: Node<i32, i32> = Node::Leaf(LeafNode::new(1, 1));
        assert_eq!(leaf.kind(), NodeKind::Leaf);
    }
}
