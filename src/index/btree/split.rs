//! Overflow handling: splitting leaf and index nodes.
//!
//! Both splits expect a node holding exactly `2 * order + 1` keys and cut
//! it at position `order`. Wiring the new right node into the tree (parent
//! slot, leaf chain handles) is the driver's job because only the driver
//! knows the right node's `NodeId`.

use crate::index::btree::node::{IndexNode, LeafNode};

/// Split an overflowed leaf.
///
/// The left leaf keeps entries `[..order]`; the returned right leaf gets
/// `[order..]`, and its first key is the separator. The right leaf inherits
/// the left leaf's `next` handle; its `prev` is left unset.
pub fn split_leaf<K: Clone, V>(leaf: &mut LeafNode<K, V>, order: usize) -> (K, LeafNode<K, V>) {
    debug_assert!(leaf.len() > 2 * order, "split of a leaf that is not full");

    let keys = leaf.keys.split_off(order);
    let values = leaf.values.split_off(order);
    let separator = keys[0].clone();

    let mut right = LeafNode::from_parts(keys, values);
    right.next = leaf.next;

    (separator, right)
}

/// Split an overflowed index node.
///
/// The key at `order` is promoted and kept in neither half. The left node
/// keeps `order` keys and `order + 1` children; the right node gets the
/// remaining `order` keys and `order + 1` children.
pub fn split_index<K>(node: &mut IndexNode<K>, order: usize) -> (K, IndexNode<K>) {
    debug_assert!(node.len() > 2 * order, "split of an index node that is not full");

    let mut keys = node.keys.split_off(order);
    let separator = keys.remove(0);
    let children = node.children.split_off(order + 1);

    (separator, IndexNode::from_parts(keys, children))
}
