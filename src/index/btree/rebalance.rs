//! Underflow handling: merging and redistributing sibling nodes.
//!
//! Each resolver takes the underflowed node (`smaller`), the sibling chosen
//! to help it (`bigger`), which side `bigger` sits on, the common parent,
//! and the index of the parent key separating the two. The caller locates
//! and validates that separator before anything moves. If `bigger` can
//! spare an entry (it holds at least `order + 1` keys) one boundary entry
//! moves across and the separator is updated. Otherwise the two nodes
//! merge into the right-hand one and the caller must remove the separator
//! and the drained left child from the parent.

use std::mem;

use crate::index::btree::node::{IndexNode, LeafNode};

/// Where the helping sibling sits relative to the underflowed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Outcome of resolving an underflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebalance {
    /// One entry moved; node count unchanged.
    Redistributed,
    /// Left node drained into the right one.
    Merged,
}

/// Resolve an underflowed leaf against a sibling leaf.
///
/// On merge the right leaf inherits the left leaf's `prev` handle. The
/// predecessor's `next` handle lives in another node and is left to the
/// caller.
pub fn resolve_leaf_underflow<K: Clone, V>(
    smaller: &mut LeafNode<K, V>,
    bigger: &mut LeafNode<K, V>,
    bigger_side: Side,
    parent: &mut IndexNode<K>,
    separator: usize,
    order: usize,
) -> Rebalance {
    if bigger.len() < order + 1 {
        match bigger_side {
            Side::Right => merge_leaves(smaller, bigger),
            Side::Left => merge_leaves(bigger, smaller),
        }
        return Rebalance::Merged;
    }

    match bigger_side {
        Side::Right => {
            let (key, value) = bigger.remove_at(0);
            smaller.keys.push(key);
            smaller.values.push(value);
            parent.keys[separator] = bigger.keys[0].clone();
        }
        Side::Left => {
            let (key, value) = bigger.remove_at(bigger.len() - 1);
            smaller.insert_at(0, key, value);
            parent.keys[separator] = smaller.keys[0].clone();
        }
    }
    Rebalance::Redistributed
}

/// Resolve an underflowed index node against a sibling index node.
///
/// Redistribution rotates through the parent: the separator descends into
/// `smaller`, the boundary child crosses over, and `bigger`'s boundary key
/// ascends to replace the separator.
pub fn resolve_index_underflow<K: Clone>(
    smaller: &mut IndexNode<K>,
    bigger: &mut IndexNode<K>,
    bigger_side: Side,
    parent: &mut IndexNode<K>,
    separator: usize,
    order: usize,
) -> Rebalance {
    if bigger.len() < order + 1 {
        let descended = parent.keys[separator].clone();
        match bigger_side {
            Side::Right => merge_index_nodes(smaller, bigger, descended),
            Side::Left => merge_index_nodes(bigger, smaller, descended),
        }
        return Rebalance::Merged;
    }

    match bigger_side {
        Side::Right => {
            let lifted = bigger.keys.remove(0);
            let child = bigger.children.remove(0);
            let descended = mem::replace(&mut parent.keys[separator], lifted);
            smaller.keys.push(descended);
            smaller.children.push(child);
        }
        Side::Left => {
            let last = bigger.len() - 1;
            let lifted = bigger.keys.remove(last);
            let child = bigger.children.remove(last + 1);
            let descended = mem::replace(&mut parent.keys[separator], lifted);
            smaller.keys.insert(0, descended);
            smaller.children.insert(0, child);
        }
    }
    Rebalance::Redistributed
}

/// Move every entry of `left` to the front of `right`.
fn merge_leaves<K, V>(left: &mut LeafNode<K, V>, right: &mut LeafNode<K, V>) {
    let mut keys = mem::take(&mut left.keys);
    let mut values = mem::take(&mut left.values);
    keys.append(&mut right.keys);
    values.append(&mut right.values);
    right.keys = keys;
    right.values = values;

    right.prev = left.prev.take();
    left.next = None;
}

/// Move `left`'s keys, the descended separator, and `left`'s children to
/// the front of `right`.
fn merge_index_nodes<K>(left: &mut IndexNode<K>, right: &mut IndexNode<K>, separator: K) {
    let mut keys = mem::take(&mut left.keys);
    keys.push(separator);
    keys.append(&mut right.keys);
    right.keys = keys;

    let mut children = mem::take(&mut left.children);
    children.append(&mut right.children);
    right.children = children;
}
