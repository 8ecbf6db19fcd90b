//! Structural invariant checking.
//!
//! [`BPlusTree::check_invariants`] walks the whole tree and verifies:
//! - keys strictly increase within every node
//! - every key of `children[i]` lies in `[keys[i-1], keys[i])`
//! - non-root nodes hold `order..=2*order` keys, the root at most `2*order`
//! - index nodes have exactly one more child than keys
//! - all leaves sit at the same depth
//! - the leaf chain visits every leaf once, in order, and `prev` mirrors `next`
//! - the entry count matches `len()` and no arena slot leaks

use crate::common::{Error, NodeId, Result};
use crate::index::btree::node::Node;
use crate::index::btree::tree::BPlusTree;

/// Summary of a tree that passed [`BPlusTree::check_invariants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeShape {
    pub height: usize,
    pub leaves: usize,
    pub index_nodes: usize,
    pub entries: usize,
}

#[derive(Default)]
struct Walk {
    leaves: Vec<NodeId>,
    index_nodes: usize,
    entries: usize,
    leaf_depth: Option<usize>,
}

fn violation(msg: impl Into<String>) -> Error {
    Error::InvariantViolation(msg.into())
}

impl<K: Ord, V> BPlusTree<K, V> {
    /// Verify every structural invariant.
    ///
    /// # Errors
    /// - `Error::InvariantViolation` describing the first breach found
    /// - `Error::DanglingNode` / `Error::CorruptedNode` if a handle or
    ///   fanout is broken
    pub fn check_invariants(&self) -> Result<TreeShape> {
        let Some(root) = self.root() else {
            if self.len() != 0 {
                return Err(violation(format!("empty tree reports len {}", self.len())));
            }
            return Ok(TreeShape::default());
        };

        let mut walk = Walk::default();
        self.check_node(root, None, None, 1, true, &mut walk)?;
        self.check_leaf_chain(&walk.leaves)?;

        if walk.entries != self.len() {
            return Err(violation(format!(
                "tree holds {} entries but len() is {}",
                walk.entries,
                self.len()
            )));
        }
        let reachable = walk.leaves.len() + walk.index_nodes;
        if reachable != self.arena().live_count() {
            return Err(violation(format!(
                "{} nodes reachable but {} allocated",
                reachable,
                self.arena().live_count()
            )));
        }

        Ok(TreeShape {
            height: walk.leaf_depth.unwrap_or(0),
            leaves: walk.leaves.len(),
            index_nodes: walk.index_nodes,
            entries: walk.entries,
        })
    }

    fn check_node(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        is_root: bool,
        walk: &mut Walk,
    ) -> Result<()> {
        let node = self.arena().get(id)?;
        let keys = node.keys();
        let config = self.config();

        if !keys.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(violation(format!("{} keys are not strictly increasing", id)));
        }
        if let (Some(lower), Some(first)) = (lower, keys.first()) {
            if first < lower {
                return Err(violation(format!("{} has a key below its range", id)));
            }
        }
        if let (Some(upper), Some(last)) = (upper, keys.last()) {
            if last >= upper {
                return Err(violation(format!("{} has a key above its range", id)));
            }
        }

        if keys.len() > config.max_keys() {
            return Err(violation(format!(
                "{} holds {} keys, max is {}",
                id,
                keys.len(),
                config.max_keys()
            )));
        }
        if is_root {
            if keys.is_empty() {
                return Err(violation(format!("root {} has no keys", id)));
            }
        } else if keys.len() < config.min_keys() {
            return Err(violation(format!(
                "{} holds {} keys, min is {}",
                id,
                keys.len(),
                config.min_keys()
            )));
        }

        match node {
            Node::Leaf(leaf) => {
                if leaf.values.len() != leaf.keys.len() {
                    return Err(violation(format!(
                        "{} has {} keys but {} values",
                        id,
                        leaf.keys.len(),
                        leaf.values.len()
                    )));
                }
                match walk.leaf_depth {
                    Some(expected) if expected != depth => {
                        return Err(violation(format!(
                            "{} at depth {}, other leaves at depth {}",
                            id, depth, expected
                        )));
                    }
                    _ => walk.leaf_depth = Some(depth),
                }
                walk.leaves.push(id);
                walk.entries += leaf.len();
            }
            Node::Index(index) => {
                index.check_fanout(id)?;
                walk.index_nodes += 1;
                for (i, &child) in index.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(&index.keys[i - 1]) };
                    let child_upper = index.keys.get(i).or(upper);
                    self.check_node(child, child_lower, child_upper, depth + 1, false, walk)?;
                }
            }
        }
        Ok(())
    }

    /// `leaves` is the in-order leaf list from the tree walk.
    fn check_leaf_chain(&self, leaves: &[NodeId]) -> Result<()> {
        let mut current = leaves.first().copied();
        let mut prev: Option<NodeId> = None;

        for &expected in leaves {
            if current != Some(expected) {
                return Err(violation(format!(
                    "leaf chain reached {:?}, expected {}",
                    current, expected
                )));
            }
            let leaf = self.arena().leaf(expected)?;
            if leaf.prev != prev {
                return Err(violation(format!(
                    "{} prev is {:?}, expected {:?}",
                    expected, leaf.prev, prev
                )));
            }
            if let Some(prev) = prev {
                let before = self.arena().leaf(prev)?;
                if let (Some(a), Some(b)) = (before.keys.last(), leaf.keys.first()) {
                    if a >= b {
                        return Err(violation(format!("{} overlaps {}", prev, expected)));
                    }
                }
            }
            prev = Some(expected);
            current = leaf.next;
        }

        if let Some(extra) = current {
            return Err(violation(format!("leaf chain continues past the last leaf to {}", extra)));
        }
        Ok(())
    }
}
