//! Error types for linkleaf.

use thiserror::Error;

use crate::common::NodeId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Which variant of node an operation required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Index,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Leaf => write!(f, "leaf"),
            NodeKind::Index => write!(f, "index"),
        }
    }
}

/// All possible errors in linkleaf.
///
/// A missing key is never an error: lookups and deletes report it as
/// `Ok(None)`. Every variant below except `InvalidOrder` means the tree
/// itself is corrupted.
#[derive(Debug, Error)]
pub enum Error {
    /// Tree order must be at least one.
    #[error("invalid tree order {0}: must be >= 1")]
    InvalidOrder(usize),

    /// A handle names an arena slot that holds no node.
    #[error("{0} does not refer to a live node")]
    DanglingNode(NodeId),

    /// An index node broke the `children == keys + 1` rule, or a separator
    /// did not sit between two siblings.
    #[error("{node} is corrupted: {keys} keys, {children} children")]
    CorruptedNode {
        node: NodeId,
        keys: usize,
        children: usize,
    },

    /// A node had the wrong variant for the operation.
    #[error("{node} is not a {expected} node")]
    NodeKindMismatch { node: NodeId, expected: NodeKind },

    /// Reported by the invariant checker.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidOrder(0);
        assert_eq!(format!("{}", err), "invalid tree order 0: must be >= 1");

        let err = Error::DanglingNode(NodeId::new(7));
        assert_eq!(format!("{}", err), "Node(7) does not refer to a live node");

        let err = Error::NodeKindMismatch {
            node: NodeId::new(3),
            expected: NodeKind::Leaf,
        };
        assert_eq!(format!("{}", err), "Node(3) is not a leaf node");
    }

    #[test]
    fn test_corrupted_node_display() {
        let err = Error::CorruptedNode {
            node: NodeId::new(1),
            keys: 2,
            children: 2,
        };
        assert_eq!(format!("{}", err), "Node(1) is corrupted: 2 keys, 2 children");
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
