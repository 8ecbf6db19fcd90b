//! linkleaf - An in-memory B+ tree index with a doubly linked leaf chain.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            linkleaf                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Sharing Layer (concurrency/)                   │   │
//! │  │        SharedIndex = RwLock<BPlusTree>                   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Tree Driver (index/btree/)                  │   │
//! │  │     search · insert + split · delete + rebalance         │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │   bisect  │  split  │  rebalance  │  validate   │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Node Storage (index/btree/)                 │   │
//! │  │    NodeArena: Vec<Option<Node>> + free list of NodeIds   │   │
//! │  │    Node = Leaf { keys, values, prev, next }              │   │
//! │  │         | Index { keys, children }                       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, TreeConfig)
//! - [`index`] - The B+ tree
//! - [`concurrency`] - Reader/writer locking around a tree
//!
//! # Quick Start
//! ```
//! use linkleaf::BPlusTree;
//!
//! // Every non-root node holds between 2 and 4 keys
//! let mut tree = BPlusTree::new(2).unwrap();
//!
//! for k in [20, 10, 30, 5, 15, 25, 35] {
//!     tree.insert(k, k.to_string()).unwrap();
//! }
//! tree.delete(&15).unwrap();
//!
//! let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
//! assert_eq!(keys, vec![5, 10, 20, 25, 30, 35]);
//! ```

pub mod common;
pub mod concurrency;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_ORDER, MIN_ORDER};
pub use common::{Error, NodeId, NodeKind, Result, TreeConfig};

pub use concurrency::SharedIndex;
pub use index::btree::{BPlusTree, Iter, StatsSnapshot, TreeShape, TreeStats};
