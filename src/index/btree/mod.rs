//! B+ tree index.
//!
//! # Components
//! - [`BPlusTree`] - The tree driver (search, insert, delete)
//! - [`Iter`] - Ordered traversal over the leaf chain
//! - [`TreeStats`] - Structural change counters
//! - [`TreeShape`] - Result of an invariant check
//!
//! Nodes live in a slot arena (`arena`) as `node::Node` values and are
//! never handed out. `bisect`, `split` and `rebalance` hold the pure
//! helpers the driver is built from.
//!
//! ```compile_fail
//! use linkleaf::index::btree::NodeArena;
//! ```

mod arena;
mod bisect;
mod iter;
mod node;
mod rebalance;
mod split;
mod stats;
mod tree;
mod validate;

pub use iter::Iter;
pub use stats::{StatsSnapshot, TreeStats};
pub use tree::BPlusTree;
pub use validate::TreeShape;
