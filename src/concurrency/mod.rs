//! Locking layer for sharing an index across threads.
//!
//! The tree itself assumes exclusive access for every mutation. This module
//! wraps it for callers that need concurrent readers and writers.
//!
//! # Components
//! - [`SharedIndex`] - A B+ tree behind a reader/writer lock

mod shared_index;

pub use shared_index::SharedIndex;
