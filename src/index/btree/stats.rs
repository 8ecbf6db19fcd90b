//! Structural statistics for a B+ tree.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the structural changes a tree has gone through.
///
/// All fields are atomic so a tree behind a shared read lock can still be
/// inspected without extra synchronization.
///
/// # Memory Ordering
/// `Ordering::Relaxed` everywhere: counters are independent and only need
/// atomicity.
///
/// # Example
/// ```
/// use linkleaf::TreeStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = TreeStats::new();
/// stats.leaf_splits.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().leaf_splits, 1);
/// ```
#[derive(Debug)]
pub struct TreeStats {
    /// Leaves split on overflow.
    pub leaf_splits: AtomicU64,

    /// Index nodes split on overflow.
    pub index_splits: AtomicU64,

    /// Sibling pairs consolidated into one node.
    pub merges: AtomicU64,

    /// Single entries moved between siblings.
    pub redistributions: AtomicU64,

    /// New roots created above a split root (height + 1).
    pub root_splits: AtomicU64,

    /// Empty index roots replaced by their only child (height - 1).
    pub root_collapses: AtomicU64,
}

impl TreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            leaf_splits: AtomicU64::new(0),
            index_splits: AtomicU64::new(0),
            merges: AtomicU64::new(0),
            redistributions: AtomicU64::new(0),
            root_splits: AtomicU64::new(0),
            root_collapses: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a non-atomic copy of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            leaf_splits: self.leaf_splits.load(Ordering::Relaxed),
            index_splits: self.index_splits.load(Ordering::Relaxed),
            merges: self.merges.load(Ordering::Relaxed),
            redistributions: self.redistributions.load(Ordering::Relaxed),
            root_splits: self.root_splits.load(Ordering::Relaxed),
            root_collapses: self.root_collapses.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.leaf_splits.store(0, Ordering::Relaxed);
        self.index_splits.store(0, Ordering::Relaxed);
        self.merges.store(0, Ordering::Relaxed);
        self.redistributions.store(0, Ordering::Relaxed);
        self.root_splits.store(0, Ordering::Relaxed);
        self.root_collapses.store(0, Ordering::Relaxed);
    }
}

impl Default for TreeStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TreeStats {
    fn clone(&self) -> Self {
        let snap = self.snapshot();
        Self {
            leaf_splits: AtomicU64::new(snap.leaf_splits),
            index_splits: AtomicU64::new(snap.index_splits),
            merges: AtomicU64::new(snap.merges),
            redistributions: AtomicU64::new(snap.redistributions),
            root_splits: AtomicU64::new(snap.root_splits),
            root_collapses: AtomicU64::new(snap.root_collapses),
        }
    }
}

/// A point-in-time snapshot of tree statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub leaf_splits: u64,
    pub index_splits: u64,
    pub merges: u64,
    pub redistributions: u64,
    pub root_splits: u64,
    pub root_collapses: u64,
}

impl StatsSnapshot {
    /// Total splits of either node kind.
    pub fn splits(&self) -> u64 {
        self.leaf_splits + self.index_splits
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ splits: {} ({} leaf), merges: {}, redistributions: {}, root: +{}/-{} }}",
            self.splits(),
            self.leaf_splits,
            self.merges,
            self.redistributions,
            self.root_splits,
            self.root_collapses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = TreeStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_stats_bump_and_reset() {
        let stats = TreeStats::new();
        TreeStats::bump(&stats.leaf_splits);
        TreeStats::bump(&stats.leaf_splits);
        TreeStats::bump(&stats.index_splits);

        assert_eq!(stats.snapshot().splits(), 3);

        stats.reset();
        assert_eq!(stats.snapshot().splits(), 0);
    }

    #[test]
    fn test_stats_clone_is_independent() {
        let stats = TreeStats::new();
        TreeStats::bump(&stats.merges);

        let copy = stats.clone();
        TreeStats::bump(&stats.merges);

        assert_eq!(copy.snapshot().merges, 1);
        assert_eq!(stats.snapshot().merges, 2);
    }

    #[test]
    fn test_stats_display() {
        let stats = TreeStats::new();
        stats.leaf_splits.fetch_add(4, Ordering::Relaxed);
        stats.index_splits.fetch_add(1, Ordering::Relaxed);
        stats.merges.fetch_add(2, Ordering::Relaxed);
        stats.root_splits.fetch_add(1, Ordering::Relaxed);

        let display = format!("{}", stats.snapshot());

        assert!(display.contains("splits: 5 (4 leaf)"));
        assert!(display.contains("merges: 2"));
        assert!(display.contains("root: +1/-0"));
    }
}
