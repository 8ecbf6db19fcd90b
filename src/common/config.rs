//! Configuration for linkleaf trees.

use crate::common::{Error, Result};

/// Order used by [`TreeConfig::default`].
///
/// With order 2 every non-root node holds 2 to 4 keys, which keeps trees
/// deep enough in tests to exercise multi-level splits and merges.
pub const DEFAULT_ORDER: usize = 2;

/// Smallest legal order.
pub const MIN_ORDER: usize = 1;

/// Per-tree configuration, fixed at construction.
///
/// # Example
/// ```
/// use linkleaf::TreeConfig;
///
/// let config = TreeConfig::new(3).unwrap();
/// assert_eq!(config.min_keys(), 3);
/// assert_eq!(config.max_keys(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    order: usize,
}

impl TreeConfig {
    /// Create a config with order `order` (D).
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order` is below [`MIN_ORDER`].
    pub fn new(order: usize) -> Result<Self> {
        if order < MIN_ORDER {
            return Err(Error::InvalidOrder(order));
        }
        Ok(Self { order })
    }

    /// The order D.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Fewest keys a non-root node may hold (D).
    #[inline]
    pub fn min_keys(&self) -> usize {
        self.order
    }

    /// Most keys any node may hold (2D).
    #[inline]
    pub fn max_keys(&self) -> usize {
        2 * self.order
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
        }
    }
}
