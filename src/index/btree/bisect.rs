//! Ordered lookups over a node's key slice.

use std::borrow::Borrow;

/// Exact-match lookup: position of `key` in `keys`, if present.
#[inline]
pub fn find_key_location<K, Q>(keys: &[K], key: &Q) -> Option<usize>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    keys.binary_search_by(|k| k.borrow().cmp(key)).ok()
}

/// Child slot covering `key`: the index of the first key strictly greater
/// than `key`, or `keys.len()` when `key` is >= every key.
#[inline]
pub fn find_key_range<K, Q>(keys: &[K], key: &Q) -> usize
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    keys.partition_point(|k| k.borrow() <= key)
}

/// Locate the parent key that separates two adjacent siblings.
///
/// `left` and `right` are the siblings' own keys. The separator is the
/// upper bound of the left sibling's largest key; if the left sibling is
/// empty it is the slot just before the upper bound of the right sibling's
/// smallest key. Returns `None` when both are empty or the result falls
/// outside `parent_keys`.
pub fn locate_separator<K: Ord>(parent_keys: &[K], left: &[K], right: &[K]) -> Option<usize> {
    let location = match (left.last(), right.first()) {
        (Some(max), _) => find_key_range(parent_keys, max),
        (None, Some(min)) => find_key_range(parent_keys, min).checked_sub(1)?,
        (None, None) => return None,
    };
    (location < parent_keys.len()).then_some(location)
}
