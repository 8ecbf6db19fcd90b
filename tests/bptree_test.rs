//! B+ tree scenario tests.
//!
//! These exercise the public API end to end and check the structural
//! invariants after every mutation.

use linkleaf::{BPlusTree, Error};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn keys_of<V>(tree: &BPlusTree<u32, V>) -> Vec<u32> {
    tree.iter().map(|(k, _)| *k).collect()
}

fn shuffled(n: u32, seed: u64) -> Vec<u32> {
    let mut keys: Vec<u32> = (0..n).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}

// ============================================================================
// Sequential insert, order 2
// ============================================================================

/// Test 1..=10 at order 2: two levels, every key found, one delete.
#[test]
fn test_sequential_insert_and_delete() {
    let mut tree = BPlusTree::new(2).unwrap();
    for i in 1..=10u32 {
        tree.insert(i, format!("v{}", i)).unwrap();
    }

    let shape = tree.check_invariants().unwrap();
    assert_eq!(shape.height, 2);
    assert_eq!(tree.height(), 2);

    for i in 1..=10u32 {
        assert_eq!(tree.search(&i).unwrap(), Some(&format!("v{}", i)));
    }
    assert_eq!(tree.search(&11).unwrap(), None);

    assert_eq!(tree.delete(&5).unwrap(), Some("v5".to_string()));
    assert_eq!(tree.search(&5).unwrap(), None);
    assert_eq!(tree.search(&4).unwrap(), Some(&"v4".to_string()));
    assert_eq!(tree.search(&6).unwrap(), Some(&"v6".to_string()));
    tree.check_invariants().unwrap();
}

/// Test unordered inserts stay within node capacity and chain in order.
#[test]
fn test_mixed_insert_order_leaf_chain() {
    let mut tree = BPlusTree::new(2).unwrap();
    for k in [20u32, 10, 30, 5, 15, 25, 35] {
        tree.insert(k, k).unwrap();
        // check_invariants enforces the 2D = 4 key ceiling on every node
        tree.check_invariants().unwrap();
    }

    assert_eq!(keys_of(&tree), vec![5, 10, 15, 20, 25, 30, 35]);

    let reversed: Vec<u32> = tree.iter().rev().map(|(k, _)| *k).collect();
    assert_eq!(reversed, vec![35, 30, 25, 20, 15, 10, 5]);
}

// ============================================================================
// Round-trip and idempotence
// ============================================================================

/// Test every inserted key comes back with its value.
#[test]
fn test_round_trip_random_order() {
    for order in 1..=4 {
        let mut tree = BPlusTree::new(order).unwrap();
        let keys = shuffled(500, order as u64);

        for &k in &keys {
            assert_eq!(tree.insert(k, k * 3).unwrap(), None);
        }
        tree.check_invariants().unwrap();
        assert_eq!(tree.len(), 500);

        for &k in &keys {
            assert_eq!(tree.search(&k).unwrap(), Some(&(k * 3)));
        }
        assert_eq!(keys_of(&tree), (0..500).collect::<Vec<_>>());
    }
}

/// Test deleting a subset leaves the rest intact.
#[test]
fn test_delete_keeps_other_keys() {
    let mut tree = BPlusTree::new(2).unwrap();
    for k in 0..200u32 {
        tree.insert(k, k + 1).unwrap();
    }

    for k in (0..200u32).step_by(3) {
        assert_eq!(tree.delete(&k).unwrap(), Some(k + 1));
        tree.check_invariants().unwrap();
    }

    for k in 0..200u32 {
        let expected = if k % 3 == 0 { None } else { Some(k + 1) };
        assert_eq!(tree.search(&k).unwrap().copied(), expected);
    }
}

/// Test the second delete of a key changes nothing.
#[test]
fn test_delete_twice_is_noop() {
    let mut tree = BPlusTree::new(2).unwrap();
    for k in 0..50u32 {
        tree.insert(k, k).unwrap();
    }

    assert_eq!(tree.delete(&17).unwrap(), Some(17));
    let keys_after_first = keys_of(&tree);
    let stats_after_first = tree.stats().snapshot();
    let shape_after_first = tree.check_invariants().unwrap();

    assert_eq!(tree.delete(&17).unwrap(), None);

    assert_eq!(keys_of(&tree), keys_after_first);
    assert_eq!(tree.stats().snapshot(), stats_after_first);
    assert_eq!(tree.check_invariants().unwrap(), shape_after_first);
}

// ============================================================================
// Cascading structure changes
// ============================================================================

/// Test a tall order-1 tree shrinks one level per root collapse.
#[test]
fn test_multi_level_growth_and_collapse() {
    let mut tree = BPlusTree::new(1).unwrap();
    for k in 0..256u32 {
        tree.insert(k, ()).unwrap();
    }
    let tall = tree.check_invariants().unwrap();
    assert!(tall.height >= 4, "height {}", tall.height);
    assert!(tree.stats().snapshot().index_splits > 0);

    let mut previous_height = tall.height;
    for k in 0..256u32 {
        tree.delete(&k).unwrap();
        let shape = tree.check_invariants().unwrap();
        assert!(shape.height <= previous_height);
        previous_height = shape.height;
    }

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.stats().snapshot().root_collapses as usize, tall.height - 1);
}

/// Test draining in random order exercises merges and redistribution.
#[test]
fn test_drain_in_shuffled_order() {
    for order in 1..=3 {
        let mut tree = BPlusTree::new(order).unwrap();
        for k in shuffled(300, 7) {
            tree.insert(k, k.to_string()).unwrap();
        }

        let mut remaining: Vec<u32> = (0..300).collect();
        for k in shuffled(300, 99) {
            assert_eq!(tree.delete(&k).unwrap(), Some(k.to_string()));
            remaining.retain(|&r| r != k);

            tree.check_invariants().unwrap();
            assert_eq!(keys_of(&tree), remaining);
        }

        let stats = tree.stats().snapshot();
        assert!(stats.merges > 0);
        assert!(stats.redistributions > 0);
    }
}

/// Test deleting from the right end.
#[test]
fn test_descending_deletes_borrow_from_left() {
    let mut tree = BPlusTree::new(2).unwrap();
    for k in 0..100u32 {
        tree.insert(k, k).unwrap();
    }

    for k in (50..100u32).rev() {
        tree.delete(&k).unwrap();
        tree.check_invariants().unwrap();
    }

    assert_eq!(keys_of(&tree), (0..50).collect::<Vec<_>>());
}

/// Test arena slots are reused across fill/drain rounds.
#[test]
fn test_reinsert_after_drain() {
    let mut tree = BPlusTree::new(2).unwrap();
    for round in 0..3u32 {
        for k in 0..64u32 {
            tree.insert(k, round).unwrap();
        }
        tree.check_invariants().unwrap();
        assert_eq!(tree.search(&63).unwrap(), Some(&round));

        for k in 0..64u32 {
            tree.delete(&k).unwrap();
        }
        assert!(tree.is_empty());
        tree.check_invariants().unwrap();
    }
}

// ============================================================================
// Independent trees and errors
// ============================================================================

/// Test trees of different orders are independent.
#[test]
fn test_trees_with_different_orders_coexist() {
    let mut small = BPlusTree::new(1).unwrap();
    let mut large = BPlusTree::new(8).unwrap();

    for k in 0..100u32 {
        small.insert(k, k).unwrap();
        large.insert(k, k).unwrap();
    }

    assert!(small.height() > large.height());
    assert_eq!(keys_of(&small), keys_of(&large));
    small.check_invariants().unwrap();
    large.check_invariants().unwrap();
}

/// Test order 0 is rejected.
#[test]
fn test_invalid_order() {
    let result = BPlusTree::<u32, u32>::new(0);
    assert!(matches!(result, Err(Error::InvalidOrder(0))));
}
