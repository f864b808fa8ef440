//! Container tests
//!
//! Covers:
//! - Hash map bulk load, removal and growth behaviour
//! - Model-based comparison of the hash map and B+ tree against `std`
//! - Priority queue ordering

use std::time::{Duration, Instant};

use proptest::prelude::*;
use solidc_containers::{
    BPlusTree, HashMap, MapConfig, MapError, MinQueue, PriorityQueue, SyncMap,
};

// ============================================================
// Hash Map Tests
// ============================================================

mod map_tests {
    use super::*;

    #[test]
    fn test_ten_thousand_keys() {
        let mut m = HashMap::new();
        for k in 0..10_000u64 {
            assert_eq!(m.set(k, k * 10).unwrap(), None);
        }
        assert_eq!(m.len(), 10_000);
        for k in 0..10_000u64 {
            assert_eq!(m.get(&k), Some(&(k * 10)));
        }
        assert_eq!(m.iter().count(), 10_000);
        for k in 0..10_000u64 {
            assert_eq!(m.remove(&k), Some(k * 10));
        }
        assert_eq!(m.len(), 0);
        assert_eq!(m.tombstones(), 0);
    }

    #[test]
    fn test_update_keeps_length() {
        let mut m = HashMap::new();
        m.set("key".to_string(), 1).unwrap();
        let before = m.len();
        assert_eq!(m.set("key".to_string(), 2).unwrap(), Some(1));
        assert_eq!(m.len(), before);
        assert_eq!(m.get(&"key".to_string()), Some(&2));
    }

    #[test]
    fn test_growth_is_logarithmic() {
        let mut m = HashMap::with_capacity(1);
        let mut reallocations = 0;
        let mut last_capacity = m.capacity();
        for k in 0..50_000u32 {
            m.set(k, ()).unwrap();
            if m.capacity() != last_capacity {
                reallocations += 1;
                last_capacity = m.capacity();
            }
        }
        // log_1.5(50_000 / 3) is about 24.
        assert!(reallocations <= 26, "{reallocations} reallocations");
    }

    #[test]
    fn test_churn_does_not_grow() {
        let mut m = HashMap::with_capacity(64);
        let capacity = m.capacity();
        for round in 0..1_000u32 {
            m.set(round, round).unwrap();
            if round >= 10 {
                m.remove(&(round - 10));
            }
        }
        assert_eq!(m.len(), 10);
        assert_eq!(m.capacity(), capacity);
    }

    #[test]
    fn test_reserve_huge_fails_quickly() {
        let mut m: HashMap<u64, u64> = HashMap::new();
        m.set(7, 70).unwrap();
        let capacity = m.capacity();

        let started = Instant::now();
        let err = m.reserve(usize::MAX).unwrap_err();
        assert!(matches!(err, MapError::AllocationFailed { .. }), "{err}");
        assert!(m.reserve(usize::MAX / 4).is_err());
        assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());

        assert_eq!(m.capacity(), capacity);
        assert_eq!(m.get(&7), Some(&70));
    }

    #[test]
    fn test_reserve_sizes_once() {
        let mut m: HashMap<u32, u32> = HashMap::new();
        m.reserve(1_000).unwrap();
        let capacity = m.capacity();
        assert!(capacity as f32 * m.max_load_factor() >= 1_000.0);
        for k in 0..1_000u32 {
            m.set(k, k).unwrap();
        }
        assert_eq!(m.capacity(), capacity);
    }

    #[test]
    fn test_long_string_keys() {
        let mut m = HashMap::with_config(MapConfig::default().with_max_load_factor(0.5)).unwrap();
        let keys: Vec<String> = (0..500).map(|i| format!("a fairly long key number {i}")).collect();
        for (i, k) in keys.iter().enumerate() {
            m.set(k.clone(), i).unwrap();
        }
        assert!(m.load_factor() <= 0.5);
        assert!(keys.iter().enumerate().all(|(i, k)| m.get(k) == Some(&i)));
    }

    #[test]
    fn test_sync_map_round_trip() {
        let shared = SyncMap::new();
        shared.set(1u16, "one".to_string()).unwrap();
        assert_eq!(shared.get_cloned(&1), Some("one".to_string()));
        let inner = shared.into_inner();
        assert_eq!(inner.len(), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Set(u16, u32),
        Remove(u16),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u16..256, any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
            (0u16..256).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn matches_std_hashmap(ops in prop::collection::vec(op(), 1..400)) {
            let mut ours = HashMap::with_capacity(4);
            let mut model = std::collections::HashMap::new();
            for op in ops {
                match op {
                    Op::Set(k, v) => {
                        prop_assert_eq!(ours.set(k, v).unwrap(), model.insert(k, v));
                    }
                    Op::Remove(k) => {
                        prop_assert_eq!(ours.remove(&k), model.remove(&k));
                    }
                }
                prop_assert_eq!(ours.len(), model.len());
                prop_assert!(ours.load_factor() <= ours.max_load_factor());
            }
            let mut pairs: Vec<(u16, u32)> = ours.iter().map(|(k, v)| (*k, *v)).collect();
            let mut expected: Vec<(u16, u32)> = model.into_iter().collect();
            pairs.sort_unstable();
            expected.sort_unstable();
            prop_assert_eq!(pairs, expected);
        }
    }
}

// ============================================================
// B+ Tree Tests
// ============================================================

mod bptree_tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_range_bounds() {
        let tree: BPlusTree<i32, i32> = (0..100).map(|k| (k * 2, k)).collect();
        let keys: Vec<i32> = tree.range(10..=20).map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![10, 12, 14, 16, 18, 20]);
        let keys: Vec<i32> = tree.range(11..15).map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![12, 14]);
        assert_eq!(tree.range(500..).count(), 0);
        assert_eq!(tree.range(..).count(), 100);
    }

    proptest! {
        #[test]
        fn matches_btreemap(order in 3usize..9,
                            ops in prop::collection::vec((any::<bool>(), 0i32..200), 1..500)) {
            let mut tree = BPlusTree::new(order).unwrap();
            let mut model = BTreeMap::new();
            for (insert, k) in ops {
                if insert {
                    prop_assert_eq!(tree.insert(k, k * 3), model.insert(k, k * 3));
                } else {
                    prop_assert_eq!(tree.remove(&k), model.remove(&k));
                }
            }
            prop_assert_eq!(tree.len(), model.len());
            prop_assert!(tree.iter().eq(model.iter()));
            prop_assert_eq!(tree.first(), model.iter().next());
            prop_assert_eq!(tree.last(), model.iter().next_back());
        }
    }
}

// ============================================================
// Priority Queue Tests
// ============================================================

mod pqueue_tests {
    use super::*;

    #[test]
    fn test_tasks_by_deadline() {
        let mut q = PriorityQueue::new(|a: &(u32, &'static str), b: &(u32, &'static str)| b.0.cmp(&a.0));
        q.push((30, "report"));
        q.push((5, "standup"));
        q.push((12, "review"));
        let order: Vec<&str> = std::iter::from_fn(|| q.pop()).map(|(_, name)| name).collect();
        assert_eq!(order, vec!["standup", "review", "report"]);
    }

    proptest! {
        #[test]
        fn pops_in_sorted_order(items in prop::collection::vec(any::<i64>(), 0..200)) {
            let mut q = MinQueue::min();
            q.extend(items.iter().copied());
            let mut popped = Vec::new();
            while let Some(x) = q.pop() {
                popped.push(x);
            }
            let mut expected = items;
            expected.sort_unstable();
            prop_assert_eq!(popped, expected);
        }
    }
}
