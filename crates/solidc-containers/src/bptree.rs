//! B+ tree
//!
//! An ordered map whose values live only in the leaves. Leaves are chained
//! in key order, so full scans and range scans never revisit internal nodes.
//!
//! # Layout
//!
//! Nodes are stored in an arena (`Vec<Node>` plus a free list) and refer to
//! their parent, children and leaf neighbours by [`NodeId`] index. A tree of
//! order `m` keeps:
//!
//! | Property | Bound |
//! |----------|-------|
//! | keys per node | at most `m - 1` |
//! | keys per non-root node | at least `ceil(m / 2) - 1` |
//! | children per internal node | keys + 1 |
//! | leaf depth | equal for every leaf |
//!
//! Separator `keys[i]` of an internal node is a lower bound for every key in
//! `children[i + 1]` and an exclusive upper bound for `children[i]`.
//!
//! # Deletion
//!
//! An underfull node first borrows from its left sibling, then its right
//! sibling, and merges with a sibling when neither can spare a key. Merging
//! can cascade upward; a root left with a single child is replaced by it.
//!
//! # Example
//!
//! ```
//! use solidc_containers::BPlusTree;
//!
//! let mut index = BPlusTree::new(4).unwrap();
//! for (i, word) in ["delta", "alpha", "charlie", "bravo"].into_iter().enumerate() {
//!     index.insert(word, i);
//! }
//! let keys: Vec<_> = index.range("b".."d").map(|(k, _)| *k).collect();
//! assert_eq!(keys, ["bravo", "charlie"]);
//! ```

use std::fmt;
use std::mem;
use std::ops::{Bound, RangeBounds};

use crate::BTreeError;

/// Order used by [`BPlusTree::default`].
pub const DEFAULT_ORDER: usize = 32;

/// Smallest accepted order.
pub const MIN_ORDER: usize = 3;

/// Index of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node<K, V> {
    leaf: bool,
    parent: Option<NodeId>,
    keys: Vec<K>,
    /// Leaves only.
    values: Vec<V>,
    /// Internal nodes only.
    children: Vec<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    fn vacant() -> Self {
        Self {
            leaf: true,
            parent: None,
            keys: Vec::new(),
            values: Vec::new(),
            children: Vec::new(),
            prev: None,
            next: None,
        }
    }

    fn internal(parent: Option<NodeId>, keys: Vec<K>, children: Vec<NodeId>) -> Self {
        Self {
            leaf: false,
            parent,
            keys,
            values: Vec::new(),
            children,
            prev: None,
            next: None,
        }
    }
}

/// Ordered map backed by a B+ tree.
#[derive(Clone)]
pub struct BPlusTree<K, V> {
    nodes: Vec<Node<K, V>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
    order: usize,
}

impl<K, V> Default for BPlusTree<K, V> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
            order: DEFAULT_ORDER,
        }
    }
}

impl<K, V> BPlusTree<K, V> {
    /// Empty tree of the given order (maximum children per node).
    pub fn new(order: usize) -> Result<Self, BTreeError> {
        if order < MIN_ORDER {
            return Err(BTreeError::InvalidOrder { order });
        }
        Ok(Self {
            order,
            ..Self::default()
        })
    }

    /// Maximum children per node.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// Number of levels; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        let Some(mut id) = self.root else { return 0 };
        let mut depth = 1;
        while let Some(&child) = self.nodes[id.0].children.first() {
            id = child;
            depth += 1;
        }
        depth
    }

    fn max_keys(&self) -> usize {
        self.order - 1
    }

    fn min_keys(&self) -> usize {
        self.order.div_ceil(2) - 1
    }

    fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id.0] = Node::vacant();
        self.free.push(id);
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> usize {
        let pos = self.nodes[parent.0].children.iter().position(|&c| c == child);
        debug_assert!(pos.is_some(), "node {child:?} not linked from its parent");
        pos.unwrap_or(0)
    }

    fn leftmost_leaf(&self) -> Option<NodeId> {
        let mut id = self.root?;
        while let Some(&child) = self.nodes[id.0].children.first() {
            id = child;
        }
        Some(id)
    }

    fn rightmost_leaf(&self) -> Option<NodeId> {
        let mut id = self.root?;
        while let Some(&child) = self.nodes[id.0].children.last() {
            id = child;
        }
        Some(id)
    }

    /// Smallest entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        let node = &self.nodes[self.leftmost_leaf()?.0];
        Some((node.keys.first()?, node.values.first()?))
    }

    /// Largest entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        let node = &self.nodes[self.rightmost_leaf()?.0];
        Some((node.keys.last()?, node.values.last()?))
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: self,
            leaf: self.leftmost_leaf(),
            pos: 0,
            remaining: self.len,
        }
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    fn find_leaf(&self, key: &K) -> Option<NodeId> {
        let mut id = self.root?;
        loop {
            let node = &self.nodes[id.0];
            if node.leaf {
                return Some(id);
            }
            let idx = node.keys.partition_point(|sep| sep <= key);
            id = node.children[idx];
        }
    }

    /// Value bound to `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let node = &self.nodes[self.find_leaf(key)?.0];
        let i = node.keys.binary_search(key).ok()?;
        node.values.get(i)
    }

    /// Mutable access to the value bound to `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let leaf = self.find_leaf(key)?;
        let node = &mut self.nodes[leaf.0];
        let i = node.keys.binary_search(key).ok()?;
        node.values.get_mut(i)
    }

    /// True if `key` is bound.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    // ============================================================
    // Insertion
    // ============================================================

    /// Bind `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(leaf) = self.find_leaf(&key) else {
            let mut node = Node::vacant();
            node.keys.push(key);
            node.values.push(value);
            self.root = Some(self.alloc(node));
            self.len = 1;
            return None;
        };

        let node = &mut self.nodes[leaf.0];
        match node.keys.binary_search(&key) {
            Ok(i) => return Some(mem::replace(&mut node.values[i], value)),
            Err(i) => {
                node.keys.insert(i, key);
                node.values.insert(i, value);
            }
        }
        self.len += 1;

        if self.nodes[leaf.0].keys.len() > self.max_keys() {
            self.split_leaf(leaf);
        }
        None
    }

    fn split_leaf(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        let mid = node.keys.len() / 2;
        let keys = node.keys.split_off(mid);
        let values = node.values.split_off(mid);
        let (parent, next) = (node.parent, node.next);
        let Some(separator) = keys.first().cloned() else { return };

        let right = self.alloc(Node {
            leaf: true,
            parent,
            keys,
            values,
            children: Vec::new(),
            prev: Some(id),
            next,
        });
        if let Some(n) = next {
            self.nodes[n.0].prev = Some(right);
        }
        self.nodes[id.0].next = Some(right);
        self.insert_into_parent(id, separator, right);
    }

    fn split_internal(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        let mid = node.keys.len() / 2;
        let keys = node.keys.split_off(mid + 1);
        let children = node.children.split_off(mid + 1);
        let parent = node.parent;
        let Some(separator) = node.keys.pop() else { return };

        let right = self.alloc(Node::internal(parent, keys, children));
        for i in 0..self.nodes[right.0].children.len() {
            let child = self.nodes[right.0].children[i];
            self.nodes[child.0].parent = Some(right);
        }
        self.insert_into_parent(id, separator, right);
    }

    fn insert_into_parent(&mut self, left: NodeId, separator: K, right: NodeId) {
        let Some(parent) = self.nodes[left.0].parent else {
            let root = self.alloc(Node::internal(None, vec![separator], vec![left, right]));
            self.nodes[left.0].parent = Some(root);
            self.nodes[right.0].parent = Some(root);
            self.root = Some(root);
            return;
        };

        let pos = self.child_index(parent, left);
        let node = &mut self.nodes[parent.0];
        node.keys.insert(pos, separator);
        node.children.insert(pos + 1, right);
        self.nodes[right.0].parent = Some(parent);

        if self.nodes[parent.0].keys.len() > self.max_keys() {
            self.split_internal(parent);
        }
    }

    // ============================================================
    // Deletion
    // ============================================================

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let leaf = self.find_leaf(key)?;
        let node = &mut self.nodes[leaf.0];
        let i = node.keys.binary_search(key).ok()?;
        node.keys.remove(i);
        let value = node.values.remove(i);
        let remaining = node.keys.len();
        self.len -= 1;

        if Some(leaf) == self.root {
            if remaining == 0 {
                self.release(leaf);
                self.root = None;
            }
        } else if remaining < self.min_keys() {
            self.rebalance(leaf);
        }
        Some(value)
    }

    fn rebalance(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent else { return };
        let idx = self.child_index(parent, id);
        let min = self.min_keys();
        let siblings = &self.nodes[parent.0].children;
        let left = idx.checked_sub(1).map(|i| siblings[i]);
        let right = siblings.get(idx + 1).copied();

        if let Some(l) = left.filter(|l| self.nodes[l.0].keys.len() > min) {
            self.borrow_from_left(id, l, parent, idx);
        } else if let Some(r) = right.filter(|r| self.nodes[r.0].keys.len() > min) {
            self.borrow_from_right(id, r, parent, idx);
        } else if let Some(l) = left {
            self.merge(l, id, parent, idx - 1);
        } else if let Some(r) = right {
            self.merge(id, r, parent, idx);
        }
    }

    fn borrow_from_left(&mut self, id: NodeId, left: NodeId, parent: NodeId, idx: usize) {
        let l = &mut self.nodes[left.0];
        if l.leaf {
            let (Some(k), Some(v)) = (l.keys.pop(), l.values.pop()) else { return };
            self.nodes[parent.0].keys[idx - 1] = k.clone();
            let node = &mut self.nodes[id.0];
            node.keys.insert(0, k);
            node.values.insert(0, v);
        } else {
            let (Some(k), Some(child)) = (l.keys.pop(), l.children.pop()) else { return };
            let separator = mem::replace(&mut self.nodes[parent.0].keys[idx - 1], k);
            let node = &mut self.nodes[id.0];
            node.keys.insert(0, separator);
            node.children.insert(0, child);
            self.nodes[child.0].parent = Some(id);
        }
    }

    fn borrow_from_right(&mut self, id: NodeId, right: NodeId, parent: NodeId, idx: usize) {
        let r = &mut self.nodes[right.0];
        if r.leaf {
            let Some(new_first) = r.keys.get(1).cloned() else { return };
            let k = r.keys.remove(0);
            let v = r.values.remove(0);
            self.nodes[parent.0].keys[idx] = new_first;
            let node = &mut self.nodes[id.0];
            node.keys.push(k);
            node.values.push(v);
        } else {
            let k = r.keys.remove(0);
            let child = r.children.remove(0);
            let separator = mem::replace(&mut self.nodes[parent.0].keys[idx], k);
            let node = &mut self.nodes[id.0];
            node.keys.push(separator);
            node.children.push(child);
            self.nodes[child.0].parent = Some(id);
        }
    }

    /// Fold `right` into `left`; `sep_idx` is their separator in `parent`.
    fn merge(&mut self, left: NodeId, right: NodeId, parent: NodeId, sep_idx: usize) {
        let separator = self.nodes[parent.0].keys.remove(sep_idx);
        self.nodes[parent.0].children.remove(sep_idx + 1);
        let absorbed = mem::replace(&mut self.nodes[right.0], Node::vacant());
        self.free.push(right);

        if absorbed.leaf {
            let node = &mut self.nodes[left.0];
            node.keys.extend(absorbed.keys);
            node.values.extend(absorbed.values);
            node.next = absorbed.next;
            if let Some(n) = absorbed.next {
                self.nodes[n.0].prev = Some(left);
            }
        } else {
            for &child in &absorbed.children {
                self.nodes[child.0].parent = Some(left);
            }
            let node = &mut self.nodes[left.0];
            node.keys.push(separator);
            node.keys.extend(absorbed.keys);
            node.children.extend(absorbed.children);
        }

        if Some(parent) == self.root {
            if self.nodes[parent.0].keys.is_empty() {
                self.nodes[left.0].parent = None;
                self.root = Some(left);
                self.release(parent);
            }
        } else if self.nodes[parent.0].keys.len() < self.min_keys() {
            self.rebalance(parent);
        }
    }

    // ============================================================
    // Range Scans
    // ============================================================

    /// Entries whose keys fall in `range`, ascending.
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K, V> {
        let (leaf, pos) = match range.start_bound() {
            Bound::Unbounded => (self.leftmost_leaf(), 0),
            Bound::Included(lo) => {
                let leaf = self.find_leaf(lo);
                let pos = leaf.map_or(0, |id| self.nodes[id.0].keys.partition_point(|k| k < lo));
                (leaf, pos)
            }
            Bound::Excluded(lo) => {
                let leaf = self.find_leaf(lo);
                let pos = leaf.map_or(0, |id| self.nodes[id.0].keys.partition_point(|k| k <= lo));
                (leaf, pos)
            }
        };
        Range {
            tree: self,
            leaf,
            pos,
            end: range.end_bound().cloned(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BPlusTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord + Clone, V> Extend<(K, V)> for BPlusTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord + Clone, V> FromIterator<(K, V)> for BPlusTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

// ============================================================
// Iterators
// ============================================================

/// In-order iterator over a [`BPlusTree`].
pub struct Iter<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    leaf: Option<NodeId>,
    pos: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let node = &tree.nodes[self.leaf?.0];
            if let (Some(k), Some(v)) = (node.keys.get(self.pos), node.values.get(self.pos)) {
                self.pos += 1;
                self.remaining -= 1;
                return Some((k, v));
            }
            self.leaf = node.next;
            self.pos = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a BPlusTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// Iterator returned by [`BPlusTree::range`].
pub struct Range<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    leaf: Option<NodeId>,
    pos: usize,
    end: Bound<K>,
}

impl<'a, K: Ord, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let node = &tree.nodes[self.leaf?.0];
            if let (Some(k), Some(v)) = (node.keys.get(self.pos), node.values.get(self.pos)) {
                let in_range = match &self.end {
                    Bound::Included(hi) => k <= hi,
                    Bound::Excluded(hi) => k < hi,
                    Bound::Unbounded => true,
                };
                if !in_range {
                    self.leaf = None;
                    return None;
                }
                self.pos += 1;
                return Some((k, v));
            }
            self.leaf = node.next;
            self.pos = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn check_invariants<K: Ord + Clone + fmt::Debug, V>(tree: &BPlusTree<K, V>) {
        let Some(root) = tree.root else {
            assert_eq!(tree.len(), 0);
            return;
        };
        assert_eq!(tree.nodes[root.0].parent, None);

        let mut leaf_depths = Vec::new();
        let mut stack = vec![(root, 1usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &tree.nodes[id.0];
            assert!(node.keys.len() <= tree.max_keys(), "overfull node {id:?}");
            if id != root {
                assert!(node.keys.len() >= tree.min_keys(), "underfull node {id:?}");
            }
            assert!(node.keys.windows(2).all(|w| w[0] < w[1]));
            if node.leaf {
                assert_eq!(node.keys.len(), node.values.len());
                leaf_depths.push(depth);
            } else {
                assert_eq!(node.children.len(), node.keys.len() + 1);
                for (i, &child) in node.children.iter().enumerate() {
                    let c = &tree.nodes[child.0];
                    assert_eq!(c.parent, Some(id));
                    if i > 0 {
                        assert!(c.keys.iter().all(|k| k >= &node.keys[i - 1]));
                    }
                    if i < node.keys.len() {
                        assert!(c.keys.iter().all(|k| k < &node.keys[i]));
                    }
                    stack.push((child, depth + 1));
                }
            }
        }
        assert!(leaf_depths.windows(2).all(|w| w[0] == w[1]));

        let keys: Vec<&K> = tree.keys().collect();
        assert_eq!(keys.len(), tree.len());
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_rejects_small_order() {
        assert_eq!(
            BPlusTree::<i32, ()>::new(2).unwrap_err(),
            BTreeError::InvalidOrder { order: 2 }
        );
        assert!(BPlusTree::<i32, ()>::new(3).is_ok());
    }

    #[test]
    fn test_insert_splits_and_replaces() {
        let mut tree = BPlusTree::new(3).unwrap();
        for k in 0..50 {
            assert_eq!(tree.insert(k, k * 2), None);
            check_invariants(&tree);
        }
        assert!(tree.depth() > 3);
        assert_eq!(tree.insert(7, 0), Some(14));
        assert_eq!(tree.len(), 50);
        assert_eq!(tree.get(&7), Some(&0));
        assert_eq!(tree.first(), Some((&0, &0)));
        assert_eq!(tree.last(), Some((&49, &98)));
    }

    #[test]
    fn test_remove_rebalances_to_empty() {
        for order in [3, 4, 5, 8] {
            let mut tree = BPlusTree::new(order).unwrap();
            for k in 0..200u32 {
                tree.insert(k.wrapping_mul(7919) % 200, k);
            }
            check_invariants(&tree);
            for k in (0..200u32).rev().step_by(3).chain((0..200).step_by(2)) {
                tree.remove(&k);
                check_invariants(&tree);
            }
            let rest: Vec<u32> = (0..200).filter(|k| tree.contains_key(k)).collect();
            assert_eq!(rest.len(), tree.len());
            for k in rest {
                assert!(tree.remove(&k).is_some());
                check_invariants(&tree);
            }
            assert!(tree.is_empty());
            assert_eq!(tree.depth(), 0);
        }
    }

    #[test]
    fn test_matches_btreemap_model() {
        let mut tree = BPlusTree::new(4).unwrap();
        let mut model = BTreeMap::new();
        let mut x: u64 = 0x2545_F491_4F6C_DD1D;
        for _ in 0..5000 {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            let key = (x % 300) as i64;
            if x % 3 == 0 {
                assert_eq!(tree.remove(&key), model.remove(&key));
            } else {
                assert_eq!(tree.insert(key, x), model.insert(key, x));
            }
        }
        check_invariants(&tree);
        assert!(tree.iter().eq(model.iter()));
        assert!(tree.range(50..120).eq(model.range(50..120)));
        assert!(tree.range(..=10).eq(model.range(..=10)));
    }

    #[test]
    fn test_arena_reuses_freed_nodes() {
        let mut tree = BPlusTree::new(3).unwrap();
        for k in 0..64 {
            tree.insert(k, ());
        }
        let allocated = tree.nodes.len();
        for k in 0..64 {
            tree.remove(&k);
        }
        for k in 0..64 {
            tree.insert(k, ());
        }
        assert_eq!(tree.nodes.len(), allocated);
    }

    #[test]
    fn test_get_mut_and_clear() {
        let mut tree: BPlusTree<String, Vec<u8>> = BPlusTree::default();
        tree.insert("k".into(), vec![1]);
        if let Some(v) = tree.get_mut(&"k".to_string()) {
            v.push(2);
        }
        assert_eq!(tree.get(&"k".to_string()), Some(&vec![1, 2]));
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.first(), None);
    }
}
