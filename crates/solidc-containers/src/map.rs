//! Open-addressed hash map
//!
//! A hash table with double hashing over three parallel arrays: keys,
//! values and deleted flags.
//!
//! # Overview
//!
//! A slot is *occupied* when it holds a key, a *tombstone* when its deleted
//! flag is set, and *empty* otherwise. Lookups walk the probe sequence
//! `home + i * stride (mod capacity)` with
//!
//! - `home = hash mod capacity`
//! - `stride = (hash mod (capacity - 1)) + 1`
//!
//! stepping over tombstones and stopping at the first empty slot.
//! Capacities are always prime, so every stride is coprime with the capacity
//! and a probe sequence visits every slot exactly once.
//!
//! # Growth
//!
//! Before each insertion the table may be rebuilt:
//!
//! - in place at the current capacity when tombstones outnumber half the
//!   live entries and fill at least an eighth of the slots, which reclaims
//!   them whatever the load;
//! - at the next prime above `capacity * 1.5` when the insertion would still
//!   push `(size + tombstones) / capacity` past the maximum load factor.
//!
//! A rebuild allocates the new arrays with `try_reserve_exact` and plans
//! every entry's new slot before moving anything, so a failed rebuild leaves
//! the map exactly as it was.
//!
//! # Example
//!
//! ```
//! use solidc_containers::HashMap;
//!
//! let mut ages = HashMap::new();
//! ages.set("ada", 36).unwrap();
//! ages.set("alan", 41).unwrap();
//! assert_eq!(ages.set("ada", 37).unwrap(), Some(36));
//! assert_eq!(ages.get(&"ada"), Some(&37));
//! assert_eq!(ages.remove(&"alan"), Some(41));
//! assert_eq!(ages.len(), 1);
//! ```

use std::fmt;
use std::mem;

use solidc_prelude::checked::{saturating_size_add, saturating_size_mul};
use tracing::{debug, error};

use crate::hash::MapKey;
use crate::{MapError, MapResult};

/// Capacity used by [`HashMap::new`], before rounding up to a prime.
pub const DEFAULT_CAPACITY: usize = 16;

/// Default maximum load factor.
pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.75;

/// Smallest table; the stride formula needs `capacity - 1 >= 2`.
const MIN_CAPACITY: usize = 3;

/// Tombstones must fill at least `1 / TOMBSTONE_SHARE` of the table before an
/// in-place rebuild, so a nearly empty large table is not rebuilt on every
/// insertion.
const TOMBSTONE_SHARE: usize = 8;

// ============================================================
// Configuration
// ============================================================

/// Construction parameters for [`HashMap`].
pub struct MapConfig<K> {
    /// Requested initial capacity, rounded up to a prime.
    pub capacity: usize,
    /// Rebuild threshold for `(size + tombstones) / capacity`, in `(0, 1)`.
    pub max_load_factor: f32,
    /// Key hash.
    pub hash_fn: fn(&K) -> u64,
    /// Key equality; must agree with `hash_fn`.
    pub key_eq: fn(&K, &K) -> bool,
}

impl<K: MapKey> Default for MapConfig<K> {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            hash_fn: K::map_hash,
            key_eq: K::key_eq,
        }
    }
}

impl<K> MapConfig<K> {
    /// Set the initial capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the maximum load factor.
    pub fn with_max_load_factor(mut self, max_load_factor: f32) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Replace the hash function.
    pub fn with_hash_fn(mut self, hash_fn: fn(&K) -> u64) -> Self {
        self.hash_fn = hash_fn;
        self
    }

    /// Replace the key comparison.
    pub fn with_key_eq(mut self, key_eq: fn(&K, &K) -> bool) -> Self {
        self.key_eq = key_eq;
        self
    }

    /// Check the configuration without building a map.
    pub fn validate(&self) -> MapResult<()> {
        if !(self.max_load_factor > 0.0 && self.max_load_factor < 1.0) {
            return Err(MapError::InvalidConfig {
                reason: "max load factor must lie in (0, 1)",
            });
        }
        if self.capacity == 0 {
            return Err(MapError::InvalidConfig {
                reason: "capacity must be non-zero",
            });
        }
        Ok(())
    }
}

impl<K> Clone for MapConfig<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for MapConfig<K> {}

impl<K> fmt::Debug for MapConfig<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapConfig")
            .field("capacity", &self.capacity)
            .field("max_load_factor", &self.max_load_factor)
            .finish_non_exhaustive()
    }
}

// ============================================================
// Capacity Helpers
// ============================================================

/// Miller-Rabin witnesses; deterministic for every 64-bit input.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

#[inline]
fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (u128::from(a) * u128::from(b) % u128::from(m)) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

fn is_prime(n: usize) -> bool {
    let n = n as u64;
    if n < 2 {
        return false;
    }
    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    WITNESSES.iter().all(|&a| {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            return true;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                return true;
            }
        }
        false
    })
}

/// Smallest prime `>= n` (and `>=` the minimum table size).
///
/// Saturates at the largest prime representable when `n` is near
/// `usize::MAX`.
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(MIN_CAPACITY);
    while !is_prime(candidate) {
        match candidate.checked_add(1) {
            Some(next) => candidate = next,
            None => return prev_prime(usize::MAX),
        }
    }
    candidate
}

fn prev_prime(mut n: usize) -> usize {
    while n > MIN_CAPACITY && !is_prime(n) {
        n -= 1;
    }
    n
}

/// Capacity after one growth step: `capacity * 1.5` rounded up to a prime.
fn grown_capacity(capacity: usize) -> usize {
    next_prime(saturating_size_add(saturating_size_mul(capacity, 3) / 2, 1))
}

/// Most slots the three slot arrays can address for this `K`/`V`.
fn max_slots<K, V>() -> usize {
    let per_slot =
        mem::size_of::<Option<K>>() + mem::size_of::<Option<V>>() + mem::size_of::<bool>();
    isize::MAX as usize / per_slot
}

/// `capacity` if a table that large is addressable at all.
fn addressable<K, V>(capacity: usize) -> MapResult<usize> {
    if capacity > max_slots::<K, V>() {
        return Err(MapError::AllocationFailed {
            requested: capacity,
        });
    }
    Ok(capacity)
}

// ============================================================
// Slot Storage
// ============================================================

struct Slots<K, V> {
    keys: Vec<Option<K>>,
    values: Vec<Option<V>>,
    deleted: Vec<bool>,
}

impl<K, V> Slots<K, V> {
    fn try_alloc(capacity: usize) -> MapResult<Self> {
        let failed = |_| MapError::AllocationFailed {
            requested: capacity,
        };
        let mut keys = Vec::new();
        keys.try_reserve_exact(capacity).map_err(failed)?;
        let mut values = Vec::new();
        values.try_reserve_exact(capacity).map_err(failed)?;
        let mut deleted = Vec::new();
        deleted.try_reserve_exact(capacity).map_err(failed)?;

        keys.resize_with(capacity, || None);
        values.resize_with(capacity, || None);
        deleted.resize(capacity, false);
        Ok(Self {
            keys,
            values,
            deleted,
        })
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.keys.len()
    }
}

/// Double-hashing probe sequence over `capacity` slots.
#[derive(Clone, Copy)]
struct Probe {
    index: u64,
    stride: u64,
    capacity: u64,
}

impl Probe {
    #[inline]
    fn new(hash: u64, capacity: usize) -> Self {
        let capacity = capacity as u64;
        Self {
            index: hash % capacity,
            stride: hash % (capacity - 1) + 1,
            capacity,
        }
    }

    #[inline]
    fn slot(&self) -> usize {
        self.index as usize
    }

    #[inline]
    fn advance(&mut self) {
        self.index = (self.index + self.stride) % self.capacity;
    }
}

/// First unclaimed slot on the probe path of `hash`.
fn first_free(taken: &[bool], hash: u64) -> Option<usize> {
    let mut probe = Probe::new(hash, taken.len());
    for _ in 0..taken.len() {
        if !taken[probe.slot()] {
            return Some(probe.slot());
        }
        probe.advance();
    }
    None
}

// ============================================================
// Hash Map
// ============================================================

/// Open-addressed hash map with double hashing.
///
/// The map owns its keys and values; removing an entry hands the value back
/// and dropping the map drops every remaining entry.
pub struct HashMap<K, V> {
    slots: Slots<K, V>,
    size: usize,
    tombstones: usize,
    max_load_factor: f32,
    hash_fn: fn(&K) -> u64,
    key_eq: fn(&K, &K) -> bool,
}

impl<K: MapKey, V> HashMap<K, V> {
    /// Empty map with the default configuration.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Empty map sized for at least `capacity` slots.
    ///
    /// Falls back to the minimum table size if the allocation fails.
    pub fn with_capacity(capacity: usize) -> Self {
        let config = MapConfig::default().with_capacity(capacity.max(1));
        Self::with_config(config).unwrap_or_else(|err| {
            debug!(%err, "with_capacity: falling back to minimum table");
            Self::empty(MapConfig::default())
        })
    }
}

impl<K: MapKey, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashMap<K, V> {
    /// Build a map from an explicit configuration.
    pub fn with_config(config: MapConfig<K>) -> MapResult<Self> {
        config.validate()?;
        let capacity = addressable::<K, V>(config.capacity)?;
        let slots = Slots::try_alloc(addressable::<K, V>(next_prime(capacity))?)?;
        Ok(Self {
            slots,
            size: 0,
            tombstones: 0,
            max_load_factor: config.max_load_factor,
            hash_fn: config.hash_fn,
            key_eq: config.key_eq,
        })
    }

    fn empty(config: MapConfig<K>) -> Self {
        let mut slots = Slots {
            keys: Vec::new(),
            values: Vec::new(),
            deleted: Vec::new(),
        };
        slots.keys.resize_with(MIN_CAPACITY, || None);
        slots.values.resize_with(MIN_CAPACITY, || None);
        slots.deleted.resize(MIN_CAPACITY, false);
        Self {
            slots,
            size: 0,
            tombstones: 0,
            max_load_factor: config.max_load_factor,
            hash_fn: config.hash_fn,
            key_eq: config.key_eq,
        }
    }

    // ============================================================
    // Queries
    // ============================================================

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.size
    }

    /// True if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of tombstoned slots.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// `(size + tombstones) / capacity`.
    pub fn load_factor(&self) -> f32 {
        (self.size + self.tombstones) as f32 / self.capacity() as f32
    }

    /// Configured maximum load factor.
    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    fn find(&self, key: &K) -> Option<usize> {
        let capacity = self.capacity();
        let mut probe = Probe::new((self.hash_fn)(key), capacity);
        for _ in 0..capacity {
            let i = probe.slot();
            match &self.slots.keys[i] {
                Some(existing) if (self.key_eq)(existing, key) => return Some(i),
                Some(_) => {}
                None if self.slots.deleted[i] => {}
                None => return None,
            }
            probe.advance();
        }
        None
    }

    /// Value bound to `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let i = self.find(key)?;
        self.slots.values[i].as_ref()
    }

    /// Mutable access to the value bound to `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find(key)?;
        self.slots.values[i].as_mut()
    }

    /// True if `key` is bound.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    // ============================================================
    // Mutation
    // ============================================================

    /// First reusable slot on the probe path of `hash`: the first tombstone
    /// seen, or else the empty slot that ends the path.
    fn vacant_slot(slots: &Slots<K, V>, hash: u64) -> Option<usize> {
        let capacity = slots.capacity();
        let mut probe = Probe::new(hash, capacity);
        let mut first_tombstone = None;
        for _ in 0..capacity {
            let i = probe.slot();
            if slots.keys[i].is_none() {
                if !slots.deleted[i] {
                    return Some(first_tombstone.unwrap_or(i));
                }
                first_tombstone.get_or_insert(i);
            }
            probe.advance();
        }
        first_tombstone
    }

    /// Insert or update the binding for `key`.
    ///
    /// Returns the previous value when the key was already bound. Updating
    /// never resizes. On error the map is unchanged and `key`/`value` are
    /// dropped.
    pub fn set(&mut self, key: K, value: V) -> MapResult<Option<V>> {
        if let Some(i) = self.find(&key) {
            return Ok(self.slots.values[i].replace(value));
        }

        self.reserve_one()?;

        let hash = (self.hash_fn)(&key);
        let Some(i) = Self::vacant_slot(&self.slots, hash) else {
            error!(capacity = self.capacity(), size = self.size, "set: probe exhausted");
            return Err(MapError::ProbeExhausted {
                capacity: self.capacity(),
            });
        };
        if self.slots.deleted[i] {
            self.slots.deleted[i] = false;
            self.tombstones -= 1;
        }
        self.slots.keys[i] = Some(key);
        self.slots.values[i] = Some(value);
        self.size += 1;
        Ok(None)
    }

    /// Remove the binding for `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove the binding for `key`, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let i = self.find(key)?;
        let k = self.slots.keys[i].take()?;
        let v = self.slots.values[i].take()?;
        self.slots.deleted[i] = true;
        self.size -= 1;
        self.tombstones += 1;

        if self.size == 0 {
            self.slots.deleted.iter_mut().for_each(|d| *d = false);
            self.tombstones = 0;
        }
        Some((k, v))
    }

    /// Remove every entry, keeping the capacity.
    pub fn clear(&mut self) {
        self.slots.keys.iter_mut().for_each(|k| *k = None);
        self.slots.values.iter_mut().for_each(|v| *v = None);
        self.slots.deleted.iter_mut().for_each(|d| *d = false);
        self.size = 0;
        self.tombstones = 0;
    }

    /// Rebuild so that at least `additional` more entries fit under the load
    /// factor.
    ///
    /// Fails with [`MapError::AllocationFailed`] without touching the map
    /// when the required table cannot be allocated.
    pub fn reserve(&mut self, additional: usize) -> MapResult<()> {
        let needed = saturating_size_add(self.size, additional);
        if !self.exceeds_load(needed) {
            return Ok(());
        }
        // Float-to-int casts saturate, so an impossible target stays huge.
        let target = (needed as f64 / f64::from(self.max_load_factor)).ceil() as usize;
        let target = addressable::<K, V>(saturating_size_add(target, 1))?;
        self.rehash(addressable::<K, V>(next_prime(target))?)
    }

    fn exceeds_load(&self, occupied: usize) -> bool {
        occupied as f64 > self.capacity() as f64 * f64::from(self.max_load_factor)
    }

    /// Tombstones outnumber half the live entries and fill at least an
    /// eighth of the table.
    fn tombstone_heavy(&self) -> bool {
        self.size > 0
            && self.tombstones * 2 > self.size
            && saturating_size_mul(self.tombstones, TOMBSTONE_SHARE) >= self.capacity()
    }

    /// Make room for one more entry.
    ///
    /// Tombstones are reclaimed in place on any insertion once
    /// [`tombstone_heavy`](Self::tombstone_heavy) holds, whatever the load.
    /// Otherwise the table only changes when the insertion would cross the
    /// load threshold, in which case it grows.
    fn reserve_one(&mut self) -> MapResult<()> {
        if self.tombstone_heavy() {
            self.rehash(self.capacity())?;
        }
        let occupied = saturating_size_add(self.size + self.tombstones, 1);
        if !self.exceeds_load(occupied) {
            return Ok(());
        }
        let grown = addressable::<K, V>(grown_capacity(self.capacity()))?;
        self.rehash(grown)
    }

    /// Rebuild the table at `capacity`, dropping all tombstones.
    fn rehash(&mut self, capacity: usize) -> MapResult<()> {
        let old_capacity = self.capacity();
        let mut fresh = Slots::<K, V>::try_alloc(capacity)?;

        // Plan every move first so a failure leaves the old table intact.
        let mut plan: Vec<(usize, usize)> = Vec::new();
        plan.try_reserve_exact(self.size)
            .map_err(|_| MapError::AllocationFailed {
                requested: self.size,
            })?;
        let mut taken = Vec::new();
        taken
            .try_reserve_exact(capacity)
            .map_err(|_| MapError::AllocationFailed {
                requested: capacity,
            })?;
        taken.resize(capacity, false);
        for (from, key) in self.slots.keys.iter().enumerate() {
            let Some(key) = key else { continue };
            let Some(to) = first_free(&taken, (self.hash_fn)(key)) else {
                error!(capacity, size = self.size, "rehash: probe exhausted");
                return Err(MapError::ProbeExhausted { capacity });
            };
            taken[to] = true;
            plan.push((from, to));
        }

        for (from, to) in plan {
            fresh.keys[to] = self.slots.keys[from].take();
            fresh.values[to] = self.slots.values[from].take();
        }

        debug!(
            old_capacity,
            new_capacity = capacity,
            size = self.size,
            tombstones = self.tombstones,
            "hash map rebuilt"
        );
        self.slots = fresh;
        self.tombstones = 0;
        Ok(())
    }

    // ============================================================
    // Iteration
    // ============================================================

    /// Iterate over `(key, value)` pairs in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            keys: self.slots.keys.iter(),
            values: self.slots.values.iter(),
            remaining: self.size,
        }
    }

    /// Iterate over `(key, &mut value)` pairs in slot order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            keys: self.slots.keys.iter(),
            values: self.slots.values.iter_mut(),
            remaining: self.size,
        }
    }

    /// Iterate over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Iterate over the values.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Remove every entry, yielding them in slot order.
    pub fn drain(&mut self) -> IntoIter<K, V> {
        let capacity = self.capacity();
        let slots = mem::replace(
            &mut self.slots,
            Slots {
                keys: Vec::new(),
                values: Vec::new(),
                deleted: Vec::new(),
            },
        );
        let remaining = self.size;
        self.slots.keys.resize_with(capacity, || None);
        self.slots.values.resize_with(capacity, || None);
        self.slots.deleted.resize(capacity, false);
        self.size = 0;
        self.tombstones = 0;
        IntoIter {
            keys: slots.keys.into_iter(),
            values: slots.values.into_iter(),
            remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Clone, V: Clone> Clone for HashMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: Slots {
                keys: self.slots.keys.clone(),
                values: self.slots.values.clone(),
                deleted: self.slots.deleted.clone(),
            },
            size: self.size,
            tombstones: self.tombstones,
            max_load_factor: self.max_load_factor,
            hash_fn: self.hash_fn,
            key_eq: self.key_eq,
        }
    }
}

impl<K, V> Extend<(K, V)> for HashMap<K, V> {
    /// Entries that cannot be stored are dropped and logged.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            if let Err(err) = self.set(k, v) {
                error!(%err, "extend: entry dropped");
            }
        }
    }
}

impl<K: MapKey, V> FromIterator<(K, V)> for HashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut map = Self::with_capacity(lower.max(DEFAULT_CAPACITY));
        map.extend(iter);
        map
    }
}

// ============================================================
// Iterators
// ============================================================

/// Borrowing iterator returned by [`HashMap::iter`].
pub struct Iter<'a, K, V> {
    keys: std::slice::Iter<'a, Option<K>>,
    values: std::slice::Iter<'a, Option<V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (k, v) = (self.keys.next()?, self.values.next()?);
            if let (Some(k), Some(v)) = (k, v) {
                self.remaining -= 1;
                return Some((k, v));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Mutable iterator returned by [`HashMap::iter_mut`].
pub struct IterMut<'a, K, V> {
    keys: std::slice::Iter<'a, Option<K>>,
    values: std::slice::IterMut<'a, Option<V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (k, v) = (self.keys.next()?, self.values.next()?);
            if let (Some(k), Some(v)) = (k, v.as_mut()) {
                self.remaining -= 1;
                return Some((k, v));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// Owning iterator.
pub struct IntoIter<K, V> {
    keys: std::vec::IntoIter<Option<K>>,
    values: std::vec::IntoIter<Option<V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (k, v) = (self.keys.next()?, self.values.next()?);
            if let (Some(k), Some(v)) = (k, v) {
                self.remaining -= 1;
                return Some((k, v));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for HashMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            keys: self.slots.keys.into_iter(),
            values: self.slots.values.into_iter(),
            remaining: self.size,
        }
    }
}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut HashMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}
