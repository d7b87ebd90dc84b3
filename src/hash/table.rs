//! A multiset-valued hash table with a pluggable collision strategy.
//!
//! Grounded in the teacher's `src/categories/index/hash_index.rs`, which
//! also buckets by `hash(key) % capacity`, tracks load factor, and doubles
//! capacity on growth. Two differences from that teacher module, both
//! driven by this crate's own contract: buckets here hold a *multiset* of
//! values per key (duplicate join keys are legal and must all survive), and
//! the linear-probing strategy probes strictly to an empty-or-matching slot
//! rather than ever overwriting a slot that holds a different key — the
//! original C++ `CustomHashTable` this crate's algorithms are otherwise
//! faithful to does exactly that overwrite, silently dropping a colliding
//! key's entry, which is the bug this rewrite does not reproduce.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::mem::size_of;

const LOAD_FACTOR_THRESHOLD: f64 = 0.75;

/// Which collision-resolution scheme a [`HashTable`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionStrategy {
    /// Each slot owns a growable chain of distinct-key entries.
    Chaining,
    /// Collisions probe forward, wrapping, to the next empty or matching slot.
    LinearProbing,
}

/// A point-in-time snapshot of a table's occupancy and collision behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashTableStats {
    /// Current slot count (capacity).
    pub total_buckets: usize,
    /// Distinct occupied slot positions.
    pub used_buckets: usize,
    /// Total values stored, counting duplicate keys individually.
    pub total_entries: usize,
    /// Cumulative insertions that landed on a non-empty slot holding a
    /// different key (chaining: new chain nodes; probing: probe steps
    /// taken past the initial slot).
    pub collisions: usize,
    /// `used_buckets / total_buckets`.
    pub load_factor: f64,
    /// `total_entries / used_buckets`, or `0.0` if the table is empty.
    pub avg_chain_length: f64,
    /// The longest chain (chaining) or probe cluster (linear probing).
    pub max_chain_length: usize,
    /// A best-effort byte estimate of the table's heap footprint.
    pub memory_usage: usize,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    key: Value,
    values: Vec<V>,
}

#[derive(Debug, Clone)]
enum Storage<V> {
    Chaining(Vec<Vec<Entry<V>>>),
    LinearProbing(Vec<Option<Entry<V>>>),
}

/// A hash table mapping [`Value`] keys to a multiset of `V` values.
///
/// `H` is any `Fn(&Value) -> u64`; the zero-cost default is
/// [`crate::hash::default_hash`], reached through [`HashTable::with_default_hasher`].
/// A custom hasher is useful for benchmarking collision behavior under a
/// deliberately weak or skewed hash function.
#[derive(Debug, Clone)]
pub struct HashTable<V, H = fn(&Value) -> u64>
where
    H: Fn(&Value) -> u64,
{
    storage: Storage<V>,
    capacity: usize,
    strategy: CollisionStrategy,
    hasher: H,
    len: usize,
    used_buckets: usize,
    collisions: usize,
    stats: HashTableStats,
}

impl<V> HashTable<V, fn(&Value) -> u64> {
    /// Builds a table using [`crate::hash::default_hash`] as its hasher.
    pub fn with_default_hasher(initial_capacity: usize, strategy: CollisionStrategy) -> Self {
        Self::new(initial_capacity, strategy, super::hasher::default_hash)
    }
}

impl<V, H: Fn(&Value) -> u64> HashTable<V, H> {
    /// Builds an empty table with the given initial capacity, strategy, and hasher.
    ///
    /// `initial_capacity` is floored at `1` so the modulo in slot indexing
    /// never divides by zero.
    pub fn new(initial_capacity: usize, strategy: CollisionStrategy, hasher: H) -> Self {
        let capacity = initial_capacity.max(1);
        let mut table = Self {
            storage: Self::empty_storage(capacity, strategy),
            capacity,
            strategy,
            hasher,
            len: 0,
            used_buckets: 0,
            collisions: 0,
            stats: HashTableStats::default(),
        };
        table.refresh_stats();
        table
    }

    fn empty_storage(capacity: usize, strategy: CollisionStrategy) -> Storage<V> {
        match strategy {
            CollisionStrategy::Chaining => Storage::Chaining(vec![Vec::new(); capacity]),
            CollisionStrategy::LinearProbing => {
                Storage::LinearProbing((0..capacity).map(|_| None).collect())
            }
        }
    }

    fn slot_index(&self, key: &Value, capacity: usize) -> usize {
        (self.hasher)(key) as usize % capacity
    }

    fn would_exceed_load_factor(&self) -> bool {
        (self.used_buckets + 1) as f64 / self.capacity as f64 > LOAD_FACTOR_THRESHOLD
    }

    /// Inserts `value` under `key`. Never fails: a second insert under an
    /// existing key appends to that key's multiset rather than replacing it.
    pub fn insert(&mut self, key: Value, value: V) {
        match self.strategy {
            CollisionStrategy::Chaining => self.insert_chaining(key, value),
            CollisionStrategy::LinearProbing => self.insert_probing(key, value),
        }
        self.refresh_stats();
    }

    fn chaining_buckets_mut(&mut self) -> &mut Vec<Vec<Entry<V>>> {
        match &mut self.storage {
            Storage::Chaining(buckets) => buckets,
            Storage::LinearProbing(_) => unreachable!("strategy mismatch"),
        }
    }

    fn insert_chaining(&mut self, key: Value, value: V) {
        loop {
            let idx = self.slot_index(&key, self.capacity);
            let is_new_slot = self.chaining_buckets_mut()[idx].is_empty();
            if is_new_slot {
                if self.would_exceed_load_factor() {
                    self.resize();
                    continue;
                }
                self.chaining_buckets_mut()[idx].push(Entry {
                    key,
                    values: vec![value],
                });
                self.used_buckets += 1;
                self.len += 1;
                return;
            }
            let bucket = &mut self.chaining_buckets_mut()[idx];
            match bucket.iter_mut().find(|e| e.key == key) {
                Some(entry) => entry.values.push(value),
                None => {
                    bucket.push(Entry {
                        key,
                        values: vec![value],
                    });
                    self.collisions += 1;
                }
            }
            self.len += 1;
            return;
        }
    }

    fn probing_slots(&self) -> &Vec<Option<Entry<V>>> {
        match &self.storage {
            Storage::LinearProbing(slots) => slots,
            Storage::Chaining(_) => unreachable!("strategy mismatch"),
        }
    }

    fn probing_slots_mut(&mut self) -> &mut Vec<Option<Entry<V>>> {
        match &mut self.storage {
            Storage::LinearProbing(slots) => slots,
            Storage::Chaining(_) => unreachable!("strategy mismatch"),
        }
    }

    /// Scans forward from `key`'s home slot for an empty slot or one holding
    /// an equal key, wrapping around the table at most once. Returns the
    /// landing position and whether it already holds `key`.
    fn probe_land(&self, key: &Value) -> (usize, bool) {
        let slots = self.probing_slots();
        let start = self.slot_index(key, self.capacity);
        for step in 0..self.capacity {
            let pos = (start + step) % self.capacity;
            match &slots[pos] {
                None => return (pos, false),
                Some(e) if e.key == *key => return (pos, true),
                Some(_) => continue,
            }
        }
        unreachable!("linear probing keeps load factor below 1.0 at all times")
    }

    fn insert_probing(&mut self, key: Value, value: V) {
        loop {
            let (pos, hit) = self.probe_land(&key);
            if hit {
                if let Some(entry) = &mut self.probing_slots_mut()[pos] {
                    entry.values.push(value);
                }
                self.len += 1;
                return;
            }
            if self.would_exceed_load_factor() {
                self.resize();
                continue;
            }
            let start = self.slot_index(&key, self.capacity);
            let steps = if pos >= start {
                pos - start
            } else {
                pos + self.capacity - start
            };
            self.collisions += steps;
            self.probing_slots_mut()[pos] = Some(Entry {
                key,
                values: vec![value],
            });
            self.used_buckets += 1;
            self.len += 1;
            return;
        }
    }

    /// The values stored under `key`, in insertion order; empty if absent.
    pub fn find(&self, key: &Value) -> Vec<V>
    where
        V: Clone,
    {
        match &self.storage {
            Storage::Chaining(buckets) => {
                let idx = self.slot_index(key, self.capacity);
                buckets[idx]
                    .iter()
                    .find(|e| e.key == *key)
                    .map(|e| e.values.clone())
                    .unwrap_or_default()
            }
            Storage::LinearProbing(_) => {
                let (pos, hit) = self.probe_land(key);
                if hit {
                    self.probing_slots()[pos]
                        .as_ref()
                        .map(|e| e.values.clone())
                        .unwrap_or_default()
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// True if `key` has at least one stored value.
    pub fn contains(&self, key: &Value) -> bool
    where
        V: Clone,
    {
        !self.find(key).is_empty()
    }

    /// Drops every entry, keeping the table's current capacity and strategy.
    pub fn clear(&mut self) {
        self.storage = Self::empty_storage(self.capacity, self.strategy);
        self.len = 0;
        self.used_buckets = 0;
        self.collisions = 0;
        self.refresh_stats();
    }

    /// Total values stored, counting duplicate keys individually.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A snapshot of the table's current occupancy and collision counters.
    pub fn stats(&self) -> &HashTableStats {
        &self.stats
    }

    fn drain_entries(&mut self) -> Vec<(Value, Vec<V>)> {
        match &mut self.storage {
            Storage::Chaining(buckets) => buckets
                .drain(..)
                .flatten()
                .map(|e| (e.key, e.values))
                .collect(),
            Storage::LinearProbing(slots) => slots
                .drain(..)
                .flatten()
                .map(|e| (e.key, e.values))
                .collect(),
        }
    }

    /// Doubles capacity and rehashes every stored entry, preserving each
    /// key's value order. `find` returns identical sequences before and
    /// after a resize for every previously-inserted key.
    fn resize(&mut self) {
        let entries = self.drain_entries();
        self.capacity *= 2;
        self.storage = Self::empty_storage(self.capacity, self.strategy);
        self.used_buckets = 0;
        self.collisions = 0;
        self.len = 0;
        for (key, values) in entries {
            for value in values {
                self.insert(key.clone(), value);
            }
        }
        log::debug!("hash table resized to capacity {}", self.capacity);
    }

    fn max_cluster_length(&self) -> usize {
        match &self.storage {
            Storage::Chaining(buckets) => buckets.iter().map(|b| b.len()).max().unwrap_or(0),
            Storage::LinearProbing(slots) => {
                let n = slots.len();
                if n == 0 {
                    return 0;
                }
                let Some(start) = slots.iter().position(|s| s.is_none()) else {
                    return n;
                };
                let mut max_run = 0;
                let mut current = 0;
                for i in 0..n {
                    let idx = (start + i) % n;
                    if slots[idx].is_some() {
                        current += 1;
                        max_run = max_run.max(current);
                    } else {
                        current = 0;
                    }
                }
                max_run
            }
        }
    }

    fn estimate_memory_usage(&self) -> usize {
        let mut total = size_of::<Self>();
        let text_capacity = |key: &Value| match key {
            Value::Text(s) => s.capacity(),
            _ => 0,
        };
        match &self.storage {
            Storage::Chaining(buckets) => {
                total += buckets.capacity() * size_of::<Vec<Entry<V>>>();
                for bucket in buckets {
                    total += bucket.capacity() * size_of::<Entry<V>>();
                    for entry in bucket {
                        total += entry.values.capacity() * size_of::<V>();
                        total += text_capacity(&entry.key);
                    }
                }
            }
            Storage::LinearProbing(slots) => {
                total += slots.capacity() * size_of::<Option<Entry<V>>>();
                for entry in slots.iter().flatten() {
                    total += entry.values.capacity() * size_of::<V>();
                    total += text_capacity(&entry.key);
                }
            }
        }
        total
    }

    fn refresh_stats(&mut self) {
        let load_factor = self.used_buckets as f64 / self.capacity as f64;
        let avg_chain_length = if self.used_buckets > 0 {
            self.len as f64 / self.used_buckets as f64
        } else {
            0.0
        };
        self.stats = HashTableStats {
            total_buckets: self.capacity,
            used_buckets: self.used_buckets,
            total_entries: self.len,
            collisions: self.collisions,
            load_factor,
            avg_chain_length,
            max_chain_length: self.max_cluster_length(),
            memory_usage: self.estimate_memory_usage(),
        };
    }
}
