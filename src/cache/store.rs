//! Cache Store Module
//!
//! Main cache engine combining a hash index with the pooled recency list and
//! lazy TTL expiration, guarded by a single reader/writer lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::cache::entry::{deadline, Entry};
use crate::cache::lru::RecencyList;
use crate::cache::pool::NodeRef;
use crate::config::Config;
use crate::error::CacheError;
use crate::logger::Logger;
use crate::metrics::Metrics;

/// Upper bound on the index capacity reserved up front.
const MAX_PREALLOCATION: usize = 1 << 16;

// == Locked State ==
/// Everything the lock protects.
struct Inner<K, V> {
    /// Key to node handle
    index: HashMap<K, NodeRef>,
    /// Recency order plus the recycled node storage
    list: RecencyList<K, V>,
    /// Number of live mappings
    size: usize,
}

/// Outcome of the shared-lock phase of `get`.
enum Lookup<V> {
    Absent,
    Dangling,
    Expired(NodeRef),
    Live {
        value: V,
        node: NodeRef,
        reposition: bool,
    },
}

// == Cache Store ==
/// Bounded, thread-safe cache with LRU eviction and per-entry TTL.
///
/// Expired entries are never swept in the background; they are removed the
/// next time they are looked up or overwritten, on capacity eviction, or on
/// [`reset`](Self::reset).
///
/// ```
/// use std::time::Duration;
/// use ttlru::CacheStore;
///
/// let cache = CacheStore::new();
/// cache.set("answer", 42, Duration::from_secs(60));
/// assert_eq!(cache.get("answer"), Some(42));
/// assert!(cache.delete("answer"));
/// assert_eq!(cache.get("answer"), None);
/// ```
pub struct CacheStore<K, V> {
    inner: RwLock<Inner<K, V>>,
    max_size: usize,
    metrics: Arc<dyn Metrics>,
    logger: Arc<dyn Logger>,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a cache from `config`.
    pub fn with_config(config: Config) -> Self {
        let (max_size, metrics, logger) = config.into_parts();
        Self {
            inner: RwLock::new(Inner {
                index: Self::fresh_index(max_size),
                list: RecencyList::new(),
                size: 0,
            }),
            max_size,
            metrics,
            logger,
        }
    }

    fn fresh_index(max_size: usize) -> HashMap<K, NodeRef> {
        HashMap::with_capacity(max_size.min(MAX_PREALLOCATION))
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit moves the entry to the most recently used position. An expired
    /// entry is removed and reported as a miss.
    ///
    /// The lookup runs under the shared lock. Only when the entry must be
    /// repositioned or removed is the lock released and taken exclusively,
    /// after which the entry is revalidated: if it was removed or refreshed in
    /// between, the mutation is skipped.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();

        let lookup = {
            let inner = self.inner.read();
            match inner.index.get(key) {
                None => Lookup::Absent,
                Some(&node) => match inner.list.get(node) {
                    None => Lookup::Dangling,
                    Some(entry) if entry.is_expired_at(now) => Lookup::Expired(node),
                    Some(entry) => Lookup::Live {
                        value: entry.value.clone(),
                        node,
                        reposition: !inner.list.is_head(node),
                    },
                },
            }
        };

        match lookup {
            Lookup::Absent => {
                self.metrics.miss();
                None
            }
            Lookup::Dangling => {
                {
                    let mut guard = self.inner.write();
                    let inner = &mut *guard;
                    let still_dangling = inner
                        .index
                        .get(key)
                        .is_some_and(|&node| inner.list.get(node).is_none());
                    if still_dangling {
                        self.report(CacheError::MissingNode);
                        inner.index.remove(key);
                        self.shrink(inner);
                    }
                }
                self.metrics.miss();
                None
            }
            Lookup::Expired(node) => {
                let removed = {
                    let mut guard = self.inner.write();
                    self.remove_expired(&mut guard, key, node, now)
                };
                self.metrics.miss();
                if removed {
                    self.metrics.delete();
                    self.metrics.evict();
                }
                None
            }
            Lookup::Live {
                value,
                node,
                reposition,
            } => {
                if reposition {
                    let mut guard = self.inner.write();
                    let inner = &mut *guard;
                    // Skip if the key was deleted or replaced while unlocked
                    if inner.index.get(key) == Some(&node) {
                        inner.list.move_to_front(node);
                    }
                }
                self.metrics.hit();
                Some(value)
            }
        }
    }

    /// Removes an entry found expired during `get`, if it still is.
    fn remove_expired<Q>(
        &self,
        inner: &mut Inner<K, V>,
        key: &Q,
        node: NodeRef,
        now: Instant,
    ) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if inner.index.get(key) != Some(&node) {
            return false;
        }
        // A concurrent set may have refreshed the deadline in place
        let still_expired = inner
            .list
            .get(node)
            .is_some_and(|entry| entry.is_expired_at(now));
        if !still_expired {
            return false;
        }

        inner.index.remove(key);
        inner.list.remove(node);
        self.shrink(inner);
        true
    }

    // == Set ==
    /// Stores a value with the given time-to-live.
    ///
    /// An existing key is refreshed in place. A new key evicts the least
    /// recently used entry first when the cache is full, whether or not that
    /// entry has expired. Either way the key ends up most recently used.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let expires_at = deadline(Instant::now(), ttl);
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        if let Some(&node) = inner.index.get(&key) {
            if let Some(entry) = inner.list.get_mut(node) {
                entry.refresh(value, expires_at);
                inner.list.move_to_front(node);
                drop(guard);
                self.metrics.update();
                return;
            }
            self.report(CacheError::MissingNode);
            inner.index.remove(&key);
            self.shrink(inner);
        }

        while inner.size >= self.max_size {
            if !self.evict_lru(inner) {
                break;
            }
        }

        let node = inner
            .list
            .push_front(Entry::new(key.clone(), value, expires_at));
        inner.index.insert(key, node);
        inner.size += 1;
        drop(guard);
        self.metrics.add();
    }

    /// Removes the tail entry. Returns false when the list is empty.
    fn evict_lru(&self, inner: &mut Inner<K, V>) -> bool {
        let Some((node, entry)) = inner.list.pop_back() else {
            // The count says full but nothing is linked
            self.report(CacheError::CountMismatch);
            inner.size = inner.index.len().min(inner.list.len());
            return false;
        };

        if inner.index.get(&entry.key) == Some(&node) {
            inner.index.remove(&entry.key);
            self.shrink(inner);
            self.metrics.delete();
            self.metrics.evict();
        } else {
            self.report(CacheError::OrphanNode);
        }
        true
    }

    // == Delete ==
    /// Removes a key. Returns true if it was present.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut guard = self.inner.write();
        self.delete_locked(&mut guard, key)
    }

    /// Removes several keys under one lock acquisition.
    ///
    /// Absent keys are ignored. Returns how many keys were removed.
    pub fn delete_all<'a, Q, I>(&self, keys: I) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        let mut guard = self.inner.write();
        keys.into_iter()
            .filter(|key| self.delete_locked(&mut guard, *key))
            .count()
    }

    fn delete_locked<Q>(&self, inner: &mut Inner<K, V>, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(node) = inner.index.remove(key) else {
            return false;
        };
        if inner.list.remove(node).is_none() {
            self.report(CacheError::MissingNode);
        }
        self.shrink(inner);
        self.metrics.delete();
        true
    }

    // == Reset ==
    /// Removes every entry and recycles all nodes.
    pub fn reset(&self) {
        let removed = {
            let mut guard = self.inner.write();
            let inner = &mut *guard;
            let removed = inner.list.drain();
            inner.index = Self::fresh_index(self.max_size);
            inner.size = 0;
            removed
        };
        for _ in 0..removed {
            self.metrics.delete();
        }
    }

    // == Inspection ==
    /// Returns the number of live entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.inner.read().size
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the capacity ceiling.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the keys from most to least recently used.
    ///
    /// Does not reposition anything or emit metrics.
    pub fn keys(&self) -> Vec<K> {
        self.inner
            .read()
            .list
            .iter()
            .map(|entry| entry.key.clone())
            .collect()
    }

    // == Consistency ==
    /// Decrements the live count, clamping at zero.
    fn shrink(&self, inner: &mut Inner<K, V>) {
        match inner.size.checked_sub(1) {
            Some(size) => inner.size = size,
            None => self.report(CacheError::SizeUnderflow),
        }
    }

    fn report(&self, issue: CacheError) {
        self.logger.warning(&issue);
        self.metrics.error();
    }
}

impl<K, V> Default for CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for CacheStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("max_size", &self.max_size)
            .field("size", &self.inner.read().size)
            .finish_non_exhaustive()
    }
}

// == Test Support ==
#[cfg(test)]
impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: Clone,
{
    /// Walks the structure and panics if any invariant is broken.
    pub(crate) fn assert_consistent(&self) {
        let inner = self.inner.read();
        let list = &inner.list;

        let mut walked = 0;
        let mut prev: Option<usize> = None;
        let mut cursor = list.head();
        while let Some(index) = cursor {
            assert!(walked < list.pool().capacity(), "recency list has a cycle");
            let entry = list.get_index(index).expect("link to vacant slot");
            assert_eq!(entry.prev, prev, "prev link mismatch at {:?}", entry.key);
            let node = list.pool().handle(index).expect("live slot has a handle");
            assert_eq!(
                inner.index.get(&entry.key),
                Some(&node),
                "index does not point at {:?}",
                entry.key
            );
            walked += 1;
            prev = Some(index);
            cursor = entry.next;
        }

        assert_eq!(list.tail(), prev, "tail is not the last walked node");
        assert_eq!(walked, inner.index.len(), "index and list disagree");
        assert_eq!(walked, inner.size, "size counter drifted");
        assert_eq!(walked, list.len(), "pool holds unlinked nodes");
        assert!(inner.size <= self.max_size, "capacity exceeded");
    }

    /// Points `key` at a handle that resolves to nothing.
    pub(crate) fn corrupt_index(&self, key: K) {
        let mut inner = self.inner.write();
        let bogus = NodeRef {
            index: usize::MAX,
            generation: 0,
        };
        if inner.index.insert(key, bogus).is_none() {
            inner.size += 1;
        }
    }

    pub(crate) fn force_size(&self, size: usize) {
        self.inner.write().size = size;
    }

    pub(crate) fn recycled_nodes(&self) -> usize {
        self.inner.read().list.pool().recycled()
    }
}
