//! LRU List Module
//!
//! Intrusive doubly linked recency list over the node pool.

use super::entry::Entry;
use super::pool::{NodePool, NodeRef};

// == Recency List ==
/// Orders pooled entries by access time.
///
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Links are slot indices stored on the entries themselves, so every relink is
/// constant time.
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
    pool: NodePool<K, V>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            pool: NodePool::new(),
            head: None,
            tail: None,
        }
    }

    #[cfg(test)]
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    #[cfg(test)]
    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    pub fn get(&self, node: NodeRef) -> Option<&Entry<K, V>> {
        self.pool.resolve(node)
    }

    pub fn get_mut(&mut self, node: NodeRef) -> Option<&mut Entry<K, V>> {
        self.pool.resolve_mut(node)
    }

    /// Whether `node` is already the most recently used entry.
    pub fn is_head(&self, node: NodeRef) -> bool {
        self.head == Some(node.index)
    }

    // == Push Front ==
    /// Links a new entry in as the most recently used one.
    pub fn push_front(&mut self, mut entry: Entry<K, V>) -> NodeRef {
        entry.prev = None;
        entry.next = self.head;
        let node = self.pool.acquire(entry);

        match self.head.and_then(|index| self.pool.get_mut(index)) {
            Some(old_head) => old_head.prev = Some(node.index),
            // List was empty, the new entry is also the tail
            None => self.tail = Some(node.index),
        }
        self.head = Some(node.index);
        node
    }

    // == Unlink ==
    /// Detaches a slot from its neighbours, fixing head/tail as needed.
    fn unlink(&mut self, index: usize) {
        let Some(entry) = self.pool.get_mut(index) else {
            return;
        };
        let prev = entry.prev.take();
        let next = entry.next.take();

        match prev.and_then(|p| self.pool.get_mut(p)) {
            Some(prev_entry) => prev_entry.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.pool.get_mut(n)) {
            Some(next_entry) => next_entry.prev = prev,
            None => self.tail = prev,
        }
    }

    // == Move To Front ==
    /// Marks an entry as most recently used.
    ///
    /// No-op when the entry is already the head, which covers the sole-entry
    /// case. Returns false if the handle is stale.
    pub fn move_to_front(&mut self, node: NodeRef) -> bool {
        if self.pool.resolve(node).is_none() {
            return false;
        }
        if self.is_head(node) {
            return true;
        }

        self.unlink(node.index);
        let old_head = self.head;
        if let Some(entry) = self.pool.get_mut(node.index) {
            entry.next = old_head;
        }
        match old_head.and_then(|index| self.pool.get_mut(index)) {
            Some(head_entry) => head_entry.prev = Some(node.index),
            None => self.tail = Some(node.index),
        }
        self.head = Some(node.index);
        true
    }

    // == Remove ==
    /// Unlinks an entry and returns its slot to the pool.
    pub fn remove(&mut self, node: NodeRef) -> Option<Entry<K, V>> {
        self.pool.resolve(node)?;
        self.unlink(node.index);
        self.pool.release(node.index)
    }

    // == Pop Back ==
    /// Removes the least recently used entry.
    ///
    /// Returns the handle it was stored under along with the entry.
    pub fn pop_back(&mut self) -> Option<(NodeRef, Entry<K, V>)> {
        let node = self.tail.and_then(|index| self.pool.handle(index))?;
        self.remove(node).map(|entry| (node, entry))
    }

    // == Drain ==
    /// Removes every entry, recycling all slots. Returns how many were removed.
    ///
    /// Works slot by slot rather than by following links, so entries cut off
    /// from the list by a broken link are recycled too.
    pub fn drain(&mut self) -> usize {
        self.head = None;
        self.tail = None;
        self.pool.release_all()
    }

    // == Iterate ==
    /// Walks entries from most to least recently used.
    ///
    /// The walk is bounded by the number of live slots so a corrupted link can
    /// never make it loop.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> + '_ {
        let mut cursor = self.head;
        let mut remaining = self.pool.in_use();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let entry = self.pool.get(cursor?)?;
            cursor = entry.next;
            Some(entry)
        })
    }

    // == Length ==
    /// Returns the number of linked entries.
    pub fn len(&self) -> usize {
        self.pool.in_use()
    }

    #[cfg(test)]
    pub fn pool(&self) -> &NodePool<K, V> {
        &self.pool
    }

    #[cfg(test)]
    pub fn get_index(&self, index: usize) -> Option<&Entry<K, V>> {
        self.pool.get(index)
    }
}
