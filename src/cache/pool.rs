//! Node Pool Module
//!
//! Arena of entry slots with a free list, so removed entries hand their slot
//! to the next insertion instead of growing the arena.

use super::entry::Entry;

// == Node Handle ==
/// Stable reference to a pooled entry.
///
/// The generation changes every time a slot is reused, so a handle held across
/// a lock release can be checked for staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeRef {
    pub index: usize,
    pub generation: u64,
}

#[derive(Debug)]
struct Slot<K, V> {
    entry: Option<Entry<K, V>>,
    generation: u64,
}

// == Node Pool ==
#[derive(Debug)]
pub(crate) struct NodePool<K, V> {
    slots: Vec<Slot<K, V>>,
    /// Vacant slot indices, reused LIFO
    free: Vec<usize>,
}

impl<K, V> NodePool<K, V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    // == Acquire ==
    /// Stores `entry` in a recycled slot if one is free, otherwise in a new one.
    pub fn acquire(&mut self, entry: Entry<K, V>) -> NodeRef {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.generation = slot.generation.wrapping_add(1);
                slot.entry = Some(entry);
                NodeRef {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len();
                self.slots.push(Slot {
                    entry: Some(entry),
                    generation: 0,
                });
                NodeRef {
                    index,
                    generation: 0,
                }
            }
        }
    }

    // == Release ==
    /// Takes the entry out of its slot and returns the slot to the free list.
    ///
    /// Returns None if the slot was already vacant.
    pub fn release(&mut self, index: usize) -> Option<Entry<K, V>> {
        let entry = self.slots.get_mut(index)?.entry.take()?;
        self.free.push(index);
        Some(entry)
    }

    // == Release All ==
    /// Vacates every occupied slot. Returns how many entries were dropped.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                self.free.push(index);
                released += 1;
            }
        }
        released
    }

    // == Lookup ==
    /// Resolves a handle, failing if the slot is vacant or has been reused.
    pub fn resolve(&self, node: NodeRef) -> Option<&Entry<K, V>> {
        self.slots
            .get(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub fn resolve_mut(&mut self, node: NodeRef) -> Option<&mut Entry<K, V>> {
        self.slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    /// Slot access by raw index, used while walking list links.
    pub fn get(&self, index: usize) -> Option<&Entry<K, V>> {
        self.slots.get(index).and_then(|slot| slot.entry.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(index).and_then(|slot| slot.entry.as_mut())
    }

    /// Current handle for an occupied slot.
    pub fn handle(&self, index: usize) -> Option<NodeRef> {
        let slot = self.slots.get(index)?;
        slot.entry.as_ref().map(|_| NodeRef {
            index,
            generation: slot.generation,
        })
    }

    // == Counters ==
    /// Number of occupied slots.
    pub fn in_use(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of vacant slots waiting for reuse.
    #[cfg(test)]
    pub fn recycled(&self) -> usize {
        self.free.len()
    }

    /// Total number of slots ever allocated.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
