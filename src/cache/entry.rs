//! Cache Entry Module
//!
//! Defines a single cache entry: the key/value pair, its expiration deadline,
//! and its links into the recency list.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// One cached mapping plus its position in the recency list.
///
/// `prev` and `next` are slot indices into the owning [`NodePool`](super::pool::NodePool);
/// the entry does not own its neighbours.
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub key: K,
    pub value: V,
    /// Expiration deadline, None = never expires
    pub expires_at: Option<Instant>,
    /// Towards the head (more recently used)
    pub prev: Option<usize>,
    /// Towards the tail (less recently used)
    pub next: Option<usize>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry expiring at `expires_at`.
    pub fn new(key: K, value: V, expires_at: Option<Instant>) -> Self {
        Self {
            key,
            value,
            expires_at,
            prev: None,
            next: None,
        }
    }

    // == Refresh ==
    /// Replaces the value and deadline in place. Links are untouched.
    pub fn refresh(&mut self, value: V, expires_at: Option<Instant>) {
        self.value = value;
        self.expires_at = expires_at;
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches the deadline,
    /// so a zero TTL produces an entry that is already stale.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Computes the deadline for an entry written at `now` with lifetime `ttl`.
///
/// A TTL that overflows the clock means the entry never expires.
pub(crate) fn deadline(now: Instant, ttl: Duration) -> Option<Instant> {
    now.checked_add(ttl)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_is_unlinked() {
        let now = Instant::now();
        let entry = Entry::new("key", 1, deadline(now, Duration::from_secs(60)));

        assert_eq!(entry.key, "key");
        assert_eq!(entry.value, 1);
        assert!(entry.prev.is_none());
        assert!(entry.next.is_none());
        assert!(!entry.is_expired_at(now));
    }

    #[test]
    fn test_entry_expiration() {
        let now = Instant::now();
        let entry = Entry::new("key", 1, deadline(now, Duration::from_secs(1)));

        assert!(!entry.is_expired_at(now + Duration::from_millis(999)));
        assert!(entry.is_expired_at(now + Duration::from_secs(1)));
        assert!(entry.is_expired_at(now + Duration::from_secs(2)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = Entry::new("key", 1, deadline(now, Duration::ZERO));

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
    }

    #[test]
    fn test_overflowing_ttl_never_expires() {
        let now = Instant::now();
        let entry = Entry::new("key", 1, deadline(now, Duration::MAX));

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(now + Duration::from_secs(86_400 * 365)));
    }

    #[test]
    fn test_refresh_replaces_value_and_deadline() {
        let now = Instant::now();
        let mut entry = Entry::new("key", 1, deadline(now, Duration::ZERO));
        entry.prev = Some(3);

        entry.refresh(2, deadline(now, Duration::from_secs(5)));

        assert_eq!(entry.value, 2);
        assert!(!entry.is_expired_at(now));
        assert_eq!(entry.prev, Some(3));
    }
}
