//! Error types for the cache engine
//!
//! The engine never hands errors to its callers: a lookup that finds nothing is
//! an ordinary miss. The variants below describe internal consistency
//! violations, which are reported to the configured [`Logger`](crate::Logger)
//! and counted through [`Metrics::error`](crate::Metrics::error) before the
//! structure heals itself.

use thiserror::Error;

// == Cache Error Enum ==
/// Internal consistency violation detected by the cache.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// An index entry points at a node that is no longer live
    #[error("Inconsistency in the cache structure: index entry refers to a missing node")]
    MissingNode,

    /// A removal would have made the live entry count negative
    #[error("Inconsistency in the cache structure: more entries removed than were counted")]
    SizeUnderflow,

    /// The live entry count claims entries the recency list does not hold
    #[error("Inconsistency in the cache structure: live entry count exceeds the linked entries")]
    CountMismatch,

    /// The recency list holds a node that the index does not reference
    #[error("Inconsistency in the cache structure: recency list node is not indexed")]
    OrphanNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_violation() {
        assert!(CacheError::MissingNode.to_string().contains("missing node"));
        assert!(CacheError::SizeUnderflow.to_string().contains("more entries removed"));
        assert!(CacheError::OrphanNode.to_string().contains("not indexed"));
        assert!(CacheError::CountMismatch.to_string().contains("exceeds the linked"));
    }
}
