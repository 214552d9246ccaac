//! ttlru - A bounded, thread-safe in-memory cache
//!
//! Combines least-recently-used eviction with per-entry time-to-live
//! expiration. Meant to sit in front of an expensive or rate-limited resource.

pub mod cache;
pub mod config;
pub mod error;
pub mod logger;
pub mod metrics;

pub use cache::{CacheStats, CacheStore, StatsSnapshot};
pub use config::{Config, DEFAULT_MAX_SIZE};
pub use error::CacheError;
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use metrics::{Metrics, NoopMetrics};
