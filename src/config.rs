//! Configuration Module
//!
//! Construction-time options for a [`CacheStore`](crate::CacheStore).
//! A configuration is consumed once by the cache and cannot change afterwards.

use std::env;
use std::fmt;
use std::sync::Arc;

use crate::logger::{Logger, NoopLogger};
use crate::metrics::{Metrics, NoopMetrics};

/// Capacity used when none (or zero) is configured.
pub const DEFAULT_MAX_SIZE: usize = 1000;

/// Environment variable read by [`Config::from_env`].
pub const MAX_SIZE_ENV: &str = "TTLRU_MAX_SIZE";

/// Cache configuration.
///
/// Built with chained `with_*` calls:
///
/// ```
/// use std::sync::Arc;
/// use ttlru::{CacheStats, Config, TracingLogger};
///
/// let stats = Arc::new(CacheStats::new());
/// let config = Config::new()
///     .with_max_size(64)
///     .with_metrics(stats.clone())
///     .with_logger(Arc::new(TracingLogger));
/// assert_eq!(config.max_size(), 64);
/// ```
#[derive(Clone)]
pub struct Config {
    max_size: usize,
    metrics: Arc<dyn Metrics>,
    logger: Arc<dyn Logger>,
}

impl Config {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `TTLRU_MAX_SIZE` - Capacity ceiling (default: 1000)
    ///
    /// Sinks are left at their no-op defaults.
    pub fn from_env() -> Self {
        let max_size = env::var(MAX_SIZE_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_SIZE);
        Self::default().with_max_size(max_size)
    }

    /// Sets the capacity ceiling. Zero is replaced by [`DEFAULT_MAX_SIZE`].
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = if max_size == 0 {
            DEFAULT_MAX_SIZE
        } else {
            max_size
        };
        self
    }

    /// Sets the metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Sets the logger used for consistency warnings.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub(crate) fn into_parts(self) -> (usize, Arc<dyn Metrics>, Arc<dyn Logger>) {
        (self.max_size, self.metrics, self.logger)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            metrics: Arc::new(NoopMetrics),
            logger: Arc::new(NoopLogger),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_size(), DEFAULT_MAX_SIZE);
    }

    #[test]
    fn test_with_max_size() {
        let config = Config::new().with_max_size(10);
        assert_eq!(config.max_size(), 10);
    }

    #[test]
    fn test_zero_max_size_falls_back_to_default() {
        let config = Config::new().with_max_size(0);
        assert_eq!(config.max_size(), DEFAULT_MAX_SIZE);
    }

    #[test]
    fn test_with_metrics_shares_sink() {
        let stats = Arc::new(CacheStats::new());
        let config = Config::new().with_metrics(stats.clone());

        let (_, metrics, _) = config.into_parts();
        metrics.hit();
        assert_eq!(stats.snapshot().hits, 1);
    }

    #[test]
    fn test_config_from_env() {
        env::remove_var(MAX_SIZE_ENV);
        assert_eq!(Config::from_env().max_size(), DEFAULT_MAX_SIZE);

        env::set_var(MAX_SIZE_ENV, "42");
        assert_eq!(Config::from_env().max_size(), 42);

        env::set_var(MAX_SIZE_ENV, "not-a-number");
        assert_eq!(Config::from_env().max_size(), DEFAULT_MAX_SIZE);

        env::set_var(MAX_SIZE_ENV, "0");
        assert_eq!(Config::from_env().max_size(), DEFAULT_MAX_SIZE);

        env::remove_var(MAX_SIZE_ENV);
    }

    #[test]
    fn test_debug_shows_max_size() {
        let rendered = format!("{:?}", Config::new().with_max_size(7));
        assert!(rendered.contains("max_size: 7"));
    }
}
