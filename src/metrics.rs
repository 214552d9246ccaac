//! Metrics Sink
//!
//! Telemetry hooks the cache calls on every lookup and mutation.

// == Metrics Trait ==
/// Receives one notification per cache event.
///
/// Implementations must be cheap and must not call back into the cache: some
/// events fire while the cache's lock is held.
///
/// Event pairing:
/// - `add` once per brand-new key, `update` once per in-place refresh
/// - `hit`/`miss` once per `get`, an expired entry counting as a miss
/// - `delete` for every removal; capacity eviction and lazy expiration also
///   fire `evict`
/// - `error` whenever an internal inconsistency is detected
pub trait Metrics: Send + Sync {
    fn hit(&self);
    fn miss(&self);
    fn error(&self);
    fn add(&self);
    fn update(&self);
    fn evict(&self);
    fn delete(&self);
}

// == No-op Metrics ==
/// Metrics sink that discards every event. Used when none is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn hit(&self) {}
    fn miss(&self) {}
    fn error(&self) {}
    fn add(&self) {}
    fn update(&self) {}
    fn evict(&self) {}
    fn delete(&self) {}
}
