//! Dispatcher metrics for observability
//!
//! Counters for the life of a dispatcher: how many entries were submitted,
//! filtered by severity, discarded while closed, delivered, and how often
//! producers had to wait on a full queue.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatcher observability
///
/// # Example
///
/// ```
/// use rust_logkit::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_submitted();
/// metrics.record_dispatched();
///
/// assert_eq!(metrics.submitted(), 1);
/// assert_eq!(metrics.dispatched(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries accepted into the queue
    submitted: AtomicU64,

    /// Entries rejected by the severity threshold before formatting
    filtered: AtomicU64,

    /// Entries discarded because the dispatcher was closed
    discarded: AtomicU64,

    /// Submits that found the queue full and had to wait
    blocked_submits: AtomicU64,

    /// Entries fanned out to the active targets
    dispatched: AtomicU64,

    /// Per-target delivery failures
    delivery_errors: AtomicU64,

    /// Targets excluded because their `open` failed
    target_open_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            submitted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            blocked_submits: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
            delivery_errors: AtomicU64::new(0),
            target_open_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn blocked_submits(&self) -> u64 {
        self.blocked_submits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivery_errors(&self) -> u64 {
        self.delivery_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn target_open_failures(&self) -> u64 {
        self.target_open_failures.load(Ordering::Relaxed)
    }

    /// Record an entry accepted into the queue
    #[inline]
    pub fn record_submitted(&self) -> u64 {
        self.submitted.fetch_add(1, Ordering::Relaxed)
    }

    /// Record an entry below the severity threshold
    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    /// Record an entry discarded on a closed dispatcher
    #[inline]
    pub fn record_discarded(&self) -> u64 {
        self.discarded.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a submit that waited for queue space
    #[inline]
    pub fn record_blocked_submit(&self) -> u64 {
        self.blocked_submits.fetch_add(1, Ordering::Relaxed)
    }

    /// Record an entry fanned out to the targets
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed delivery to one target
    #[inline]
    pub fn record_delivery_error(&self) -> u64 {
        self.delivery_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a target that failed to open
    #[inline]
    pub fn record_target_open_failure(&self) -> u64 {
        self.target_open_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.submitted.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.discarded.store(0, Ordering::Relaxed);
        self.blocked_submits.store(0, Ordering::Relaxed);
        self.dispatched.store(0, Ordering::Relaxed);
        self.delivery_errors.store(0, Ordering::Relaxed);
        self.target_open_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            submitted: AtomicU64::new(self.submitted()),
            filtered: AtomicU64::new(self.filtered()),
            discarded: AtomicU64::new(self.discarded()),
            blocked_submits: AtomicU64::new(self.blocked_submits()),
            dispatched: AtomicU64::new(self.dispatched()),
            delivery_errors: AtomicU64::new(self.delivery_errors()),
            target_open_failures: AtomicU64::new(self.target_open_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.submitted(), 0);
        assert_eq!(metrics.filtered(), 0);
        assert_eq!(metrics.discarded(), 0);
        assert_eq!(metrics.blocked_submits(), 0);
        assert_eq!(metrics.dispatched(), 0);
        assert_eq!(metrics.delivery_errors(), 0);
        assert_eq!(metrics.target_open_failures(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_submitted(), 0);
        assert_eq!(metrics.record_submitted(), 1);
        assert_eq!(metrics.submitted(), 2);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_filtered();
        metrics.record_discarded();
        metrics.record_delivery_error();

        metrics.reset();

        assert_eq!(metrics.filtered(), 0);
        assert_eq!(metrics.discarded(), 0);
        assert_eq!(metrics.delivery_errors(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_dispatched();

        let snapshot = metrics.clone();
        metrics.record_dispatched();

        assert_eq!(snapshot.dispatched(), 1);
        assert_eq!(metrics.dispatched(), 2);
    }
}
