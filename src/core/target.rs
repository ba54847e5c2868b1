//! Target trait for log output destinations

use super::{entry::Dispatch, error::Result, error_sink::ErrorSink};

/// A log destination
///
/// Lifecycle is `open` → `process`* → `close`. `open` is called once by the
/// dispatcher before any entry is delivered; `process` is called only from
/// the single dispatch worker, in submission order, and is always followed
/// by exactly one [`Dispatch::Drain`] before `close`.
///
/// `process` must not block indefinitely: a stalled target stalls every
/// target registered after it. Targets with unbounded I/O latency should hand
/// entries to a private worker (see [`NetworkTarget`](crate::targets::NetworkTarget)).
pub trait Target: Send {
    /// Acquire resources. An error excludes this target from dispatch.
    fn open(&mut self, errors: &ErrorSink) -> Result<()>;

    /// Deliver one entry, or acknowledge the end of the stream.
    ///
    /// An error drops the entry for this target only; it is reported to the
    /// error sink and dispatch continues.
    fn process(&mut self, dispatch: &Dispatch) -> Result<()>;

    /// Release resources once the drain has completed. Never fails.
    fn close(&mut self);

    fn name(&self) -> &str;
}
