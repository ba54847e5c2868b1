//! Dispatch core
//!
//! A [`Dispatcher`] owns a bounded entry queue and exactly one worker thread.
//! The worker fans every entry out to the active targets synchronously and in
//! registration order, which gives all targets one global delivery order at
//! the cost of isolation: a slow target delays the targets after it.
//!
//! While the dispatcher is open the active targets are owned by the worker
//! thread. Closing pushes [`Dispatch::Drain`] behind the queued entries, joins
//! the worker to get the targets back and then closes each of them, so
//! `close` returns only once everything submitted before it was delivered.

use super::{
    config::DispatcherConfig,
    entry::{Dispatch, Entry},
    error::{LoggerError, Result},
    error_sink::ErrorSink,
    metrics::LoggerMetrics,
    severity::Severity,
    target::Target,
};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// State touched only by `open`, `close` and `add_target`
struct Lifecycle {
    /// Configured targets while closed; empty while the worker owns them
    targets: Vec<Box<dyn Target>>,
    worker: Option<thread::JoinHandle<Vec<Box<dyn Target>>>>,
    active_names: Vec<String>,
}

pub struct Dispatcher {
    config: DispatcherConfig,
    error_sink: Option<ErrorSink>,
    open: AtomicBool,
    lifecycle: Mutex<Lifecycle>,
    /// Producer side of the entry queue; `Some` iff open
    queue: RwLock<Option<Sender<Dispatch>>>,
    metrics: Arc<LoggerMetrics>,
}

impl Dispatcher {
    pub fn new(
        config: DispatcherConfig,
        error_sink: Option<ErrorSink>,
        targets: Vec<Box<dyn Target>>,
    ) -> Self {
        Self {
            config,
            error_sink,
            open: AtomicBool::new(false),
            lifecycle: Mutex::new(Lifecycle {
                targets,
                worker: None,
                active_names: Vec::new(),
            }),
            queue: RwLock::new(None),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn error_sink(&self) -> Option<&ErrorSink> {
        self.error_sink.as_ref()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Whether entries of `severity` pass the configured threshold
    #[inline]
    pub fn accepts(&self, severity: Severity) -> bool {
        severity.is_within(self.config.max_severity)
    }

    /// Names of the targets that opened successfully, in dispatch order
    pub fn active_targets(&self) -> Vec<String> {
        self.lifecycle.lock().active_names.clone()
    }

    /// Register another target; only allowed while closed
    pub fn add_target(&self, target: Box<dyn Target>) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock();
        if self.is_open() {
            return Err(LoggerError::config(
                "Dispatcher",
                format!("cannot add target '{}' while open", target.name()),
            ));
        }
        lifecycle.targets.push(target);
        Ok(())
    }

    /// Open every configured target and start the dispatch worker
    ///
    /// A target whose `open` fails is reported to the error sink and dropped;
    /// the dispatcher still opens. Calling `open` on an open dispatcher does
    /// nothing.
    ///
    /// # Errors
    ///
    /// [`LoggerError::InvalidConfiguration`] when no error sink is configured.
    pub fn open(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock();
        if self.is_open() {
            return Ok(());
        }

        let errors = self
            .error_sink
            .clone()
            .ok_or_else(|| LoggerError::config("Dispatcher", "an error sink must be set"))?;

        let (sender, receiver) = bounded(self.config.buffer_size);

        let configured = std::mem::take(&mut lifecycle.targets);
        let mut active = Vec::with_capacity(configured.len());
        for mut target in configured {
            match target.open(&errors) {
                Ok(()) => active.push(target),
                Err(e) => {
                    let error = match e {
                        e @ LoggerError::TargetOpen { .. } => e,
                        other => LoggerError::target_open(target.name(), other.to_string()),
                    };
                    self.metrics.record_target_open_failure();
                    errors.report(&error);
                }
            }
        }
        lifecycle.active_names = active.iter().map(|t| t.name().to_string()).collect();

        // Targets reach the worker only once it exists, so a failed spawn leaves them with us.
        let (handoff, targets) = bounded::<Vec<Box<dyn Target>>>(1);
        let metrics = Arc::clone(&self.metrics);
        let spawned = thread::Builder::new()
            .name("logkit-dispatch".to_string())
            .spawn(move || {
                let targets = targets.recv().unwrap_or_default();
                run(receiver, targets, errors, metrics)
            });
        let worker = match spawned {
            Ok(worker) => worker,
            Err(e) => {
                shelve(&mut lifecycle, active);
                return Err(LoggerError::io_operation(
                    "starting dispatch worker",
                    "thread spawn failed",
                    e,
                ));
            }
        };
        if let Err(returned) = handoff.send(active) {
            shelve(&mut lifecycle, returned.into_inner());
            let _ = worker.join();
            return Err(LoggerError::config("Dispatcher", "dispatch worker exited during start"));
        }

        lifecycle.worker = Some(worker);
        *self.queue.write() = Some(sender);
        self.open.store(true, Ordering::Release);
        Ok(())
    }

    /// Queue an entry for delivery
    ///
    /// Discarded silently when closed. Blocks while the queue is full.
    pub fn submit(&self, entry: Entry) {
        if !self.is_open() {
            self.metrics.record_discarded();
            return;
        }

        // Held across a blocking send so `close` cannot push Drain ahead of us.
        let queue = self.queue.read();
        let Some(sender) = queue.as_ref() else {
            self.metrics.record_discarded();
            return;
        };

        let sent = match sender.try_send(Dispatch::Entry(Arc::new(entry))) {
            Ok(()) => true,
            Err(TrySendError::Full(dispatch)) => {
                self.metrics.record_blocked_submit();
                sender.send(dispatch).is_ok()
            }
            Err(TrySendError::Disconnected(_)) => false,
        };

        if sent {
            self.metrics.record_submitted();
        } else {
            self.metrics.record_discarded();
        }
    }

    /// Drain the queue into every target, then close the targets
    ///
    /// Blocks until done; there is no timeout. Closing a closed dispatcher
    /// does nothing.
    pub fn close(&self) {
        let mut lifecycle = self.lifecycle.lock();
        if !self.open.swap(false, Ordering::AcqRel) {
            return;
        }

        let sender = self.queue.write().take();
        if let Some(sender) = sender {
            // The worker holds the receiver until it sees Drain.
            let _ = sender.send(Dispatch::Drain);
        }

        if let Some(worker) = lifecycle.worker.take() {
            match worker.join() {
                Ok(mut targets) => {
                    for target in targets.iter_mut() {
                        target.close();
                    }
                    lifecycle.targets = targets;
                }
                Err(payload) => {
                    if let Some(ref errors) = self.error_sink {
                        errors.report(&LoggerError::delivery(
                            "dispatcher",
                            format!("dispatch worker panicked: {}", panic_message(&*payload)),
                        ));
                    }
                }
            }
        }
        lifecycle.active_names.clear();
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.close();
    }
}

/// Undo a partial open: drain and close the opened targets, keep them configured
fn shelve(lifecycle: &mut Lifecycle, mut opened: Vec<Box<dyn Target>>) {
    for target in opened.iter_mut() {
        let _ = target.process(&Dispatch::Drain);
        target.close();
    }
    lifecycle.targets = opened;
    lifecycle.active_names.clear();
}

/// Dispatch worker body; hands the targets back once the stream is drained
fn run(
    receiver: Receiver<Dispatch>,
    mut targets: Vec<Box<dyn Target>>,
    errors: ErrorSink,
    metrics: Arc<LoggerMetrics>,
) -> Vec<Box<dyn Target>> {
    loop {
        let dispatch = receiver.recv().unwrap_or(Dispatch::Drain);
        fan_out(&mut targets, &dispatch, &errors, &metrics);
        if dispatch.is_drain() {
            break;
        }
        metrics.record_dispatched();
    }
    targets
}

/// Deliver one item to every target, isolating errors and panics per target
fn fan_out(
    targets: &mut [Box<dyn Target>],
    dispatch: &Dispatch,
    errors: &ErrorSink,
    metrics: &LoggerMetrics,
) {
    for target in targets.iter_mut() {
        let result = panic::catch_unwind(AssertUnwindSafe(|| target.process(dispatch)));
        let error = match result {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e,
            Err(payload) => LoggerError::delivery(
                target.name(),
                format!("target panicked: {}", panic_message(&*payload)),
            ),
        };
        metrics.record_delivery_error();
        errors.report(&error);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
