//! Background-thread sink decorator
//!
//! `AsyncSink` hands records to a worker thread over a bounded channel so
//! the logging thread never waits on the wrapped sink's I/O. When the queue
//! is full the record is rejected with [`LoggerError::QueueFull`], which the
//! logger turns into a `false` return.

use crate::core::{LogEntry, LogLevel, LoggerError, LoggerMetrics, Result, Sink};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for draining the queue (5 seconds)
///
/// Used when the sink is dropped without explicit shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const BATCH_SIZE: usize = 50;
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// State shared with the worker thread
struct Shared {
    inner: Box<dyn Sink>,
    metrics: LoggerMetrics,
    /// Entries queued or being written
    pending: AtomicUsize,
}

pub struct AsyncSink {
    shared: Arc<Shared>,
    capacity: usize,
    sender: RwLock<Option<Sender<LogEntry>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl AsyncSink {
    /// Wrap `inner` with a queue of `capacity` entries
    pub fn new<S: Sink + 'static>(inner: S, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        let shared = Arc::new(Shared {
            inner: Box::new(inner),
            metrics: LoggerMetrics::new(),
            pending: AtomicUsize::new(0),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("async-sink".to_string())
            .spawn(move || Self::run_worker(&worker_shared, receiver))
            .ok();

        if handle.is_none() {
            eprintln!("[LOGGER ERROR] Failed to spawn async sink worker; records will be rejected");
        }

        Self {
            shared,
            capacity,
            sender: RwLock::new(handle.as_ref().map(|_| sender)),
            worker: Mutex::new(handle),
        }
    }

    /// Worker-side write counters (emitted, failed)
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries queued or in flight
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    fn run_worker(shared: &Shared, receiver: Receiver<LogEntry>) {
        let mut batch = Vec::with_capacity(BATCH_SIZE);

        // Blocks for the first entry; ends once every sender is gone and
        // the queue is drained
        while let Ok(entry) = receiver.recv() {
            batch.push(entry);
            while batch.len() < BATCH_SIZE {
                match receiver.try_recv() {
                    Ok(entry) => batch.push(entry),
                    Err(_) => break,
                }
            }

            Self::write_batch(shared, &batch);
            shared.pending.fetch_sub(batch.len(), Ordering::AcqRel);
            batch.clear();
        }
    }

    fn write_batch(shared: &Shared, batch: &[LogEntry]) {
        for entry in batch {
            let result = catch_unwind(AssertUnwindSafe(|| shared.inner.emit(entry)));
            match result {
                Ok(Ok(())) => {
                    shared.metrics.record_emitted();
                }
                Ok(Err(e)) => {
                    shared.metrics.record_failed();
                    eprintln!("[LOGGER ERROR] Sink '{}' failed (async): {}", shared.inner.name(), e);
                }
                Err(_) => {
                    shared.metrics.record_failed();
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' panicked (async). Worker continues.",
                        shared.inner.name()
                    );
                }
            }
        }

        if let Err(e) = shared.inner.flush() {
            eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", shared.inner.name(), e);
        }
    }

    /// Wait until the queue is drained or `timeout` passes
    fn wait_idle(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        while self.pending() > 0 {
            if start.elapsed() >= timeout {
                return false;
            }
            thread::sleep(POLL_INTERVAL);
        }
        true
    }

    /// Stop accepting records, drain the queue and join the worker
    ///
    /// Returns `true` if the worker finished within `timeout`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        // Closing the channel lets the worker exit after draining
        drop(self.sender.write().take());

        let Some(handle) = self.worker.lock().take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if handle.join().is_err() {
                    eprintln!("[LOGGER ERROR] Async sink worker panicked during shutdown");
                    return false;
                }
                break;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Async sink worker did not finish within {:?}. \
                     Some records may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }

        if let Err(e) = self.shared.inner.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            return false;
        }
        true
    }
}

impl Sink for AsyncSink {
    fn is_level_enabled(&self, level: LogLevel) -> bool {
        self.shared.inner.is_level_enabled(level)
    }

    fn emit(&self, entry: &LogEntry) -> Result<()> {
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            return Err(LoggerError::sink_stopped(self.name()));
        };

        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        match sender.try_send(entry.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                Err(LoggerError::queue_full(sender.len(), self.capacity))
            }
            Err(TrySendError::Disconnected(_)) => {
                self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                Err(LoggerError::sink_stopped(self.name()))
            }
        }
    }

    /// Wait for queued records (up to the shutdown timeout), then flush
    fn flush(&self) -> Result<()> {
        if !self.wait_idle(DEFAULT_SHUTDOWN_TIMEOUT) {
            return Err(LoggerError::sink(
                self.name(),
                format!("{} records still queued after flush timeout", self.pending()),
            ));
        }
        self.shared.inner.flush()
    }

    fn name(&self) -> &str {
        "async"
    }
}

impl Drop for AsyncSink {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}
