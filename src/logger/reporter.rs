//! Periodic summary logging on a background thread.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::OperationLogger;

/// Handle to a running summary thread.
///
/// ## Example
///
/// ```ignore
/// let logger = OperationLogger::new(&settings.logger);
/// let reporter = logger.start_reporter(settings.logger.summary_interval());
///
/// // ... run the application ...
///
/// let emitted = reporter.stop();
/// ```
pub struct SummaryReporter {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<usize>>,
}

impl SummaryReporter {
    pub(super) fn spawn(logger: OperationLogger, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = channel::<()>();

        let handle = thread::spawn(move || {
            let mut emitted = 0;
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let summary = logger.summary();
                        tracing::info!(
                            total = summary.total,
                            failures = summary.failures,
                            slow = summary.slow,
                            mean_duration_us = summary.mean_duration.as_micros() as u64,
                            per_operation = ?summary.per_operation,
                            "cache operation summary"
                        );
                        emitted += 1;
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            emitted
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Stop the thread and return how many summaries it logged.
    pub fn stop(mut self) -> usize {
        self.shutdown()
    }

    fn shutdown(&mut self) -> usize {
        let _ = self.stop_tx.send(());
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for SummaryReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
