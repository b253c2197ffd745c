//! Operation logging for cache engines.
//!
//! Every engine operation produces an [`OperationRecord`] with its duration,
//! the collection size before and after, and whether it succeeded. Records
//! are kept in a bounded ring buffer for diagnostics and mirrored to
//! `tracing`. Logging never influences what an operation does.
//!
//! The logger is constructed by the host and handed to the engine
//! factories; [`OperationLogger::disabled`] is the no-op stand-in.

mod reporter;

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::config::LoggerSettings;

pub use reporter::SummaryReporter;

/// How an operation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure(String),
}

/// One logged engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationRecord {
    pub operation: &'static str,
    pub feature: String,
    pub owner_id: String,
    pub duration: Duration,
    pub before: usize,
    pub after: usize,
    pub outcome: Outcome,
    pub at: SystemTime,
}

impl OperationRecord {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Aggregate view over the retained records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationSummary {
    pub total: usize,
    pub failures: usize,
    pub slow: usize,
    pub mean_duration: Duration,
    pub per_operation: BTreeMap<&'static str, usize>,
}

struct LoggerState {
    entries: Mutex<VecDeque<OperationRecord>>,
    capacity: usize,
    slow_threshold: Duration,
}

/// Bounded, shareable operation log. Clones share the same buffer.
#[derive(Clone)]
pub struct OperationLogger {
    state: Option<Arc<LoggerState>>,
}

impl Default for OperationLogger {
    fn default() -> Self {
        Self::new(&LoggerSettings::default())
    }
}

impl OperationLogger {
    pub fn new(settings: &LoggerSettings) -> Self {
        if !settings.enabled || settings.capacity == 0 {
            return Self::disabled();
        }
        Self {
            state: Some(Arc::new(LoggerState {
                entries: Mutex::new(VecDeque::with_capacity(settings.capacity)),
                capacity: settings.capacity,
                slow_threshold: settings.slow_threshold(),
            })),
        }
    }

    /// A logger that drops everything.
    pub fn disabled() -> Self {
        Self { state: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    /// Append a record, evicting the oldest one when the buffer is full.
    pub fn record(&self, record: OperationRecord) {
        let Some(state) = &self.state else {
            return;
        };

        match &record.outcome {
            Outcome::Failure(error) => tracing::warn!(
                operation = record.operation,
                feature = %record.feature,
                owner_id = %record.owner_id,
                duration_us = record.duration.as_micros() as u64,
                error = %error,
                "cache operation failed"
            ),
            Outcome::Success if record.duration > state.slow_threshold => tracing::info!(
                operation = record.operation,
                feature = %record.feature,
                owner_id = %record.owner_id,
                duration_us = record.duration.as_micros() as u64,
                before = record.before,
                after = record.after,
                "slow cache operation"
            ),
            Outcome::Success => tracing::debug!(
                operation = record.operation,
                feature = %record.feature,
                owner_id = %record.owner_id,
                duration_us = record.duration.as_micros() as u64,
                before = record.before,
                after = record.after,
                "cache operation"
            ),
        }

        // A poisoned buffer only costs us diagnostics.
        let Ok(mut entries) = state.entries.lock() else {
            return;
        };
        while entries.len() >= state.capacity {
            entries.pop_front();
        }
        entries.push_back(record);
    }

    /// Retained records, oldest first.
    pub fn entries(&self) -> Vec<OperationRecord> {
        self.state
            .as_ref()
            .and_then(|state| state.entries.lock().ok().map(|e| e.iter().cloned().collect()))
            .unwrap_or_default()
    }

    pub fn summary(&self) -> OperationSummary {
        let Some(state) = &self.state else {
            return OperationSummary::default();
        };
        let Ok(entries) = state.entries.lock() else {
            return OperationSummary::default();
        };

        let mut summary = OperationSummary {
            total: entries.len(),
            ..Default::default()
        };
        let mut elapsed = Duration::ZERO;
        for record in entries.iter() {
            if !record.is_success() {
                summary.failures += 1;
            }
            if record.duration > state.slow_threshold {
                summary.slow += 1;
            }
            elapsed += record.duration;
            *summary.per_operation.entry(record.operation).or_default() += 1;
        }
        if summary.total > 0 {
            summary.mean_duration = elapsed / summary.total as u32;
        }
        summary
    }

    pub fn clear(&self) {
        if let Some(state) = &self.state {
            if let Ok(mut entries) = state.entries.lock() {
                entries.clear();
            }
        }
    }

    /// Spawn a background thread that logs a summary every `interval`.
    ///
    /// The host owns the returned handle; stopping or dropping it ends the
    /// thread.
    pub fn start_reporter(&self, interval: Duration) -> SummaryReporter {
        SummaryReporter::spawn(self.clone(), interval)
    }
}
