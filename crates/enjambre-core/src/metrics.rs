//! Executor metrics.
//!
//! Counters are cumulative for the lifetime of an executor, across runs.
//! Workers record task-level events directly (atomics tolerate many
//! writers); run-level events are recorded by the aggregation loop.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Thread-safe metrics collector shared across workers and runs.
#[derive(Debug, Clone)]
pub struct ExecutorMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    // Task counters
    tasks_submitted: AtomicU64,
    tasks_completed: AtomicU64,
    tasks_failed: AtomicU64,
    tasks_skipped: AtomicU64,

    // Run counters
    runs_total: AtomicU64,
    runs_failed: AtomicU64,

    // Task duration (microseconds, for atomic operations)
    duration_sum_us: AtomicU64,
    duration_count: AtomicU64,
    duration_max_us: AtomicU64,
}

impl ExecutorMetrics {
    /// Creates a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Task counters
    // ═══════════════════════════════════════════════════════════════════════════

    /// Records `count` tasks submitted to a run.
    pub fn record_submitted(&self, count: u64) {
        self.inner.tasks_submitted.fetch_add(count, Ordering::Relaxed);
    }

    /// Records a task that completed with a result.
    pub fn record_completed(&self, duration: Duration) {
        self.inner.tasks_completed.fetch_add(1, Ordering::Relaxed);
        self.record_duration(duration);
    }

    /// Records a task that returned an error.
    pub fn record_failed(&self, duration: Duration) {
        self.inner.tasks_failed.fetch_add(1, Ordering::Relaxed);
        self.record_duration(duration);
    }

    /// Records a task skipped by cancellation.
    pub fn record_skipped(&self) {
        self.inner.tasks_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns total tasks submitted.
    #[must_use]
    pub fn tasks_submitted(&self) -> u64 {
        self.inner.tasks_submitted.load(Ordering::Relaxed)
    }

    /// Returns total tasks completed with a result.
    #[must_use]
    pub fn tasks_completed(&self) -> u64 {
        self.inner.tasks_completed.load(Ordering::Relaxed)
    }

    /// Returns total tasks that returned an error.
    #[must_use]
    pub fn tasks_failed(&self) -> u64 {
        self.inner.tasks_failed.load(Ordering::Relaxed)
    }

    /// Returns total tasks skipped by cancellation.
    #[must_use]
    pub fn tasks_skipped(&self) -> u64 {
        self.inner.tasks_skipped.load(Ordering::Relaxed)
    }

    /// Returns the failure rate over executed tasks (0.0 to 1.0).
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        let executed = self.tasks_completed() + self.tasks_failed();
        if executed > 0 {
            self.tasks_failed() as f64 / executed as f64
        } else {
            0.0
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Run counters
    // ═══════════════════════════════════════════════════════════════════════════

    /// Records a run reaching the aggregation loop.
    pub fn record_run(&self) {
        self.inner.runs_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a run that ended with at least one failed task.
    pub fn record_run_failed(&self) {
        self.inner.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns total runs executed.
    #[must_use]
    pub fn runs_total(&self) -> u64 {
        self.inner.runs_total.load(Ordering::Relaxed)
    }

    /// Returns total runs with at least one failed task.
    #[must_use]
    pub fn runs_failed(&self) -> u64 {
        self.inner.runs_failed.load(Ordering::Relaxed)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Duration
    // ═══════════════════════════════════════════════════════════════════════════

    fn record_duration(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.inner.duration_sum_us.fetch_add(us, Ordering::Relaxed);
        self.inner.duration_count.fetch_add(1, Ordering::Relaxed);

        // Update max (not perfectly atomic but close enough for metrics)
        let mut current_max = self.inner.duration_max_us.load(Ordering::Relaxed);
        while us > current_max {
            match self.inner.duration_max_us.compare_exchange_weak(
                current_max,
                us,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current_max = actual,
            }
        }
    }

    /// Returns the average task duration.
    #[must_use]
    pub fn task_duration_avg(&self) -> Duration {
        let count = self.inner.duration_count.load(Ordering::Relaxed);
        if count > 0 {
            let sum_us = self.inner.duration_sum_us.load(Ordering::Relaxed);
            Duration::from_micros(sum_us / count)
        } else {
            Duration::ZERO
        }
    }

    /// Returns the maximum task duration.
    #[must_use]
    pub fn task_duration_max(&self) -> Duration {
        Duration::from_micros(self.inner.duration_max_us.load(Ordering::Relaxed))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Snapshot
    // ═══════════════════════════════════════════════════════════════════════════

    /// Creates a snapshot of current metrics.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tasks_submitted: self.tasks_submitted(),
            tasks_completed: self.tasks_completed(),
            tasks_failed: self.tasks_failed(),
            tasks_skipped: self.tasks_skipped(),
            failure_rate: self.failure_rate(),
            runs_total: self.runs_total(),
            runs_failed: self.runs_failed(),
            task_duration_avg_us: self.task_duration_avg().as_micros() as u64,
            task_duration_max_us: self.task_duration_max().as_micros() as u64,
        }
    }
}

impl Default for ExecutorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of executor metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total tasks submitted.
    pub tasks_submitted: u64,
    /// Tasks completed with a result.
    pub tasks_completed: u64,
    /// Tasks that returned an error.
    pub tasks_failed: u64,
    /// Tasks skipped by cancellation.
    pub tasks_skipped: u64,
    /// Failure rate over executed tasks (0.0 to 1.0).
    pub failure_rate: f64,
    /// Total runs executed.
    pub runs_total: u64,
    /// Runs with at least one failed task.
    pub runs_failed: u64,
    /// Average task duration in microseconds.
    pub task_duration_avg_us: u64,
    /// Maximum task duration in microseconds.
    pub task_duration_max_us: u64,
}
