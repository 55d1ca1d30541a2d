//! Error types for enjambre-core.
//!
//! Two layers of failure exist and are kept apart deliberately:
//! configuration and aggregate errors are [`ExecutorError`] values returned
//! from the executor itself, while the errors individual tasks produce are
//! captured type-erased as [`TaskError`] and retrieved separately via
//! [`Executor::errors`](crate::Executor::errors).

use std::sync::Arc;

/// Result type alias for executor operations.
pub type Result<T> = std::result::Result<T, ExecutorError>;

/// Type-erased error produced by a single task.
///
/// Stored behind an `Arc` so snapshots of the error collection can be
/// handed out while a run is still in flight.
pub type TaskError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by the executor itself.
///
/// Task-level failures never appear here directly; they are aggregated into
/// [`ExecutorError::TasksFailed`], which carries only counts. The individual
/// errors are available from [`Executor::errors`](crate::Executor::errors).
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// Partition count must be at least one.
    #[error("invalid partition count: {0}")]
    InvalidPartitionCount(usize),

    /// One or more tasks failed during a run.
    #[error("{failed} of {total} tasks failed")]
    TasksFailed {
        /// Number of tasks that returned an error.
        failed: usize,
        /// Number of tasks submitted to the run.
        total: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error (should not occur in production).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ExecutorError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this error reports failed tasks rather than a
    /// misuse of the executor.
    #[must_use]
    pub const fn is_task_failure(&self) -> bool {
        matches!(self, Self::TasksFailed { .. })
    }

    /// Returns the number of failed tasks, if this is an aggregate error.
    #[must_use]
    pub const fn failed_count(&self) -> Option<usize> {
        match self {
            Self::TasksFailed { failed, .. } => Some(*failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_partition_count_display() {
        let err = ExecutorError::InvalidPartitionCount(0);
        assert_eq!(err.to_string(), "invalid partition count: 0");
    }

    #[test]
    fn test_tasks_failed_display() {
        let err = ExecutorError::TasksFailed {
            failed: 3,
            total: 10,
        };
        assert_eq!(err.to_string(), "3 of 10 tasks failed");
    }

    #[test]
    fn test_config_error() {
        let err = ExecutorError::config("concurrency cannot be zero");
        assert!(err.to_string().contains("configuration error"));
        assert!(!err.is_task_failure());
    }

    #[test]
    fn test_task_failure_predicate() {
        let err = ExecutorError::TasksFailed {
            failed: 1,
            total: 4,
        };
        assert!(err.is_task_failure());
        assert_eq!(err.failed_count(), Some(1));
        assert_eq!(ExecutorError::internal("boom").failed_count(), None);
    }
}
