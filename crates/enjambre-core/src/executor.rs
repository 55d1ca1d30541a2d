//! The concurrent task executor.
//!
//! `execute` fans N payloads out over a bounded set of workers and fans the
//! outcomes back in through a single consumer. Payloads are split into
//! contiguous partitions up front (no work stealing), one worker per
//! partition, so every worker processes its share strictly in input order.
//! The calling task drains the outcome channel and is the only writer of
//! the results and errors collections.
//!
//! Failure policy is chosen at construction: with fail-fast (the default)
//! the first task error cancels everything not yet started; with
//! [`Executor::without_fail_fast`] all tasks run to completion and every
//! error is collected.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::ExecutorConfig;
use crate::error::{ExecutorError, Result, TaskError};
use crate::metrics::ExecutorMetrics;
use crate::outcome::Outcome;
use crate::partition::partition;
use crate::types::RunId;

// =============================================================================
// Worker messages
// =============================================================================

/// One message per submitted task, produced by workers, consumed by the
/// aggregation loop. Every task is accounted for exactly once.
enum WorkerMessage<O> {
    /// Task executed and produced a result.
    Completed { index: usize, outcome: O },
    /// Task executed and returned an error.
    Failed { index: usize, error: TaskError },
    /// Task skipped after cancellation; accounted for without an outcome.
    Skipped { index: usize },
}

// =============================================================================
// Executor
// =============================================================================

/// Concurrent task executor with bounded fan-out and aggregated failure
/// reporting.
///
/// An executor is cheap to construct and holds no worker state between
/// runs. Run state (the per-task error collection) belongs to the most
/// recent [`execute`](Self::execute) call: it is cleared when a new call
/// starts and may be observed from other threads while a call is in
/// flight. Issue `execute` calls on one instance sequentially.
#[derive(Debug)]
pub struct Executor {
    fail_fast: bool,
    parent: Option<CancellationToken>,
    errors: Arc<Mutex<Vec<TaskError>>>,
    metrics: ExecutorMetrics,
}

impl Executor {
    /// Creates an executor with fail-fast enabled and no parent
    /// cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fail_fast: true,
            parent: None,
            errors: Arc::new(Mutex::new(Vec::new())),
            metrics: ExecutorMetrics::new(),
        }
    }

    /// Creates an executor from a validated configuration.
    #[must_use]
    pub fn from_config(config: &ExecutorConfig) -> Self {
        let mut executor = Self::new();
        executor.fail_fast = config.fail_fast;
        executor
    }

    /// Ties every run to an externally supplied cancellation token.
    ///
    /// Cancelling the token is treated exactly like an internal fail-fast
    /// cancellation: workers stop picking up new tasks, a task already in
    /// flight completes and reports normally. Each run derives a child
    /// token, so internal cancellation never propagates into `token`.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.parent = Some(token);
        self
    }

    /// Disables fail-fast: every submitted task runs to completion and
    /// every error is collected, at the cost of wasted work on runs that
    /// are already doomed.
    #[must_use]
    pub fn without_fail_fast(mut self) -> Self {
        self.fail_fast = false;
        self
    }

    /// Returns whether the first task error cancels remaining tasks.
    #[must_use]
    pub const fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Returns a snapshot of the per-task errors recorded by the most
    /// recent run. Safe to call while a run is in flight.
    #[must_use]
    pub fn errors(&self) -> Vec<TaskError> {
        self.errors.lock().clone()
    }

    /// Returns the metrics collector, cumulative across runs.
    #[must_use]
    pub const fn metrics(&self) -> &ExecutorMetrics {
        &self.metrics
    }

    /// Runs `process` once per payload across at most `concurrency`
    /// workers and returns the collected results.
    ///
    /// `process` receives each payload together with its index in
    /// `payloads`. Within one worker's partition tasks run strictly in
    /// input order; across workers no ordering is guaranteed, and the
    /// returned results are in completion order. Outcomes that need
    /// correlating back to their task should embed the index.
    ///
    /// A `concurrency` of zero is corrected to one with a warning. An
    /// empty payload list returns immediately without invoking `process`.
    ///
    /// Batch semantics are all-or-nothing: if any task fails (in either
    /// failure-policy mode), the accumulated results are discarded and the
    /// per-task errors are available from [`errors`](Self::errors).
    ///
    /// # Errors
    /// Returns [`ExecutorError::TasksFailed`] if one or more tasks
    /// returned an error.
    pub async fn execute<T, O, E, F, Fut>(
        &self,
        concurrency: usize,
        payloads: Vec<T>,
        process: F,
    ) -> Result<Vec<O::Result>>
    where
        T: Send + 'static,
        O: Outcome,
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(usize, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<O, E>> + Send + 'static,
    {
        let total = payloads.len();
        self.errors.lock().clear();

        if total == 0 {
            return Ok(Vec::new());
        }

        let workers = if concurrency == 0 {
            tracing::warn!("concurrency 0 requested, corrected to 1");
            1
        } else {
            concurrency
        };

        let run = RunId::new();
        let cancel = self
            .parent
            .as_ref()
            .map_or_else(CancellationToken::new, CancellationToken::child_token);

        let tasks: Vec<(usize, T)> = payloads.into_iter().enumerate().collect();
        let partitions = partition(tasks, workers)?;

        self.metrics.record_run();
        self.metrics.record_submitted(total as u64);
        tracing::debug!(
            run = %run,
            tasks = total,
            workers,
            fail_fast = self.fail_fast,
            "starting run"
        );

        // Sized to hold every expected outcome, so workers never block on
        // a full channel.
        let (tx, mut rx) = mpsc::channel::<WorkerMessage<O>>(total);
        let process = Arc::new(process);
        let mut handles = Vec::with_capacity(workers);

        for (worker, chunk) in partitions.into_iter().enumerate() {
            let tx = tx.clone();
            let cancel = cancel.clone();
            let process = Arc::clone(&process);
            let metrics = self.metrics.clone();
            let fail_fast = self.fail_fast;

            handles.push(tokio::spawn(async move {
                tracing::trace!(run = %run, worker, tasks = chunk.len(), "worker started");
                for (index, payload) in chunk {
                    // Cancellation is cooperative and checked between
                    // tasks only; a task already in flight completes and
                    // reports normally. Skipped tasks are still accounted
                    // for so the run can terminate.
                    if fail_fast && cancel.is_cancelled() {
                        metrics.record_skipped();
                        if tx.send(WorkerMessage::Skipped { index }).await.is_err() {
                            return;
                        }
                        continue;
                    }

                    let started = Instant::now();
                    let message = match process(index, payload).await {
                        Ok(outcome) => {
                            metrics.record_completed(started.elapsed());
                            WorkerMessage::Completed { index, outcome }
                        }
                        Err(error) => {
                            metrics.record_failed(started.elapsed());
                            WorkerMessage::Failed {
                                index,
                                error: Arc::new(error),
                            }
                        }
                    };
                    if tx.send(message).await.is_err() {
                        return;
                    }
                }
                tracing::trace!(run = %run, worker, "worker finished");
            }));
        }
        drop(tx);

        // Single-consumer aggregation: this task is the only writer of
        // the results and errors collections while workers run.
        let mut results = Vec::with_capacity(total);
        let mut failed = 0usize;
        let mut accounted = 0usize;

        while accounted < total {
            let Some(message) = rx.recv().await else {
                // Senders are gone with tasks missing: a worker died
                // without accounting (a panicking process function).
                self.metrics.record_run_failed();
                return Err(ExecutorError::internal(format!(
                    "workers exited with {} of {total} tasks unaccounted for",
                    total - accounted
                )));
            };
            accounted += 1;

            match message {
                WorkerMessage::Completed { index, outcome } => {
                    tracing::trace!(run = %run, index, "task completed");
                    results.push(outcome.into_result());
                }
                WorkerMessage::Failed { index, error } => {
                    tracing::debug!(run = %run, index, error = %error, "task failed");
                    self.errors.lock().push(error);
                    failed += 1;
                    if self.fail_fast && !cancel.is_cancelled() {
                        tracing::debug!(run = %run, index, "cancelling remaining tasks");
                        cancel.cancel();
                    }
                }
                WorkerMessage::Skipped { index } => {
                    tracing::trace!(run = %run, index, "task skipped");
                }
            }
        }

        for handle in handles {
            let _ = handle.await;
        }

        if failed > 0 {
            self.metrics.record_run_failed();
            tracing::debug!(run = %run, failed, total, "run finished with failures");
            return Err(ExecutorError::TasksFailed { failed, total });
        }

        tracing::debug!(run = %run, results = results.len(), "run finished");
        Ok(results)
    }

    /// Runs `process` `repeat` times across at most `concurrency` workers.
    ///
    /// Equivalent to [`execute`](Self::execute) over `repeat` payload-less
    /// tasks; the function receives only its task index. All `execute`
    /// semantics apply.
    ///
    /// # Errors
    /// Returns [`ExecutorError::TasksFailed`] if one or more tasks
    /// returned an error.
    pub async fn execute_simple<O, E, F, Fut>(
        &self,
        concurrency: usize,
        repeat: usize,
        process: F,
    ) -> Result<Vec<O::Result>>
    where
        O: Outcome,
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<O, E>> + Send + 'static,
    {
        self.execute(concurrency, vec![(); repeat], move |index, ()| {
            process(index)
        })
        .await
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::TaskResult;

    #[derive(Debug, thiserror::Error)]
    #[error("task {0} failed")]
    struct TaskFailure(usize);

    #[test]
    fn test_builder_defaults() {
        let executor = Executor::new();
        assert!(executor.fail_fast());
        assert!(executor.errors().is_empty());
    }

    #[test]
    fn test_without_fail_fast() {
        let executor = Executor::new().without_fail_fast();
        assert!(!executor.fail_fast());
    }

    #[test]
    fn test_from_config() {
        let config = ExecutorConfig::new(4).without_fail_fast();
        let executor = Executor::from_config(&config);
        assert!(!executor.fail_fast());

        let executor = Executor::from_config(&ExecutorConfig::default());
        assert!(executor.fail_fast());
    }

    #[tokio::test]
    async fn test_execute_collects_all_results() {
        let executor = Executor::new();
        let mut results = executor
            .execute(4, vec![10u64, 20, 30], |index, payload| async move {
                Ok::<_, TaskFailure>(TaskResult(payload + index as u64))
            })
            .await
            .expect("run");

        results.sort_unstable();
        assert_eq!(results, vec![10, 21, 32]);
    }

    #[tokio::test]
    async fn test_execute_simple_passes_indices() {
        let executor = Executor::new();
        let mut results = executor
            .execute_simple(2, 5, |index| async move {
                Ok::<_, TaskFailure>(TaskResult(index))
            })
            .await
            .expect("run");

        results.sort_unstable();
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_concurrency_is_corrected() {
        let executor = Executor::new();
        let results = tokio_test::block_on(executor.execute(0, vec![1], |_, payload| async move {
            Ok::<_, TaskFailure>(TaskResult(payload))
        }))
        .expect("run");
        assert_eq!(results, vec![1]);
    }

    #[tokio::test]
    async fn test_metrics_accumulate_across_runs() {
        let executor = Executor::new();
        for _ in 0..2 {
            executor
                .execute_simple(2, 3, |index| async move {
                    Ok::<_, TaskFailure>(TaskResult(index))
                })
                .await
                .expect("run");
        }
        assert_eq!(executor.metrics().runs_total(), 2);
        assert_eq!(executor.metrics().tasks_submitted(), 6);
        assert_eq!(executor.metrics().tasks_completed(), 6);
    }
}
