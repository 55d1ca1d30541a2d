//! The outcome-carries-a-result capability.
//!
//! Workers hand the aggregator one outcome value per executed task; the
//! aggregator only needs to know how to extract the caller's result from
//! it. Callers with per-task metadata (the task index, timings, addresses)
//! implement [`Outcome`] on their own type; callers without any use
//! [`TaskResult`].

/// A per-task outcome that carries an extractable result.
///
/// The result order in the final collection is an arbitrary interleaving of
/// worker completions, so outcomes that need correlating back to their task
/// should embed the task index in `Result` themselves.
pub trait Outcome: Send + 'static {
    /// The result value extracted from this outcome.
    type Result: Send + 'static;

    /// Consumes the outcome, yielding its result.
    fn into_result(self) -> Self::Result;
}

/// Minimal outcome wrapper for tasks with no extra metadata to attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskResult<R>(pub R);

impl<R: Send + 'static> Outcome for TaskResult<R> {
    type Result = R;

    fn into_result(self) -> R {
        self.0
    }
}
