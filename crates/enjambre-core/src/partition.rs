//! Order-preserving splitting of a task list into worker partitions.

use crate::error::{ExecutorError, Result};

/// Splits `items` into exactly `parts` contiguous chunks of near-equal size.
///
/// With `N` items, the first `N % parts` chunks receive `N / parts + 1`
/// items and the rest receive `N / parts`, assigned in input order.
/// Concatenating the chunks reproduces the input exactly; chunk sizes never
/// differ by more than one. Fewer items than parts leaves the trailing
/// chunks empty.
///
/// # Errors
/// Returns [`ExecutorError::InvalidPartitionCount`] if `parts` is zero.
pub fn partition<T>(items: Vec<T>, parts: usize) -> Result<Vec<Vec<T>>> {
    if parts == 0 {
        return Err(ExecutorError::InvalidPartitionCount(parts));
    }

    let total = items.len();
    let base = total / parts;
    let remainder = total % parts;

    let mut chunks = Vec::with_capacity(parts);
    let mut iter = items.into_iter();
    for slot in 0..parts {
        let take = base + usize::from(slot < remainder);
        chunks.push(iter.by_ref().take(take).collect());
    }
    Ok(chunks)
}
