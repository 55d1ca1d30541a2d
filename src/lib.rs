//! Enjambre: concurrent fan-out task executor for test-orchestration
//! tooling.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use enjambre::prelude::*;
//!
//! // Re-exports from enjambre-core for convenience
//! ```

pub use enjambre_core as core;

/// Prelude module for common imports.
pub mod prelude {
    pub use enjambre_core::{
        Executor, ExecutorConfig, ExecutorError, ExecutorMetrics, Outcome, RunId, TaskError,
        TaskResult,
    };
}
