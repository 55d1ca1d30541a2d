// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # enjambre-core
//!
//! Generic concurrent task executor: the fan-out/fan-in primitive behind
//! the Enjambre test-orchestration tooling.
//!
//! Given N independent task payloads, [`Executor::execute`] splits them
//! into contiguous partitions, runs one worker per partition, aggregates
//! results and errors through a single consumer, and applies one of two
//! failure policies: fail-fast (the first task error cancels everything
//! not yet started) or collect-everything
//! ([`Executor::without_fail_fast`]). Cancellation is cooperative and can
//! additionally be driven by an external token
//! ([`Executor::with_cancellation`]).
//!
//! ## Example
//!
//! ```rust,ignore
//! use enjambre_core::{Executor, TaskResult};
//!
//! let executor = Executor::new();
//! let addresses = executor
//!     .execute(8, node_configs, |index, config| async move {
//!         let address = register_node(index, config).await?;
//!         Ok(TaskResult(address))
//!     })
//!     .await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod outcome;
pub mod partition;
pub mod types;

pub use config::ExecutorConfig;
pub use error::{ExecutorError, Result, TaskError};
pub use executor::Executor;
pub use metrics::{ExecutorMetrics, MetricsSnapshot};
pub use outcome::{Outcome, TaskResult};
pub use partition::partition;
pub use types::RunId;
