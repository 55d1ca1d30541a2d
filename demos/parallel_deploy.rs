// Examples are allowed to use expect/unwrap for simplicity
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Parallel Deployment Example
//!
//! Fans a batch of simulated contract deployments out over a bounded
//! worker pool, then repeats a payload-less registration task with
//! `execute_simple`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example parallel_deploy
//!
//! # With debug logging for per-task progress
//! RUST_LOG=debug cargo run --example parallel_deploy
//! ```

use std::time::Duration;

use enjambre::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("node {0} refused the deployment")]
struct DeployError(usize);

/// Outcome of one deployment, correlated back by task index.
struct Deployment {
    index: usize,
    address: String,
}

impl Outcome for Deployment {
    type Result = (usize, String);

    fn into_result(self) -> (usize, String) {
        (self.index, self.address)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let executor = Executor::new();
    let contracts: Vec<String> = (0..12).map(|i| format!("counter-{i}")).collect();

    tracing::info!(contracts = contracts.len(), "deploying batch");

    let mut deployed = executor
        .execute(4, contracts, |index, name| async move {
            // Stand-in for an RPC round trip.
            tokio::time::sleep(Duration::from_millis(50)).await;
            tracing::debug!(index, contract = %name, "deploying");
            Ok::<_, DeployError>(Deployment {
                index,
                address: format!("0x{index:040x}"),
            })
        })
        .await
        .expect("deployment batch");

    deployed.sort_unstable_by_key(|(index, _)| *index);
    for (index, address) in &deployed {
        tracing::info!(index, address = %address, "deployed");
    }

    // Payload-less fan-out: ping every deployed contract once.
    let pings = executor
        .execute_simple(4, deployed.len(), |index| async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, DeployError>(TaskResult(index))
        })
        .await
        .expect("ping batch");

    let snapshot = executor.metrics().snapshot();
    tracing::info!(
        pings = pings.len(),
        tasks_completed = snapshot.tasks_completed,
        avg_us = snapshot.task_duration_avg_us,
        "done"
    );
}
