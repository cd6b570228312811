// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jobq execution engine: bounded queue, job registry, workers, and the
//! dispatch loop that ties them together.

mod config;
mod error;
pub mod log_paths;
mod queue;
mod registry;
mod scheduler;
mod worker;

pub use config::{
    clamp_concurrency, SchedulerConfig, DEFAULT_HISTORY_CAPACITY, DEFAULT_QUEUE_CAPACITY,
    MAX_CONCURRENCY, MIN_CONCURRENCY,
};
pub use error::{SchedulerError, SubmitError, WorkerError};
pub use queue::{BoundedQueue, QueueError};
pub use registry::{
    is_active, is_complete, JobCounts, JobListing, JobListingIter, Registry, RegistryError,
};
pub use scheduler::{Scheduler, SchedulerStats};
pub use worker::{execute, outcome_from_status, split_command};
