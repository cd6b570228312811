// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration

use std::path::PathBuf;

/// Lowest accepted concurrency limit.
pub const MIN_CONCURRENCY: usize = 1;

/// Highest accepted concurrency limit.
pub const MAX_CONCURRENCY: usize = 8;

/// Default number of jobs that may wait in the queue at once.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Default number of jobs the registry keeps for the session.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Clamp a requested concurrency into `MIN_CONCURRENCY..=MAX_CONCURRENCY`.
pub fn clamp_concurrency(requested: i64) -> usize {
    requested.clamp(MIN_CONCURRENCY as i64, MAX_CONCURRENCY as i64) as usize
}

/// Resolved configuration for a [`Scheduler`](crate::Scheduler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Maximum number of jobs working at once
    pub concurrency: usize,
    /// Capacity of the pending-job queue
    pub queue_capacity: usize,
    /// Capacity of the job registry
    pub history_capacity: usize,
    /// Directory receiving `<id>.out` and `<id>.err`
    pub output_dir: PathBuf,
}

impl SchedulerConfig {
    pub fn new(concurrency: i64, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            concurrency: clamp_concurrency(concurrency),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            output_dir: output_dir.into(),
        }
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new(MIN_CONCURRENCY as i64, ".")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
