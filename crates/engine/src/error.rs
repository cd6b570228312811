// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the scheduler

use crate::registry::RegistryError;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a submission is rejected. A rejected submission changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("job history full ({capacity} jobs)")]
    CapacityExceeded { capacity: usize },
    #[error("job queue full ({capacity} waiting)")]
    QueueFull { capacity: usize },
    #[error("empty command")]
    EmptyCommand,
    #[error("scheduler is shutting down")]
    ShuttingDown,
    #[error(transparent)]
    Registry(RegistryError),
}

impl From<RegistryError> for SubmitError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::CapacityExceeded { capacity } => {
                SubmitError::CapacityExceeded { capacity }
            }
            other => SubmitError::Registry(other),
        }
    }
}

/// Failures starting or supervising a job's child process.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("empty command")]
    EmptyCommand,
    #[error("failed to open {}: {source}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("command execution failed for \"{program}\": {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for child: {0}")]
    Wait(#[source] std::io::Error),
}

impl WorkerError {
    /// True when the failure reflects process-wide resource exhaustion
    /// rather than a problem with this particular job.
    /// Whether the child had been spawned when the error occurred. Only a
    /// failed wait happens after spawn.
    pub fn child_was_running(&self) -> bool {
        matches!(self, WorkerError::Wait(_))
    }

    pub fn is_resource_exhaustion(&self) -> bool {
        match self {
            WorkerError::Spawn { source, .. } => source.kind() == std::io::ErrorKind::OutOfMemory,
            WorkerError::EmptyCommand | WorkerError::OpenOutput { .. } | WorkerError::Wait(_) => {
                false
            }
        }
    }
}

/// Errors that stop the dispatcher
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("resource exhaustion while starting job {job}: {message}")]
    ResourceExhausted { job: jobq_core::JobId, message: String },
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("dispatcher task failed: {0}")]
    Dispatcher(String),
}
