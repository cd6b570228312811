// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier, lifecycle state machine, and execution record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Unique identifier for a submitted job.
///
/// Assigned sequentially from zero by the registry and never reused within
/// a session. The id doubles as the job's index in the registry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Position of this job in an index-addressed store.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for JobId {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

/// Lifecycle state of a job.
///
/// States only move forward: `Waiting -> Working -> Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Queued, not yet admitted
    Waiting,
    /// Admitted; the child process is being started or is running
    Working,
    /// The child has terminated (or could not be started)
    Complete,
}

impl JobStatus {
    /// Transition table for the job lifecycle.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Waiting, JobStatus::Working) => true,
            (JobStatus::Working, JobStatus::Complete) => true,
            (JobStatus::Waiting, _) | (JobStatus::Working, _) | (JobStatus::Complete, _) => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Complete)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Waiting => write!(f, "waiting"),
            JobStatus::Working => write!(f, "working"),
            JobStatus::Complete => write!(f, "complete"),
        }
    }
}

/// How a completed job ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The child exited normally with this code
    Exited { code: i32 },
    /// The child was terminated by a signal
    Signaled { signal: i32 },
    /// The child could not be created, or could not be waited on after
    /// spawning; either way no exit status is known
    SpawnFailed { reason: String },
}

impl JobOutcome {
    /// Exit code for a normal exit, `None` for abnormal outcomes.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            JobOutcome::Exited { code } => Some(*code),
            JobOutcome::Signaled { .. } | JobOutcome::SpawnFailed { .. } => None,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code() == Some(0)
    }

    /// True when the command did not run to a normal exit.
    pub fn is_abnormal(&self) -> bool {
        !matches!(self, JobOutcome::Exited { .. })
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Exited { code } => write!(f, "{}", code),
            JobOutcome::Signaled { signal } => write!(f, "signal {}", signal),
            JobOutcome::SpawnFailed { reason } => write!(f, "spawn failed: {}", reason),
        }
    }
}

/// A lifecycle transition that the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("job {id}: cannot move from {from} to {to}")]
pub struct TransitionError {
    pub id: JobId,
    pub from: JobStatus,
    pub to: JobStatus,
}

/// A submitted job and its execution record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub command: String,
    pub status: JobStatus,
    /// Set once the job is complete
    pub outcome: Option<JobOutcome>,
    /// Child process id, once spawned
    pub pid: Option<u32>,
    pub submitted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    /// File receiving the child's standard output
    pub stdout_path: PathBuf,
    /// File receiving the child's standard error
    pub stderr_path: PathBuf,
}

impl Job {
    pub fn new(
        id: JobId,
        command: impl Into<String>,
        stdout_path: PathBuf,
        stderr_path: PathBuf,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            command: command.into(),
            status: JobStatus::Waiting,
            outcome: None,
            pid: None,
            submitted_at,
            started_at: None,
            finished_at: None,
            stdout_path,
            stderr_path,
        }
    }

    fn transition(&mut self, to: JobStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Move to `Working` and stamp the start time.
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Working)?;
        self.started_at = Some(at);
        Ok(())
    }

    /// Move to `Complete`, recording the outcome and stop time.
    pub fn finish(&mut self, outcome: JobOutcome, at: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Complete)?;
        self.outcome = Some(outcome);
        self.finished_at = Some(at);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_terminal()
    }

    /// Wall-clock seconds between start and stop, if both are known.
    pub fn elapsed_secs(&self) -> Option<u64> {
        let (start, stop) = (self.started_at?, self.finished_at?);
        Some(u64::try_from((stop - start).num_seconds()).unwrap_or(0))
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
