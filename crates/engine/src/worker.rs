// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job execution: run the command as a child process and finalize its
//! registry record.

use crate::error::{SchedulerError, WorkerError};
use crate::scheduler::{ActiveSlot, Shared};
use chrono::Utc;
use jobq_core::{Job, JobOutcome};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::process::Command;

/// Split a command line into program and arguments on spaces and tabs.
///
/// No shell is involved: quotes, globs, and redirections are passed through
/// literally.
pub fn split_command(command: &str) -> Vec<&str> {
    command
        .split([' ', '\t'])
        .filter(|part| !part.is_empty())
        .collect()
}

fn open_append(path: &Path) -> Result<File, WorkerError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| WorkerError::OpenOutput {
            path: path.to_path_buf(),
            source,
        })
}

/// Run `command` to completion with stdout/stderr appended to the given files.
///
/// `on_spawn` receives the child's pid as soon as the process exists.
/// The child is killed if the returned future is dropped before it exits.
pub async fn execute(
    command: &str,
    stdout_path: &Path,
    stderr_path: &Path,
    on_spawn: impl FnOnce(u32),
) -> Result<ExitStatus, WorkerError> {
    let argv = split_command(command);
    let (program, args) = argv.split_first().ok_or(WorkerError::EmptyCommand)?;

    let stdout = open_append(stdout_path)?;
    let stderr = open_append(stderr_path)?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| WorkerError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if let Some(pid) = child.id() {
        on_spawn(pid);
    }

    child.wait().await.map_err(WorkerError::Wait)
}

/// Map a child's exit status onto a job outcome.
pub fn outcome_from_status(status: ExitStatus) -> JobOutcome {
    match (status.code(), status.signal()) {
        (Some(code), _) => JobOutcome::Exited { code },
        (None, Some(signal)) => JobOutcome::Signaled { signal },
        (None, None) => JobOutcome::Signaled { signal: 0 },
    }
}

/// A job admitted by the dispatcher, holding one concurrency slot until it
/// finishes.
pub(crate) struct Worker {
    shared: Arc<Shared>,
    job: Job,
    slot: ActiveSlot,
}

impl Worker {
    /// Wrap a job the dispatcher has already moved to `Working`.
    pub(crate) fn new(shared: Arc<Shared>, job: Job, slot: ActiveSlot) -> Self {
        tracing::info!(job_id = %job.id, command = %job.command, "job started");
        Self { shared, job, slot }
    }

    /// Execute the job and record how it ended.
    pub(crate) async fn run(self) -> Result<(), SchedulerError> {
        let Worker { shared, job, slot } = self;
        let registry = &shared.registry;

        let result = execute(&job.command, &job.stdout_path, &job.stderr_path, |pid| {
            if let Err(e) = registry.set_pid(job.id, pid) {
                tracing::warn!(job_id = %job.id, error = %e, "failed to record pid");
            }
        })
        .await;

        let mut fatal = None;
        let outcome = match result {
            Ok(status) => {
                let outcome = outcome_from_status(status);
                if outcome.is_abnormal() {
                    tracing::warn!(
                        job_id = %job.id,
                        outcome = %outcome,
                        "child process did not terminate normally"
                    );
                }
                outcome
            }
            Err(e) => {
                if e.child_was_running() {
                    tracing::error!(job_id = %job.id, error = %e, "lost track of running job");
                } else {
                    tracing::error!(job_id = %job.id, error = %e, "job failed to start");
                }
                note_failure(&job, &e);
                if e.is_resource_exhaustion() {
                    fatal = Some(SchedulerError::ResourceExhausted {
                        job: job.id,
                        message: e.to_string(),
                    });
                }
                JobOutcome::SpawnFailed {
                    reason: e.to_string(),
                }
            }
        };

        registry.mark_complete(job.id, outcome.clone(), Utc::now())?;
        tracing::info!(job_id = %job.id, outcome = %outcome, "job complete");

        // Release only after the record is final so idle waiters see it
        drop(slot);

        match fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Append the failure to the job's error file so it sits next to any
/// output the job would have produced.
fn note_failure(job: &Job, error: &WorkerError) {
    if matches!(error, WorkerError::OpenOutput { .. }) {
        return;
    }
    let written = open_append(&job.stderr_path).and_then(|mut file| {
        writeln!(file, "Error: {}", error).map_err(|source| WorkerError::OpenOutput {
            path: job.stderr_path.clone(),
            source,
        })
    });
    if let Err(e) = written {
        tracing::warn!(job_id = %job.id, error = %e, "failed to write job error file");
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
