// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared path builders for per-job output files and the scheduler log.
//!
//! Used by the registry (to record where a job writes) and the CLI (to set
//! up the scheduler's own log) so both agree on the layout:
//!   `<output_dir>/<job_id>.out`
//!   `<output_dir>/<job_id>.err`
//!   `<output_dir>/jobq.log`

use jobq_core::JobId;
use std::path::{Path, PathBuf};

/// File name of the scheduler's own tracing log.
pub const SCHEDULER_LOG_FILE: &str = "jobq.log";

/// Build the path receiving a job's standard output.
///
/// Structure: `{output_dir}/{job_id}.out`
pub fn job_stdout_path(output_dir: &Path, job_id: JobId) -> PathBuf {
    output_dir.join(format!("{}.out", job_id))
}

/// Build the path receiving a job's standard error.
///
/// Structure: `{output_dir}/{job_id}.err`
pub fn job_stderr_path(output_dir: &Path, job_id: JobId) -> PathBuf {
    output_dir.join(format!("{}.err", job_id))
}

/// Build the path to the scheduler log.
///
/// Structure: `{output_dir}/jobq.log`
pub fn scheduler_log_path(output_dir: &Path) -> PathBuf {
    output_dir.join(SCHEDULER_LOG_FILE)
}

#[cfg(test)]
#[path = "log_paths_tests.rs"]
mod tests;
