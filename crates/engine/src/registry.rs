// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only store of every job submitted during the session.
//!
//! Ids are handed out sequentially from zero and double as indices into the
//! backing vector, so the ids in use are always exactly `0..len`. Entries are
//! never removed. Readers get cloned snapshots taken under the lock, so a
//! report never observes a half-applied transition.

use crate::log_paths;
use chrono::{DateTime, Utc};
use jobq_core::job::TransitionError;
use jobq_core::{Job, JobId, JobOutcome, JobStatus};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("job history full ({capacity} jobs)")]
    CapacityExceeded { capacity: usize },
    #[error("unknown job: {0}")]
    UnknownJob(JobId),
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error("job {0} is not working")]
    NotWorking(JobId),
}

/// Number of registered jobs in each lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCounts {
    pub waiting: usize,
    pub working: usize,
    pub complete: usize,
}

/// Listing filter for jobs shown by `showjobs`.
pub fn is_active(job: &Job) -> bool {
    job.status != JobStatus::Complete
}

/// Listing filter for jobs shown by `submithistory`.
pub fn is_complete(job: &Job) -> bool {
    job.status == JobStatus::Complete
}

/// Fixed-capacity registry of jobs.
#[derive(Debug)]
pub struct Registry {
    jobs: RwLock<Vec<Job>>,
    capacity: usize,
    output_dir: PathBuf,
}

impl Registry {
    /// Create a registry holding at most `capacity` jobs whose output files
    /// live under `output_dir`.
    pub fn new(capacity: usize, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            jobs: RwLock::new(Vec::new()),
            capacity,
            output_dir: output_dir.into(),
        }
    }

    /// Register a new job in the `Waiting` state and return its id.
    pub fn create(&self, command: &str, at: DateTime<Utc>) -> Result<JobId, RegistryError> {
        let mut jobs = self.jobs.write();
        if jobs.len() >= self.capacity {
            return Err(RegistryError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let id = JobId::new(jobs.len() as u64);
        jobs.push(Job::new(
            id,
            command,
            log_paths::job_stdout_path(&self.output_dir, id),
            log_paths::job_stderr_path(&self.output_dir, id),
            at,
        ));
        Ok(id)
    }

    /// Snapshot of a job's current record.
    pub fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().get(id.index()).cloned()
    }

    /// Lazily list the jobs matching `filter`, in id order.
    ///
    /// The listing covers the jobs registered when it was created and can be
    /// iterated any number of times; each pass sees the jobs' current state.
    pub fn list<F>(&self, filter: F) -> JobListing<'_, F>
    where
        F: Fn(&Job) -> bool,
    {
        JobListing {
            registry: self,
            filter,
            end: self.len(),
        }
    }

    /// Jobs that are still waiting or working.
    pub fn active(&self) -> JobListing<'_, fn(&Job) -> bool> {
        self.list(is_active as fn(&Job) -> bool)
    }

    /// Jobs that have completed.
    pub fn history(&self) -> JobListing<'_, fn(&Job) -> bool> {
        self.list(is_complete as fn(&Job) -> bool)
    }

    /// Move a job to `Working`, returning the updated snapshot.
    pub fn mark_working(&self, id: JobId, at: DateTime<Utc>) -> Result<Job, RegistryError> {
        self.update(id, |job| {
            job.start(at)?;
            Ok(job.clone())
        })
    }

    /// Record the child process id of a working job.
    pub fn set_pid(&self, id: JobId, pid: u32) -> Result<(), RegistryError> {
        self.update(id, |job| {
            if job.status != JobStatus::Working {
                return Err(RegistryError::NotWorking(id));
            }
            job.pid = Some(pid);
            Ok(())
        })
    }

    /// Move a job to `Complete` with its outcome.
    pub fn mark_complete(
        &self,
        id: JobId,
        outcome: JobOutcome,
        at: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        self.update(id, |job| Ok(job.finish(outcome, at)?))
    }

    fn update<T>(
        &self,
        id: JobId,
        f: impl FnOnce(&mut Job) -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let mut jobs = self.jobs.write();
        let job = jobs
            .get_mut(id.index())
            .ok_or(RegistryError::UnknownJob(id))?;
        f(job)
    }

    /// Tally of jobs per lifecycle state.
    pub fn counts(&self) -> JobCounts {
        let jobs = self.jobs.read();
        let mut counts = JobCounts::default();
        for job in jobs.iter() {
            match job.status {
                JobStatus::Waiting => counts.waiting += 1,
                JobStatus::Working => counts.working += 1,
                JobStatus::Complete => counts.complete += 1,
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// A restartable, lazily evaluated view over matching jobs.
pub struct JobListing<'a, F> {
    registry: &'a Registry,
    filter: F,
    end: usize,
}

impl<'a, F> JobListing<'a, F>
where
    F: Fn(&Job) -> bool,
{
    /// Start a fresh pass over the listing.
    pub fn iter(&self) -> JobListingIter<'_, 'a, F> {
        JobListingIter {
            listing: self,
            next: 0,
        }
    }
}

impl<'l, 'a, F> IntoIterator for &'l JobListing<'a, F>
where
    F: Fn(&Job) -> bool,
{
    type Item = Job;
    type IntoIter = JobListingIter<'l, 'a, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over a [`JobListing`].
pub struct JobListingIter<'l, 'a, F> {
    listing: &'l JobListing<'a, F>,
    next: usize,
}

impl<F> Iterator for JobListingIter<'_, '_, F>
where
    F: Fn(&Job) -> bool,
{
    type Item = Job;

    fn next(&mut self) -> Option<Job> {
        while self.next < self.listing.end {
            let id = JobId::new(self.next as u64);
            self.next += 1;
            if let Some(job) = self.listing.registry.get(id) {
                if (self.listing.filter)(&job) {
                    return Some(job);
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.listing.end.saturating_sub(self.next)))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
