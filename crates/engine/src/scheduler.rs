// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job submission and the dispatch loop.
//!
//! The [`Scheduler`] handle accepts submissions and answers queries. A
//! dispatcher task owns the set of running workers and admits queued jobs
//! whenever a concurrency slot is free. It sleeps on a [`Notify`] that is
//! signalled by every enqueue, every worker completion, and shutdown.

use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SubmitError};
use crate::queue::BoundedQueue;
use crate::registry::Registry;
use crate::worker::Worker;
use chrono::Utc;
use jobq_core::{Job, JobId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::{JoinError, JoinHandle, JoinSet};

/// State shared between the handle, the dispatcher, and workers.
pub(crate) struct Shared {
    pub(crate) registry: Registry,
    queue: Mutex<BoundedQueue<JobId>>,
    /// Number of admitted jobs whose worker has not finished.
    active: Mutex<usize>,
    peak_active: AtomicUsize,
    concurrency: usize,
    accepting: AtomicBool,
    stopping: AtomicBool,
    /// Wakes the dispatcher
    wake: Notify,
    /// Wakes `wait_idle` callers
    idle: Notify,
}

impl Shared {
    /// Reserve a slot, dequeue the head job, and mark it `Working`, or
    /// `None` if either the limit is reached or nothing is queued. The
    /// check, the increment, and the transition happen under the same locks,
    /// so a job never leaves the queue without becoming `Working`.
    fn try_admit(self: &Arc<Self>) -> Option<(Job, ActiveSlot)> {
        let mut active = self.active.lock();
        if *active >= self.concurrency {
            return None;
        }
        let mut queue = self.queue.lock();
        while !queue.is_empty() {
            let id = match queue.dequeue() {
                Ok(id) => id,
                Err(e) => {
                    tracing::error!(error = %e, "queue reported items but dequeue failed");
                    return None;
                }
            };
            match self.registry.mark_working(id, Utc::now()) {
                Ok(job) => {
                    *active += 1;
                    self.peak_active.fetch_max(*active, Ordering::SeqCst);
                    return Some((
                        job,
                        ActiveSlot {
                            shared: Arc::clone(self),
                        },
                    ));
                }
                Err(e) => {
                    tracing::error!(job_id = %id, error = %e, "failed to admit job");
                }
            }
        }
        None
    }

    fn is_idle(&self) -> bool {
        let active = self.active.lock();
        *active == 0 && self.queue.lock().is_empty()
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }

    fn request_stop(&self) {
        self.accepting.store(false, Ordering::SeqCst);
        self.stopping.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }
}

/// One occupied concurrency slot.
///
/// Dropping the slot decrements the active count and wakes the dispatcher,
/// whichever way the worker ends (normal return, error, panic, or abort).
pub(crate) struct ActiveSlot {
    shared: Arc<Shared>,
}

impl Drop for ActiveSlot {
    fn drop(&mut self) {
        {
            let mut active = self.shared.active.lock();
            *active = active.saturating_sub(1);
        }
        self.shared.wake.notify_one();
        self.shared.idle.notify_waiters();
    }
}

/// Point-in-time counters for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStats {
    pub concurrency: usize,
    /// Jobs waiting in the queue
    pub queued: usize,
    /// Jobs admitted and not yet finished
    pub active: usize,
    /// Highest `active` value observed this session
    pub peak_active: usize,
    /// Jobs ever submitted
    pub submitted: usize,
}

/// Handle to a running scheduler.
///
/// Must be created inside a tokio runtime. Dropping the handle stops the
/// dispatcher, which kills any running jobs.
pub struct Scheduler {
    shared: Arc<Shared>,
    dispatcher: Option<JoinHandle<Result<(), SchedulerError>>>,
}

impl Scheduler {
    /// Start the dispatcher with the given configuration.
    pub fn start(config: SchedulerConfig) -> Self {
        let shared = Arc::new(Shared {
            registry: Registry::new(config.history_capacity, config.output_dir),
            queue: Mutex::new(BoundedQueue::with_capacity(config.queue_capacity)),
            active: Mutex::new(0),
            peak_active: AtomicUsize::new(0),
            concurrency: config.concurrency,
            accepting: AtomicBool::new(true),
            stopping: AtomicBool::new(false),
            wake: Notify::new(),
            idle: Notify::new(),
        });

        tracing::info!(
            concurrency = config.concurrency,
            queue_capacity = config.queue_capacity,
            history_capacity = config.history_capacity,
            "scheduler started"
        );

        let dispatcher = Dispatcher {
            shared: Arc::clone(&shared),
            workers: JoinSet::new(),
        };
        Self {
            shared,
            dispatcher: Some(tokio::spawn(dispatcher.run())),
        }
    }

    /// Register `command` as a new job and queue it for execution.
    ///
    /// On error nothing is registered and nothing is queued.
    pub fn submit(&self, command: &str) -> Result<JobId, SubmitError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(SubmitError::EmptyCommand);
        }
        if !self.shared.accepting.load(Ordering::SeqCst) {
            return Err(SubmitError::ShuttingDown);
        }

        let id = {
            let mut queue = self.shared.queue.lock();
            let registry = &self.shared.registry;
            if registry.is_full() {
                return Err(SubmitError::CapacityExceeded {
                    capacity: registry.capacity(),
                });
            }
            if queue.is_full() {
                return Err(SubmitError::QueueFull {
                    capacity: queue.capacity(),
                });
            }
            let id = registry.create(command, Utc::now())?;
            queue.enqueue(id).map_err(|_| SubmitError::QueueFull {
                capacity: queue.capacity(),
            })?;
            id
        };

        tracing::info!(job_id = %id, command, "job submitted");
        self.shared.wake.notify_one();
        Ok(id)
    }

    /// Snapshot of a job.
    pub fn get(&self, id: JobId) -> Option<Job> {
        self.shared.registry.get(id)
    }

    /// The registry of every job submitted this session.
    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    pub fn stats(&self) -> SchedulerStats {
        let active = *self.shared.active.lock();
        let queued = self.shared.queue.lock().len();
        SchedulerStats {
            concurrency: self.shared.concurrency,
            queued,
            active,
            peak_active: self.shared.peak_active.load(Ordering::SeqCst),
            submitted: self.shared.registry.len(),
        }
    }

    /// Resolve once the queue is empty and no job is running.
    pub async fn wait_idle(&self) {
        self.shared.wait_idle().await
    }

    /// Resolve when the dispatcher exits on its own, which only happens on
    /// a fatal error. Pending forever while the dispatcher is healthy.
    pub async fn stopped(&mut self) -> Result<(), SchedulerError> {
        match self.dispatcher.as_mut() {
            Some(handle) => {
                let result = handle.await;
                self.dispatcher = None;
                flatten(result)
            }
            None => std::future::pending().await,
        }
    }

    /// Stop admitting jobs and kill the ones still running.
    pub async fn shutdown(mut self) -> Result<(), SchedulerError> {
        self.shared.request_stop();
        match self.dispatcher.take() {
            Some(handle) => flatten(handle.await),
            None => Ok(()),
        }
    }

    /// Reject new submissions, let queued and running jobs finish, then stop.
    pub async fn drain(mut self) -> Result<(), SchedulerError> {
        self.shared.accepting.store(false, Ordering::SeqCst);
        let stats = self.stats();
        tracing::info!(
            queued = stats.queued,
            active = stats.active,
            "draining scheduler"
        );
        if let Some(handle) = self.dispatcher.as_mut() {
            tokio::select! {
                _ = self.shared.wait_idle() => {}
                result = handle => {
                    self.dispatcher = None;
                    return flatten(result);
                }
            }
        }
        self.shutdown().await
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if self.dispatcher.is_some() {
            self.shared.request_stop();
        }
    }
}

fn flatten(result: Result<Result<(), SchedulerError>, JoinError>) -> Result<(), SchedulerError> {
    match result {
        Ok(inner) => inner,
        Err(e) => Err(SchedulerError::Dispatcher(e.to_string())),
    }
}

/// The control loop admitting queued jobs under the concurrency limit.
struct Dispatcher {
    shared: Arc<Shared>,
    workers: JoinSet<Result<(), SchedulerError>>,
}

impl Dispatcher {
    async fn run(mut self) -> Result<(), SchedulerError> {
        let result = self.dispatch().await;

        let running = self.workers.len();
        if running > 0 {
            tracing::info!(running, "stopping running jobs");
        }
        self.workers.shutdown().await;
        tracing::info!("dispatcher stopped");
        result
    }

    async fn dispatch(&mut self) -> Result<(), SchedulerError> {
        loop {
            if self.shared.stopping.load(Ordering::SeqCst) {
                return Ok(());
            }
            self.admit_ready();

            tokio::select! {
                _ = self.shared.wake.notified() => {}
                Some(joined) = self.workers.join_next(), if !self.workers.is_empty() => {
                    reap(joined)?;
                }
            }
        }
    }

    /// Start a worker for every job that fits under the limit.
    fn admit_ready(&mut self) {
        while let Some((job, slot)) = self.shared.try_admit() {
            let worker = Worker::new(Arc::clone(&self.shared), job, slot);
            self.workers.spawn(worker.run());
        }
    }
}

/// Classify a finished worker task. Only resource exhaustion stops the
/// dispatcher; every other failure is contained to its job.
fn reap(joined: Result<Result<(), SchedulerError>, JoinError>) -> Result<(), SchedulerError> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e @ SchedulerError::ResourceExhausted { .. })) => {
            tracing::error!(error = %e, "fatal worker error");
            Err(e)
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "worker error");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "worker task failed");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
