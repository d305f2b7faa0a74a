//! Orchestration: seed the queue, start the pool, join every worker.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use thiserror::Error;

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::shared_queue::SharedQueue;
use crate::types::Task;
use crate::worker::{Greeter, Process, Worker, WorkerHandle, WorkerReport};

/// Error constructing a task during the seeding phase. The failed task is
/// skipped; seeding continues with the remainder.
#[derive(Debug, Error)]
#[error("failed to build task {index}: {reason}")]
pub struct TaskBuildError {
    pub index: usize,
    pub reason: String,
}

/// Aggregated outcome of one coordinator run.
#[derive(Debug)]
pub struct RunSummary {
    pub tasks_seeded: usize,
    pub workers_started: usize,
    /// Per-worker reports in creation order, one per worker that joined
    /// cleanly.
    pub reports: Vec<WorkerReport>,
    /// True when any worker observed cancellation before finishing.
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Total tasks processed across the whole pool.
    pub fn tasks_processed(&self) -> usize {
        self.reports.iter().map(|r| r.processed.len()).sum()
    }
}

/// Seed the queue with every successfully constructed task, in order.
///
/// A construction failure is logged and that task is skipped; the queue ends
/// up holding exactly the successful tasks, in their original order. Returns
/// the number seeded. Runs strictly before any worker starts.
pub fn seed<I>(queue: &SharedQueue, tasks: I) -> usize
where
    I: IntoIterator<Item = Result<Task, TaskBuildError>>,
{
    let mut seeded = 0;
    for outcome in tasks {
        match outcome {
            Ok(task) => {
                queue.enqueue(task);
                seeded += 1;
            }
            Err(err) => warn!("{err}; skipping"),
        }
    }
    seeded
}

/// Top-level orchestration for one seed → spawn → join run.
pub struct Coordinator {
    config: Config,
}

impl Coordinator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the full sequence with the default greeting processor, default
    /// "Person 1..N" labels, and a fresh cancellation token.
    pub fn run(&self) -> RunSummary {
        self.run_with(Arc::new(Greeter), CancelToken::new())
    }

    /// Run the full sequence with an explicit processor and token.
    pub fn run_with(&self, processor: Arc<dyn Process>, cancel: CancelToken) -> RunSummary {
        let queue = Arc::new(SharedQueue::new());

        let labels = (1..=self.config.task_count).map(|i| Ok(Task::new(format!("Person {i}"))));
        seed(&queue, labels);
        info!("Queue initialized with {} tasks", queue.len());

        self.run_seeded(queue, processor, cancel)
    }

    /// Spawn the pool over an already-seeded queue and join every worker.
    pub fn run_seeded(
        &self,
        queue: Arc<SharedQueue>,
        processor: Arc<dyn Process>,
        cancel: CancelToken,
    ) -> RunSummary {
        let tasks_seeded = queue.len();
        let start = Instant::now();

        let workers: Vec<Worker> = (1..=self.config.worker_count as u64)
            .map(|id| {
                Worker::new(
                    id,
                    Arc::clone(&queue),
                    Arc::clone(&processor),
                    cancel.clone(),
                    self.config.processing_delay,
                    self.config.empty_recheck_backoff,
                    self.config.drain_policy,
                )
            })
            .collect();

        info!("Starting {} workers", workers.len());
        let mut handles: Vec<WorkerHandle> = Vec::with_capacity(workers.len());
        for worker in workers {
            let id = worker.id();
            match worker.spawn() {
                Ok(handle) => handles.push(handle),
                // Degraded but non-fatal: the slot never runs and the rest
                // of the pool drains the queue with reduced parallelism.
                Err(err) => error!("Failed to start worker {id}: {err}"),
            }
        }
        let workers_started = handles.len();

        info!("Waiting for all workers to complete");
        let mut reports = Vec::with_capacity(handles.len());
        let mut cancelled = false;
        for handle in handles {
            let id = handle.id();
            match handle.join() {
                Ok(report) => {
                    if report.cancelled {
                        warn!("Worker {id} reported cancellation");
                        cancelled = true;
                    }
                    reports.push(report);
                }
                // Fatal taxonomy: logged with detail, but the remaining
                // joins still run so the drain list is fully attempted.
                Err(panic) => error!("Worker {id} panicked: {}", panic_message(&panic)),
            }
        }
        cancelled |= cancel.is_cancelled();

        info!("All workers completed");
        RunSummary {
            tasks_seeded,
            workers_started,
            reports,
            cancelled,
            elapsed: start.elapsed(),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
