//! Worker threads that drain the shared queue until it is exhausted.

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{error, info, warn};
use thiserror::Error;

use crate::cancel::CancelToken;
use crate::config::DrainPolicy;
use crate::shared_queue::SharedQueue;
use crate::types::{Task, WorkerId};

/// Error raised while handling a single task. One bad task never terminates
/// its worker; the error is logged and the loop moves on.
#[derive(Debug, Error)]
#[error("failed to process {label}: {reason}")]
pub struct ProcessError {
    pub label: String,
    pub reason: String,
}

/// Seam between the drain loop and the task-specific handling.
pub trait Process: Send + Sync {
    fn process(&self, worker: WorkerId, task: &Task) -> Result<(), ProcessError>;
}

/// Default processor: greet the task's label.
pub struct Greeter;

impl Process for Greeter {
    fn process(&self, worker: WorkerId, task: &Task) -> Result<(), ProcessError> {
        info!("Worker {worker} greets {}", task.label);
        Ok(())
    }
}

/// Final account of one worker's run, returned through [`WorkerHandle::join`].
#[derive(Debug)]
pub struct WorkerReport {
    pub id: WorkerId,
    /// Labels of the tasks this worker finished, in completion order.
    pub processed: Vec<String>,
    /// True when the worker stopped early on a cancellation signal.
    pub cancelled: bool,
}

/// A consumer bound to the shared queue, not yet running.
///
/// Lifecycle: built by the coordinator, started with [`Worker::spawn`],
/// finished once its drain loop observes a sustained-empty queue (or
/// cancellation).
pub struct Worker {
    id: WorkerId,
    queue: Arc<SharedQueue>,
    processor: Arc<dyn Process>,
    cancel: CancelToken,
    processing_delay: Duration,
    empty_recheck_backoff: Duration,
    drain_policy: DrainPolicy,
}

/// Handle to a started worker.
pub struct WorkerHandle {
    id: WorkerId,
    handle: thread::JoinHandle<WorkerReport>,
}

impl WorkerHandle {
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Block until the worker finishes or is cancelled.
    ///
    /// `Err` carries the payload of a worker that panicked outside the
    /// per-task recovery path.
    pub fn join(self) -> thread::Result<WorkerReport> {
        self.handle.join()
    }
}

impl Worker {
    pub fn new(
        id: WorkerId,
        queue: Arc<SharedQueue>,
        processor: Arc<dyn Process>,
        cancel: CancelToken,
        processing_delay: Duration,
        empty_recheck_backoff: Duration,
        drain_policy: DrainPolicy,
    ) -> Self {
        Self {
            id,
            queue,
            processor,
            cancel,
            processing_delay,
            empty_recheck_backoff,
            drain_policy,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Start the drain loop on its own named thread.
    pub fn spawn(self) -> io::Result<WorkerHandle> {
        let id = self.id;
        let handle = thread::Builder::new()
            .name(format!("worker-{id}"))
            .spawn(move || self.run())?;
        Ok(WorkerHandle { id, handle })
    }

    /// Drain loop, running on the worker thread until the queue is exhausted
    /// or cancellation is observed.
    fn run(self) -> WorkerReport {
        info!("Worker {} started", self.id);
        let mut processed = Vec::new();
        let mut cancelled = false;

        loop {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            match self.queue.dequeue() {
                Some(task) => {
                    // Simulated processing time. A cut-short sleep means
                    // cancellation arrived while this worker was parked.
                    if !self.cancel.sleep(self.processing_delay) {
                        warn!(
                            "Worker {} cancelled while processing {}",
                            self.id, task.label
                        );
                        cancelled = true;
                        break;
                    }
                    match self.processor.process(self.id, &task) {
                        Ok(()) => processed.push(task.label),
                        Err(err) => error!("Worker {}: {err}", self.id),
                    }
                }
                None => match self.drain_policy {
                    DrainPolicy::ExitOnFirstEmpty => break,
                    DrainPolicy::RecheckThenExit => {
                        // Distinguish terminal emptiness from a racing
                        // dequeue still in flight on another worker.
                        if self.queue.is_empty() {
                            break;
                        }
                        if !self.cancel.sleep(self.empty_recheck_backoff) {
                            cancelled = true;
                            break;
                        }
                    }
                },
            }
        }

        if cancelled {
            info!("Worker {} stopped on cancellation", self.id);
        } else {
            info!("Worker {} completed all tasks", self.id);
        }
        WorkerReport {
            id: self.id,
            processed,
            cancelled,
        }
    }
}
