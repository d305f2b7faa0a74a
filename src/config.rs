//! Run configuration for the work-distribution pool.

use std::time::Duration;

/// Default number of concurrent workers draining the queue.
pub const DEFAULT_WORKER_COUNT: usize = 3;
/// Default number of tasks seeded before the workers start.
pub const DEFAULT_TASK_COUNT: usize = 10;
/// Default simulated per-task processing duration.
pub const DEFAULT_PROCESSING_DELAY_MS: u64 = 200;
/// Default pause before retrying when an empty dequeue fails its recheck.
pub const DEFAULT_EMPTY_RECHECK_BACKOFF_MS: u64 = 50;

/// How a worker decides the queue is permanently drained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainPolicy {
    /// After an empty dequeue, confirm with an independent `is_empty` check;
    /// back off briefly and retry when the recheck still sees a task.
    RecheckThenExit,
    /// Trust the first empty dequeue. Sound whenever every task is enqueued
    /// before the workers start, which the seeding phase guarantees here.
    ExitOnFirstEmpty,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Number of concurrent workers (identities 1..=worker_count).
    pub worker_count: usize,
    /// Number of tasks seeded during the producer phase.
    pub task_count: usize,
    /// Simulated per-task processing duration.
    pub processing_delay: Duration,
    /// Pause between an empty dequeue and the retry that follows a failed
    /// emptiness recheck.
    pub empty_recheck_backoff: Duration,
    pub drain_policy: DrainPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            task_count: DEFAULT_TASK_COUNT,
            processing_delay: Duration::from_millis(DEFAULT_PROCESSING_DELAY_MS),
            empty_recheck_backoff: Duration::from_millis(DEFAULT_EMPTY_RECHECK_BACKOFF_MS),
            drain_policy: DrainPolicy::RecheckThenExit,
        }
    }
}
