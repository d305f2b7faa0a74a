//! Thread-safe FIFO queue shared between one producer and many consumers.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};

use crate::types::Task;

/// A synchronized FIFO queue mediating hand-off between the seeding producer
/// and the worker pool.
///
/// Every operation holds the single internal lock for the duration of one
/// call and no longer; the lock is never held across a processing delay.
/// Queue operations do not panic: a poisoned lock is recovered, since the
/// underlying sequence stays structurally valid even when a holder panicked,
/// and losing a diagnostic beats stalling the pool.
pub struct SharedQueue {
    inner: Mutex<VecDeque<Task>>,
}

impl SharedQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Task>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("queue lock poisoned; recovering state");
            poisoned.into_inner()
        })
    }

    /// Append a task at the tail.
    ///
    /// Seeding happens strictly before the workers start, but the operation
    /// takes the same lock as `dequeue` anyway so a late producer could not
    /// corrupt the sequence.
    pub fn enqueue(&self, task: Task) {
        let mut queue = self.lock();
        debug!("added {} to the queue", task.label);
        queue.push_back(task);
    }

    /// Atomically remove and return the head task, or `None` when the queue
    /// is empty. Never blocks beyond the lock acquisition itself.
    pub fn dequeue(&self) -> Option<Task> {
        self.lock().pop_front()
    }

    /// Point-in-time emptiness snapshot; may be stale immediately after
    /// returning while workers are still draining.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current number of queued tasks.
    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

impl Default for SharedQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn tasks_are_consumed_exactly_once() {
        let queue = Arc::new(SharedQueue::new());
        let total_tasks = 100;
        for id in 0..total_tasks {
            queue.enqueue(Task::new(format!("task-{id}")));
        }
        assert_eq!(queue.len(), total_tasks);

        let consumers = 4;
        let barrier = Arc::new(Barrier::new(consumers));
        let mut handles = Vec::new();
        for _ in 0..consumers {
            let queue = Arc::clone(&queue);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait();
                let mut taken = Vec::new();
                while let Some(task) = queue.dequeue() {
                    taken.push(task.label);
                }
                taken
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for label in handle.join().expect("consumer thread panicked") {
                // Each label should be observed at most once across the pool.
                assert!(seen.insert(label));
            }
        }
        assert_eq!(seen.len(), total_tasks);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn single_consumer_sees_fifo_order() {
        let queue = SharedQueue::new();
        for id in 0..10 {
            queue.enqueue(Task::new(format!("task-{id}")));
        }

        let mut drained = Vec::new();
        while let Some(task) = queue.dequeue() {
            drained.push(task.label);
        }
        let expected: Vec<String> = (0..10).map(|id| format!("task-{id}")).collect();
        assert_eq!(drained, expected);
    }

    #[test]
    fn empty_dequeue_returns_none_without_blocking() {
        let queue = SharedQueue::new();
        assert!(queue.dequeue().is_none());
        // Repeated calls stay safe and cheap.
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn emptiness_is_idempotent_once_drained() {
        let queue = SharedQueue::new();
        queue.enqueue(Task::new("only"));
        assert!(!queue.is_empty());
        assert_eq!(queue.len(), 1);

        assert!(queue.dequeue().is_some());
        for _ in 0..5 {
            assert!(queue.is_empty());
            assert_eq!(queue.len(), 0);
        }
    }
}
