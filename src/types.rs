//! Shared identifiers and the task model used across the system.

/// Unique identifier for a worker thread (1-based).
pub type WorkerId = u64;

/// Opaque unit of work handed from the producer to the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Human-readable label identifying the task in logs and reports.
    pub label: String,
}

impl Task {
    /// Construct a new task with the provided label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}
