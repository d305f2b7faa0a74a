//! Cooperative cancellation shared between the coordinator and its workers.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Cloneable cancellation handle.
///
/// `cancel` wakes every in-flight [`sleep`](CancelToken::sleep) immediately,
/// so a worker parked in its simulated processing delay observes the signal
/// without waiting the delay out.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake all sleepers.
    pub fn cancel(&self) {
        let mut flag = self.lock();
        *flag = true;
        self.inner.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// Returns `true` when the full duration elapsed and `false` when the
    /// sleep was cut short (or the token was already cancelled on entry).
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut flag = self.lock();
        loop {
            if *flag {
                return false;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return true;
            }
            let (guard, _) = self
                .inner
                .wake
                .wait_timeout(flag, remaining)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            flag = guard;
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
