//! Counting semaphore.

use std::sync::{Condvar, Mutex, MutexGuard};

/// A non-negative counter with blocking decrement.
///
/// `wait` blocks while the count is zero and then decrements it,
/// `try_wait` is the non-blocking form, and `signal` increments the count
/// and wakes one waiter.
#[derive(Debug)]
pub struct Semaphore {
    count: Mutex<usize>,
    condition: Condvar,
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Semaphore {
    pub fn new(count: usize) -> Self {
        Self {
            count: Mutex::new(count),
            condition: Condvar::new(),
        }
    }

    /// Decrements the count if it is positive. Returns false without
    /// blocking when the count is zero.
    pub fn try_wait(&self) -> bool {
        let mut count = self.lock();
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }

    pub fn wait(&self) {
        let mut count = self.lock();
        while *count == 0 {
            count = match self.condition.wait(count) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        *count -= 1;
    }

    pub fn signal(&self) {
        let mut count = self.lock();
        *count += 1;
        drop(count);
        self.condition.notify_one();
    }

    /// Current count. Only meaningful as a snapshot.
    pub fn count(&self) -> usize {
        *self.lock()
    }

    // A poisoned counter is still a valid counter.
    fn lock(&self) -> MutexGuard<'_, usize> {
        match self.count.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
