//! Reducer exclusion for a single store.
//!
//! Only one reducer call runs per store at a time. Other threads wait for
//! their turn; the thread that is currently inside the reducer is refused
//! outright, since waiting on itself would deadlock.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

pub(crate) struct DispatchGate {
    serial: Mutex<()>,
    owner: Mutex<Option<ThreadId>>,
}

impl DispatchGate {
    pub(crate) const fn new() -> Self {
        Self {
            serial: Mutex::new(()),
            owner: Mutex::new(None),
        }
    }

    /// True if the calling thread is running this store's reducer
    pub(crate) fn is_reducing_here(&self) -> bool {
        *lock(&self.owner) == Some(thread::current().id())
    }

    /// Wait for exclusive access to the reducer.
    ///
    /// Returns `None` if the calling thread already holds it.
    pub(crate) fn enter(&self) -> Option<GateGuard<'_>> {
        if self.is_reducing_here() {
            return None;
        }

        let serial = lock(&self.serial);
        *lock(&self.owner) = Some(thread::current().id());

        Some(GateGuard {
            owner: &self.owner,
            _serial: serial,
        })
    }
}

/// Clears the owner marker on drop, including when the reducer panics.
pub(crate) struct GateGuard<'a> {
    owner: &'a Mutex<Option<ThreadId>>,
    _serial: MutexGuard<'a, ()>,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        *lock(self.owner) = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
