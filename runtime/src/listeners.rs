//! Change listeners and subscription handles
//!
//! The listener list is copy-on-write: a dispatch notifies the snapshot that
//! was current when notification started, so subscribing or unsubscribing
//! from inside a listener only affects the next dispatch.

use crate::StoreError;
use crate::gate::DispatchGate;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// A change listener. It receives nothing; read the store to see what changed.
///
/// The store owns its listeners, so reach it through a
/// [`WeakStore`](crate::WeakStore) from [`Store::downgrade`](crate::Store::downgrade).
pub type Listener = Arc<dyn Fn() + Send + Sync>;

type Entries = Arc<Vec<(u64, Listener)>>;

pub(crate) struct ListenerSet {
    entries: Mutex<Entries>,
    next_id: AtomicU64,
}

impl ListenerSet {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Arc::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    pub(crate) fn add(&self, listener: Listener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Arc::make_mut(&mut *self.lock()).push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut entries = self.lock();
        let Some(index) = entries.iter().position(|(entry, _)| *entry == id) else {
            return false;
        };
        Arc::make_mut(&mut *entries).remove(index);
        true
    }

    /// The listeners to notify for the dispatch that just finished
    pub(crate) fn snapshot(&self) -> Entries {
        Arc::clone(&self.lock())
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle returned by `Store::subscribe`
///
/// Dropping the handle does *not* unsubscribe; call
/// [`Subscription::unsubscribe`]. Clones share the same registration.
/// Listeners live as long as the store, so they must not hold a strong
/// [`Store`](crate::Store) handle.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    listeners: Weak<ListenerSet>,
    gate: Weak<DispatchGate>,
}

impl Subscription {
    pub(crate) fn new(id: u64, listeners: &Arc<ListenerSet>, gate: &Arc<DispatchGate>) -> Self {
        Self {
            id,
            active: Arc::new(AtomicBool::new(true)),
            listeners: Arc::downgrade(listeners),
            gate: Arc::downgrade(gate),
        }
    }

    /// Remove the listener. Calling this more than once is a no-op.
    ///
    /// A dispatch already notifying listeners still calls this one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Reentrancy`] when called from inside a reducer.
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        if !self.active.load(Ordering::Acquire) {
            return Ok(());
        }

        if self
            .gate
            .upgrade()
            .is_some_and(|gate| gate.is_reducing_here())
        {
            return Err(StoreError::Reentrancy(
                "You may not unsubscribe from a store listener while the reducer is executing."
                    .to_string(),
            ));
        }

        if self.active.swap(false, Ordering::AcqRel) {
            if let Some(listeners) = self.listeners.upgrade() {
                listeners.remove(self.id);
            }
            tracing::trace!(subscription = self.id, "Listener unsubscribed");
        }
        Ok(())
    }

    /// False once [`Subscription::unsubscribe`] has succeeded
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
