//! The dispatch function a store exposes.
//!
//! A [`Dispatch`] is a cheap, cloneable handle. Middleware and enhancers
//! replace a store's dispatch by wrapping the previous one.

use crate::StoreError;
use rudux_core::{Action, StoreAction};
use std::fmt;
use std::sync::{Arc, Weak};

type DispatchFn<A> = dyn Fn(StoreAction<A>) -> Result<StoreAction<A>, StoreError> + Send + Sync;

/// A store's dispatch function
///
/// Returns the action that reached the reducer (or whatever the outermost
/// middleware chose to return).
pub struct Dispatch<A> {
    f: Arc<DispatchFn<A>>,
}

impl<A: Action> Dispatch<A> {
    /// Wrap a dispatch function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(StoreAction<A>) -> Result<StoreAction<A>, StoreError> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Dispatch an application action
    ///
    /// # Errors
    ///
    /// Any [`StoreError`] raised by middleware or the store.
    pub fn dispatch(&self, action: A) -> Result<StoreAction<A>, StoreError> {
        self.call(StoreAction::App(action))
    }

    /// Dispatch an envelope, including the store's internal actions
    ///
    /// # Errors
    ///
    /// Any [`StoreError`] raised by middleware or the store.
    pub fn call(&self, action: StoreAction<A>) -> Result<StoreAction<A>, StoreError> {
        (self.f)(action)
    }

    pub(crate) fn downgrade(&self) -> WeakDispatch<A> {
        WeakDispatch(Arc::downgrade(&self.f))
    }
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<A> fmt::Debug for Dispatch<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch").finish_non_exhaustive()
    }
}

/// Non-owning dispatch, used where a strong handle would form a cycle
pub(crate) struct WeakDispatch<A>(Weak<DispatchFn<A>>);

impl<A> WeakDispatch<A> {
    pub(crate) fn upgrade(&self) -> Option<Dispatch<A>> {
        self.0.upgrade().map(|f| Dispatch { f })
    }
}

impl<A> Clone for WeakDispatch<A> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}
