//! Recording middleware and listeners for store tests

use rudux_core::{Action, StoreAction};
use rudux_runtime::{Dispatch, Middleware, MiddlewareApi, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Middleware that records every action passing through it
///
/// Clones share the same log, so keep one clone and hand the other to the
/// store.
///
/// # Example
///
/// ```
/// use rudux_core::{action_types, reducer, StoreAction};
/// use rudux_runtime::{apply_middleware, create_store, BoxedMiddleware};
/// use rudux_testing::ActionRecorder;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), rudux_runtime::StoreError> {
/// let counter = reducer::from_fn(|state: Option<Arc<i64>>, action: &StoreAction<&'static str>| {
///     let state = state.unwrap_or_default();
///     Ok(match action.app() {
///         Some(&"INCREMENT") => Arc::new(*state + 1),
///         _ => state,
///     })
/// });
///
/// let recorder = ActionRecorder::<&'static str>::new();
/// let middleware: BoxedMiddleware<i64, &'static str> = Arc::new(recorder.clone());
/// let store = create_store(counter, None, Some(apply_middleware(vec![middleware])))?;
/// store.dispatch("INCREMENT")?;
///
/// assert_eq!(recorder.action_types(), vec![action_types::init(), "INCREMENT"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ActionRecorder<A> {
    actions: Arc<Mutex<Vec<StoreAction<A>>>>,
}

impl<A: Action> ActionRecorder<A> {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every recorded action, internal ones included
    #[must_use]
    pub fn actions(&self) -> Vec<StoreAction<A>> {
        self.lock().clone()
    }

    /// The recorded application actions
    #[must_use]
    pub fn app_actions(&self) -> Vec<A> {
        self.lock()
            .iter()
            .filter_map(|action| action.app().cloned())
            .collect()
    }

    /// The `type` of every recorded action
    #[must_use]
    pub fn action_types(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|action| action.action_type().unwrap_or_default().to_string())
            .collect()
    }

    /// Number of recorded actions
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StoreAction<A>>> {
        self.actions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: Action> Default for ActionRecorder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for ActionRecorder<A> {
    fn clone(&self) -> Self {
        Self {
            actions: Arc::clone(&self.actions),
        }
    }
}

impl<S, A> Middleware<S, A> for ActionRecorder<A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    fn handle(
        &self,
        _api: &MiddlewareApi<S, A>,
        next: &Dispatch<A>,
        action: StoreAction<A>,
    ) -> Result<StoreAction<A>, StoreError> {
        self.lock().push(action.clone());
        next.call(action)
    }
}

/// Counts listener calls
///
/// ```
/// use rudux_testing::ListenerProbe;
///
/// let probe = ListenerProbe::new();
/// let listener = probe.listener();
/// listener();
/// listener();
/// assert_eq!(probe.calls(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListenerProbe {
    calls: Arc<AtomicUsize>,
}

impl ListenerProbe {
    /// Create a probe with no calls
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that bumps this probe's count
    #[must_use]
    pub fn listener(&self) -> impl Fn() + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Number of calls so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Reset the count to zero
    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_records_and_forwards() {
        let recorder = ActionRecorder::<&'static str>::new();
        let counter = rudux_core::reducer::from_fn(
            |state: Option<Arc<u8>>, action: &StoreAction<&'static str>| {
                let state = state.unwrap_or_default();
                Ok(if action.app().is_some() { Arc::new(*state + 1) } else { state })
            },
        );
        let middleware: rudux_runtime::BoxedMiddleware<u8, &'static str> =
            Arc::new(recorder.clone());
        let store = rudux_runtime::create_store(
            counter,
            None,
            Some(rudux_runtime::apply_middleware(vec![middleware])),
        )
        .unwrap();

        store.dispatch("A").unwrap();
        store.dispatch("B").unwrap();

        assert_eq!(recorder.len(), 3);
        assert_eq!(recorder.actions()[0], StoreAction::Init);
        assert_eq!(recorder.app_actions(), vec!["A", "B"]);
        assert_eq!(*store.get_state().unwrap(), 2);

        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_listener_probe_counts() {
        let probe = ListenerProbe::new();
        let copy = probe.clone();
        let listener = probe.listener();
        listener();
        assert_eq!(copy.calls(), 1);
        probe.reset();
        assert_eq!(copy.calls(), 0);
    }
}
