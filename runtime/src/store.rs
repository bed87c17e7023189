//! The store: state, root reducer, listeners and dispatch.
//!
//! # Dispatch
//!
//! 1. The action is validated ([`Action::validate`]).
//! 2. A reducer call from the same thread is refused with
//!    [`StoreError::Reentrancy`]; calls from other threads wait their turn.
//! 3. The root reducer runs with the current state. On error nothing is
//!    committed and no listener runs.
//! 4. The new state is committed and every listener registered when
//!    notification starts is called, in subscription order.
//!
//! Listeners run after the reducer lock is released, so they may dispatch.

use crate::config::StoreConfig;
use crate::dispatch::{Dispatch, WeakDispatch};
use crate::gate::DispatchGate;
use crate::listeners::{Listener, ListenerSet, Subscription};
use crate::metrics::{DISPATCH_ERRORS, DISPATCH_TOTAL, LISTENERS_NOTIFIED, REDUCER_DURATION};
use crate::StoreError;
use rudux_core::compose::Composable;
use rudux_core::{Action, BoxedReducer, Reducer, StoreAction};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Instant;

/// Creates a store from a root reducer and optional preloaded state.
///
/// The store it returns has not seen `Init` yet; [`create_store`] dispatches
/// it once every enhancer has been applied.
pub type StoreCreator<S, A> = Arc<
    dyn Fn(BoxedReducer<S, A>, Option<Arc<S>>) -> Result<Store<S, A>, StoreError> + Send + Sync,
>;

/// Wraps a store creator to extend the stores it creates.
///
/// Enhancers compose with [`rudux_core::compose::compose`].
pub type Enhancer<S, A> = Composable<StoreCreator<S, A>>;

pub(crate) struct StoreCore<S, A> {
    state: RwLock<Option<Arc<S>>>,
    reducer: RwLock<BoxedReducer<S, A>>,
    listeners: Arc<ListenerSet>,
    gate: Arc<DispatchGate>,
    config: StoreConfig,
}

impl<S, A> StoreCore<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    fn get_state(&self) -> Result<Arc<S>, StoreError> {
        if self.gate.is_reducing_here() {
            return Err(StoreError::Reentrancy(
                "You may not call get_state() while the reducer is executing. \
                 The reducer has already received the state as an argument. \
                 Pass it down from the top reducer instead of reading it from the store."
                    .to_string(),
            ));
        }
        read(&self.state).clone().ok_or(StoreError::NotInitialized)
    }

    fn dispatch(&self, action: StoreAction<A>) -> Result<StoreAction<A>, StoreError> {
        if let Err(error) = action.validate() {
            metrics::counter!(DISPATCH_ERRORS).increment(1);
            tracing::debug!(%error, "Rejected invalid action");
            return Err(error.into());
        }

        let action_type = action.action_type().unwrap_or_default().to_string();
        let span = tracing::debug_span!("store_dispatch", action_type = %action_type);
        let _entered = span.enter();

        {
            let Some(_guard) = self.gate.enter() else {
                metrics::counter!(DISPATCH_ERRORS).increment(1);
                return Err(StoreError::Reentrancy(
                    "Reducers may not dispatch actions.".to_string(),
                ));
            };

            let reducer = Arc::clone(&*read(&self.reducer));
            let current = read(&self.state).clone();

            let start = Instant::now();
            let result = reducer.reduce(current, &action);
            let elapsed = start.elapsed();

            metrics::counter!(DISPATCH_TOTAL).increment(1);
            metrics::histogram!(REDUCER_DURATION).record(elapsed.as_secs_f64());
            if self.config.dev_checks && elapsed > self.config.warn_after {
                tracing::warn!(
                    elapsed_ms = elapsed.as_millis(),
                    threshold_ms = self.config.warn_after.as_millis(),
                    "Reducer took longer than the warning threshold"
                );
            }

            let next = result.inspect_err(|error| {
                metrics::counter!(DISPATCH_ERRORS).increment(1);
                tracing::debug!(%error, "Reducer failed, state left unchanged");
            })?;

            *write(&self.state) = Some(next);
        }

        self.notify();
        Ok(action)
    }

    fn notify(&self) {
        let snapshot = self.listeners.snapshot();
        if snapshot.is_empty() {
            return;
        }

        metrics::counter!(LISTENERS_NOTIFIED)
            .increment(u64::try_from(snapshot.len()).unwrap_or(u64::MAX));
        for (_, listener) in snapshot.iter() {
            listener();
        }
    }

    fn subscribe(&self, listener: Listener) -> Result<Subscription, StoreError> {
        if self.gate.is_reducing_here() {
            return Err(StoreError::Reentrancy(
                "You may not call subscribe() while the reducer is executing.".to_string(),
            ));
        }

        let id = self.listeners.add(listener);
        tracing::trace!(subscription = id, "Listener subscribed");
        Ok(Subscription::new(id, &self.listeners, &self.gate))
    }
}

/// A Redux-style store
///
/// Holds the current state tree and the root reducer. Cloning a store clones
/// the handle; every clone sees the same state and listeners.
///
/// # Example
///
/// ```
/// use rudux_core::{reducer, StoreAction};
/// use rudux_runtime::create_store;
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
/// let store = create_store(counter, None, None)?;
/// assert_eq!(*store.get_state()?, 0);
///
/// store.dispatch("INCREMENT")?;
/// assert_eq!(*store.get_state()?, 1);
/// # Ok(())
/// # }
/// ```
pub struct Store<S, A> {
    core: Arc<StoreCore<S, A>>,
    dispatch: Dispatch<A>,
}

impl<S, A> Store<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    /// A store that has not been initialized yet; `dispatch` goes straight
    /// to the reducer.
    pub(crate) fn from_parts(
        reducer: BoxedReducer<S, A>,
        preloaded_state: Option<Arc<S>>,
        config: StoreConfig,
    ) -> Self {
        let core = Arc::new(StoreCore {
            state: RwLock::new(preloaded_state),
            reducer: RwLock::new(reducer),
            listeners: Arc::new(ListenerSet::new()),
            gate: Arc::new(DispatchGate::new()),
            config,
        });

        let base = Arc::clone(&core);
        let dispatch = Dispatch::new(move |action| base.dispatch(action));

        Self { core, dispatch }
    }

    /// The same store with a different dispatch function.
    ///
    /// Enhancers use this to install a wrapped dispatch; state, listeners
    /// and reducer stay shared with `self`.
    #[must_use]
    pub fn with_dispatch(&self, dispatch: Dispatch<A>) -> Self {
        Self {
            core: Arc::clone(&self.core),
            dispatch,
        }
    }

    /// Dispatch an application action
    ///
    /// Returns the action as it left the dispatch chain.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidAction`] if the action fails validation
    /// - [`StoreError::Reentrancy`] if called from inside a reducer
    /// - [`StoreError::Reducer`] if the reducer fails; state is unchanged
    /// - Any error raised by middleware
    pub fn dispatch(&self, action: A) -> Result<StoreAction<A>, StoreError> {
        self.dispatch.dispatch(action)
    }

    /// The store's current dispatch function
    #[must_use]
    pub fn dispatcher(&self) -> Dispatch<A> {
        self.dispatch.clone()
    }

    /// The current state tree
    ///
    /// # Errors
    ///
    /// - [`StoreError::Reentrancy`] if called from inside a reducer
    /// - [`StoreError::NotInitialized`] before the first dispatch of a
    ///   store that had no preloaded state
    pub fn get_state(&self) -> Result<Arc<S>, StoreError> {
        self.core.get_state()
    }

    /// Register a change listener
    ///
    /// The listener is called after every successful dispatch. A listener
    /// added during notification is first called on the next dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Reentrancy`] if called from inside a reducer.
    pub fn subscribe<F>(&self, listener: F) -> Result<Subscription, StoreError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.core.subscribe(Arc::new(listener))
    }

    /// Observe the state: `observer` is called now with the current state
    /// and again after every dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Reentrancy`] if called from inside a reducer.
    pub fn observe<F>(&self, observer: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&Arc<S>) + Send + Sync + 'static,
    {
        let observer = Arc::new(observer);

        match self.core.get_state() {
            Ok(state) => observer(&state),
            Err(StoreError::NotInitialized) => {},
            Err(error) => return Err(error),
        }

        let core: Weak<StoreCore<S, A>> = Arc::downgrade(&self.core);
        self.core.subscribe(Arc::new(move || {
            let Some(core) = core.upgrade() else {
                return;
            };
            if let Ok(state) = core.get_state() {
                observer(&state);
            }
        }))
    }

    /// Replace the root reducer, then dispatch `Replace` so every slice can
    /// fill in its initial state.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Reentrancy`] if called from inside a reducer
    /// - Any error from dispatching `Replace`; the new reducer stays installed
    pub fn replace_reducer<R>(&self, next: R) -> Result<(), StoreError>
    where
        R: Reducer<State = S, Action = A> + 'static,
    {
        if self.core.gate.is_reducing_here() {
            return Err(StoreError::Reentrancy(
                "You may not call replace_reducer() while the reducer is executing.".to_string(),
            ));
        }

        *write(&self.core.reducer) = Arc::new(next);
        tracing::debug!("Root reducer replaced");

        self.dispatch.call(StoreAction::Replace)?;
        Ok(())
    }

    /// Configuration the store was created with
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.core.config
    }

    /// Number of registered listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.core.listeners.len()
    }

    /// A handle that does not keep the store alive
    ///
    /// Listeners are owned by the store, so a listener holding a [`Store`]
    /// keeps its own store alive forever. Capture a [`WeakStore`] instead.
    ///
    /// ```
    /// use rudux_core::{reducer, StoreAction};
    /// use rudux_runtime::create_store;
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
    /// let store = create_store(counter, None, None)?;
    /// let handle = store.downgrade();
    /// store.subscribe(move || {
    ///     if let Some(store) = handle.upgrade() {
    ///         println!("count is now {:?}", store.get_state());
    ///     }
    /// })?;
    /// store.dispatch("INCREMENT")?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn downgrade(&self) -> WeakStore<S, A> {
        WeakStore {
            core: Arc::downgrade(&self.core),
            dispatch: self.dispatch.downgrade(),
        }
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<S, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.core.config)
            .field("listeners", &self.core.listeners.len())
            .finish_non_exhaustive()
    }
}

/// Non-owning handle to a [`Store`], created by [`Store::downgrade`]
pub struct WeakStore<S, A> {
    core: Weak<StoreCore<S, A>>,
    dispatch: WeakDispatch<A>,
}

impl<S, A> WeakStore<S, A> {
    /// The store, if any strong handle to it is still alive
    #[must_use]
    pub fn upgrade(&self) -> Option<Store<S, A>> {
        Some(Store {
            core: self.core.upgrade()?,
            dispatch: self.dispatch.upgrade()?,
        })
    }
}

impl<S, A> Clone for WeakStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            core: Weak::clone(&self.core),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<S, A> fmt::Debug for WeakStore<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore")
            .field("alive", &(self.core.strong_count() > 0))
            .finish_non_exhaustive()
    }
}

/// Create a store with the default [`StoreConfig`].
///
/// `enhancer` (for example the result of
/// [`apply_middleware`](crate::apply_middleware)) wraps the base creator.
/// Once the enhanced store exists, `Init` is dispatched through its final
/// dispatch so the reducer produces the initial state.
///
/// # Errors
///
/// Any error raised by an enhancer or by the `Init` dispatch.
pub fn create_store<R>(
    reducer: R,
    preloaded_state: Option<R::State>,
    enhancer: Option<Enhancer<R::State, R::Action>>,
) -> Result<Store<R::State, R::Action>, StoreError>
where
    R: Reducer + 'static,
{
    create_store_with_config(reducer, preloaded_state, enhancer, StoreConfig::default())
}

/// Create a store with an explicit [`StoreConfig`].
///
/// # Errors
///
/// Any error raised by an enhancer or by the `Init` dispatch.
pub fn create_store_with_config<R>(
    reducer: R,
    preloaded_state: Option<R::State>,
    enhancer: Option<Enhancer<R::State, R::Action>>,
    config: StoreConfig,
) -> Result<Store<R::State, R::Action>, StoreError>
where
    R: Reducer + 'static,
{
    let base: StoreCreator<R::State, R::Action> = Arc::new(move |reducer, preloaded| {
        Ok(Store::from_parts(reducer, preloaded, config.clone()))
    });

    let creator = match enhancer {
        Some(enhance) => enhance(base),
        None => base,
    };

    let store = creator(Arc::new(reducer), preloaded_state.map(Arc::new))?;
    store.dispatch.call(StoreAction::Init)?;

    tracing::debug!(
        dev_checks = store.core.config.dev_checks,
        "Store created"
    );
    Ok(store)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
