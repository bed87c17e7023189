//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Give each named slice of a composite state its own reducer
//! - **`scope_reducer`**: Focus a reducer on one field of a typed parent state
//! - **`reduce_reducers`**: Run several reducers over the same state, in order
//!
//! # Examples
//!
//! ## Combining Reducers
//!
//! ```
//! use rudux_core::composition::{combine_reducers, CombinedState};
//! use rudux_core::{reducer, Reducer, StoreAction};
//! use std::sync::Arc;
//!
//! let counter = reducer::from_fn(|state: Option<Arc<i64>>, action: &StoreAction<&'static str>| {
//!     let state = state.unwrap_or_default();
//!     Ok(match action.app() {
//!         Some(&"INCREMENT") => Arc::new(*state + 1),
//!         _ => state,
//!     })
//! });
//! let label = reducer::from_fn(|state: Option<Arc<String>>, _action: &StoreAction<&'static str>| {
//!     Ok(state.unwrap_or_else(|| Arc::new("clicks".to_string())))
//! });
//!
//! let root = combine_reducers()
//!     .slice("counter", counter)
//!     .slice("label", label)
//!     .build()
//!     .unwrap();
//!
//! let state = root.reduce(None, &StoreAction::Init).unwrap();
//! let state = root.reduce(Some(state), &StoreAction::App("INCREMENT")).unwrap();
//! assert_eq!(state.get::<i64>("counter").as_deref(), Some(&1));
//! assert_eq!(state.get::<String>("label").as_deref().map(String::as_str), Some("clicks"));
//! ```

use crate::action::{Action, StoreAction, action_types};
use crate::error::ReducerError;
use crate::reducer::{BoxedReducer, Reducer};
use std::any::{Any, type_name};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

type SliceValue = Arc<dyn Any + Send + Sync>;

/// Composite state produced by [`CombinedReducer`]
///
/// An ordered map from slice key to that slice's state. Slices may hold
/// values of different types; read them back with [`CombinedState::get`].
#[derive(Clone, Default)]
pub struct CombinedState {
    slices: Vec<(String, SliceValue)>,
}

impl CombinedState {
    /// Create an empty composite state
    #[must_use]
    pub const fn new() -> Self {
        Self { slices: Vec::new() }
    }

    /// Set the value of a slice (used to build preloaded state)
    #[must_use]
    pub fn with<T: Any + Send + Sync>(self, key: impl Into<String>, value: T) -> Self {
        self.with_arc(key, Arc::new(value))
    }

    /// Set the value of a slice from an existing reference
    #[must_use]
    pub fn with_arc<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: Arc<T>) -> Self {
        let key = key.into();
        let value: SliceValue = value;
        match self.slices.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.slices.push((key, value)),
        }
        self
    }

    /// Read a slice as `T`
    ///
    /// Returns `None` if the key is missing or holds a different type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.raw(key)
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    /// True if the state has a slice under `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Slice keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|(key, _)| key.as_str())
    }

    /// Number of slices
    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// True if there are no slices
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    fn raw(&self, key: &str) -> Option<&SliceValue> {
        self.slices
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }
}

impl std::fmt::Debug for CombinedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedState")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A reducer for one slice, with its state type erased
trait SliceReducer<A>: Send + Sync {
    fn reduce_slice(
        &self,
        state: Option<SliceValue>,
        action: &StoreAction<A>,
    ) -> Result<SliceValue, ReducerError>;
}

struct Slice<R>(R);

impl<R> SliceReducer<R::Action> for Slice<R>
where
    R: Reducer,
{
    fn reduce_slice(
        &self,
        state: Option<SliceValue>,
        action: &StoreAction<R::Action>,
    ) -> Result<SliceValue, ReducerError> {
        let typed = state
            .map(|value| {
                value.downcast::<R::State>().map_err(|_| {
                    ReducerError::Contract(format!(
                        "state holds a value that is not a `{}`",
                        type_name::<R::State>()
                    ))
                })
            })
            .transpose()?;

        let next: SliceValue = self.0.reduce(typed, action)?;
        Ok(next)
    }
}

/// Start building a combined reducer
///
/// Add slices with [`CombineReducers::slice`], then call
/// [`CombineReducers::build`].
#[must_use]
pub fn combine_reducers<A: Action>() -> CombineReducers<A> {
    CombineReducers {
        slices: Vec::new(),
        checks: cfg!(debug_assertions),
    }
}

/// Builder for [`CombinedReducer`]
///
/// Created by [`combine_reducers`].
pub struct CombineReducers<A> {
    slices: Vec<(String, Box<dyn SliceReducer<A>>)>,
    checks: bool,
}

impl<A: Action> CombineReducers<A> {
    /// Register the reducer for slice `key`
    ///
    /// Registering a key twice replaces the earlier reducer but keeps its position.
    #[must_use]
    pub fn slice<R>(mut self, key: impl Into<String>, reducer: R) -> Self
    where
        R: Reducer<Action = A> + 'static,
    {
        let key = key.into();
        let reducer: Box<dyn SliceReducer<A>> = Box::new(Slice(reducer));
        match self.slices.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = reducer,
            None => self.slices.push((key, reducer)),
        }
        self
    }

    /// Enable or disable development checks
    ///
    /// Defaults to enabled in debug builds.
    #[must_use]
    pub const fn with_checks(mut self, enabled: bool) -> Self {
        self.checks = enabled;
        self
    }

    /// Finish the combined reducer
    ///
    /// With checks enabled, every slice reducer is first asked for its initial
    /// state and probed with a random unknown action.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::Contract`] naming the first slice that fails either probe.
    pub fn build(self) -> Result<CombinedReducer<A>, ReducerError> {
        if self.checks {
            for (key, reducer) in &self.slices {
                assert_slice_shape(key, reducer.as_ref())?;
            }
        }

        Ok(CombinedReducer {
            slices: self.slices,
            checks: self.checks,
            unexpected_key_cache: Mutex::new(HashSet::new()),
        })
    }
}

fn assert_slice_shape<A: Action>(
    key: &str,
    reducer: &dyn SliceReducer<A>,
) -> Result<(), ReducerError> {
    if let Err(error) = reducer.reduce_slice(None, &StoreAction::Init) {
        return Err(ReducerError::Contract(format!(
            "The slice reducer for key \"{key}\" failed during initialization ({error}). \
             If the state passed to the reducer is None, you must explicitly return the \
             initial state."
        )));
    }

    if let Err(error) = reducer.reduce_slice(None, &StoreAction::probe()) {
        return Err(ReducerError::Contract(format!(
            "The slice reducer for key \"{key}\" failed when probed with a random type ({error}). \
             Don't try to handle '{}' or other actions in the \"{}\" namespace. They are \
             considered private. Instead, you must return the current state for any unknown \
             actions, unless it is None, in which case you must return the initial state, \
             regardless of the action type.",
            action_types::init(),
            action_types::PREFIX,
        )));
    }

    Ok(())
}

/// A reducer over [`CombinedState`], one reducer per slice
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<A> {
    slices: Vec<(String, Box<dyn SliceReducer<A>>)>,
    checks: bool,
    unexpected_key_cache: Mutex<HashSet<String>>,
}

impl<A: Action> CombinedReducer<A> {
    /// Keys of the registered slices, in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|(key, _)| key.as_str())
    }

    /// Development warning about the shape of an incoming state, if any
    ///
    /// Each unexpected key is reported only once. Keys that first appear
    /// during a `Replace` are remembered without being reported.
    #[must_use]
    pub fn state_shape_warning(
        &self,
        state: &CombinedState,
        action: &StoreAction<A>,
    ) -> Option<String> {
        if self.slices.is_empty() {
            return Some(
                "Store does not have a valid reducer. Make sure the combined reducer has at \
                 least one slice."
                    .to_string(),
            );
        }

        let unexpected: Vec<&str> = {
            let mut cache = self
                .unexpected_key_cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            state
                .keys()
                .filter(|key| !self.slices.iter().any(|(k, _)| k.as_str() == *key))
                .filter(|key| cache.insert((*key).to_string()))
                .collect()
        };

        if unexpected.is_empty() || matches!(action, StoreAction::Replace) {
            return None;
        }

        let argument = if matches!(action, StoreAction::Init) {
            "preloaded state passed to the store"
        } else {
            "previous state received by the reducer"
        };
        let noun = if unexpected.len() > 1 { "keys" } else { "key" };
        let expected = self.keys().collect::<Vec<_>>().join("\", \"");

        Some(format!(
            "Unexpected {noun} \"{}\" found in {argument}. Expected to find one of the known \
             reducer keys instead: \"{expected}\". Unexpected keys will be ignored.",
            unexpected.join("\", \""),
        ))
    }
}

impl<A: Action> Reducer for CombinedReducer<A> {
    type State = CombinedState;
    type Action = A;

    fn reduce(
        &self,
        state: Option<Arc<CombinedState>>,
        action: &StoreAction<A>,
    ) -> Result<Arc<CombinedState>, ReducerError> {
        if self.checks {
            if let Some(warning) = state
                .as_deref()
                .and_then(|state| self.state_shape_warning(state, action))
            {
                tracing::warn!("{warning}");
            }
        }

        let mut has_changed = false;
        let mut next = CombinedState {
            slices: Vec::with_capacity(self.slices.len()),
        };

        for (key, reducer) in &self.slices {
            let previous = state.as_deref().and_then(|state| state.raw(key)).cloned();
            let next_slice = reducer
                .reduce_slice(previous.clone(), action)
                .map_err(|error| error.in_slice(key.as_str()))?;

            has_changed = has_changed
                || previous.is_none_or(|previous| !Arc::ptr_eq(&previous, &next_slice));
            next.slices.push((key.clone(), next_slice));
        }

        // Unexpected keys are dropped, which is a change in itself
        has_changed = has_changed
            || state
                .as_deref()
                .is_none_or(|state| state.len() != self.slices.len());

        match state {
            Some(state) if !has_changed => Ok(state),
            _ => Ok(Arc::new(next)),
        }
    }
}

/// Scopes a reducer to operate on one field of a larger state.
///
/// This allows you to reuse reducers designed for smaller state types
/// within a larger, typed application state. The parent is rebuilt only when
/// the child returns a new reference.
///
/// # Examples
///
/// ```
/// use rudux_core::composition::scope_reducer;
/// use rudux_core::{reducer, Reducer, StoreAction};
/// use std::sync::Arc;
///
/// #[derive(Debug, Default)]
/// struct AppState {
///     counter: Arc<i64>,
///     title: String,
/// }
///
/// let counter = reducer::from_fn(|state: Option<Arc<i64>>, action: &StoreAction<&'static str>| {
///     let state = state.unwrap_or_default();
///     Ok(match action.app() {
///         Some(&"INCREMENT") => Arc::new(*state + 1),
///         _ => state,
///     })
/// });
///
/// let scoped = scope_reducer(
///     counter,
///     |app: &AppState| &app.counter,
///     |app: &AppState, counter| AppState { counter, title: app.title.clone() },
/// );
///
/// let state = scoped.reduce(None, &StoreAction::App("INCREMENT")).unwrap();
/// assert_eq!(*state.counter, 1);
/// ```
pub fn scope_reducer<P, R>(
    reducer: R,
    get_state: fn(&P) -> &Arc<R::State>,
    set_state: fn(&P, Arc<R::State>) -> P,
) -> ScopedReducer<P, R>
where
    P: Default + Send + Sync + 'static,
    R: Reducer,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
    }
}

/// A scoped reducer that operates on one field of a parent state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<P, R>
where
    R: Reducer,
{
    reducer: R,
    get_state: fn(&P) -> &Arc<R::State>,
    set_state: fn(&P, Arc<R::State>) -> P,
}

impl<P, R> Reducer for ScopedReducer<P, R>
where
    P: Default + Send + Sync + 'static,
    R: Reducer,
{
    type State = P;
    type Action = R::Action;

    fn reduce(
        &self,
        state: Option<Arc<P>>,
        action: &StoreAction<Self::Action>,
    ) -> Result<Arc<P>, ReducerError> {
        match state {
            None => {
                // The child starts from its own initial state
                let child = self.reducer.reduce(None, action)?;
                Ok(Arc::new((self.set_state)(&P::default(), child)))
            },
            Some(parent) => {
                let child = Arc::clone((self.get_state)(&parent));
                let next = self.reducer.reduce(Some(Arc::clone(&child)), action)?;

                if Arc::ptr_eq(&child, &next) {
                    Ok(parent)
                } else {
                    Ok(Arc::new((self.set_state)(&parent, next)))
                }
            },
        }
    }
}

/// Runs several reducers over the same state, in order.
///
/// Each reducer receives the state produced by the previous one; the first
/// receives the incoming state. An empty list returns the incoming state, or
/// `S::default()` when there is none.
#[must_use]
pub fn reduce_reducers<S, A>(reducers: Vec<BoxedReducer<S, A>>) -> SequencedReducer<S, A>
where
    S: Default + Send + Sync + 'static,
    A: Action,
{
    SequencedReducer { reducers }
}

/// A reducer that runs a list of reducers in sequence.
///
/// Created by [`reduce_reducers`].
pub struct SequencedReducer<S, A> {
    reducers: Vec<BoxedReducer<S, A>>,
}

impl<S, A> Reducer for SequencedReducer<S, A>
where
    S: Default + Send + Sync + 'static,
    A: Action,
{
    type State = S;
    type Action = A;

    fn reduce(
        &self,
        state: Option<Arc<S>>,
        action: &StoreAction<A>,
    ) -> Result<Arc<S>, ReducerError> {
        let mut current = state;
        for reducer in &self.reducers {
            current = Some(reducer.reduce(current, action)?);
        }
        Ok(current.unwrap_or_default())
    }
}
