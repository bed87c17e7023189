//! The Reducer trait - core abstraction for state transitions
//!
//! A reducer is a pure function `(state, action) → state`:
//!
//! - `state` is `None` the first time the reducer runs (no preloaded state);
//!   the reducer must then return its initial state.
//! - For actions it does not handle (including the store's internal ones)
//!   it must return the incoming state unchanged, i.e. the same [`Arc`].
//! - It never mutates its input; a change produces a new [`Arc`].

use crate::action::{Action, StoreAction};
use crate::error::ReducerError;
use std::marker::PhantomData;
use std::sync::Arc;

/// The Reducer trait
///
/// # Example
///
/// ```
/// use rudux_core::{Action, Reducer, ReducerError, StoreAction};
/// use std::sync::Arc;
///
/// #[derive(Clone, Debug)]
/// enum CounterAction {
///     Increment,
/// }
///
/// impl Action for CounterAction {
///     fn action_type(&self) -> Option<&str> {
///         Some("INCREMENT")
///     }
/// }
///
/// struct CounterReducer;
///
/// impl Reducer for CounterReducer {
///     type State = i64;
///     type Action = CounterAction;
///
///     fn reduce(
///         &self,
///         state: Option<Arc<i64>>,
///         action: &StoreAction<CounterAction>,
///     ) -> Result<Arc<i64>, ReducerError> {
///         let state = state.unwrap_or_default();
///         Ok(match action.app() {
///             Some(CounterAction::Increment) => Arc::new(*state + 1),
///             None => state,
///         })
///     }
/// }
///
/// let next = CounterReducer.reduce(None, &StoreAction::Init).unwrap();
/// assert_eq!(*next, 0);
/// ```
pub trait Reducer: Send + Sync {
    /// The state this reducer produces
    type State: Send + Sync + 'static;

    /// The application action type this reducer processes
    type Action: Action;

    /// Compute the next state
    ///
    /// # Errors
    ///
    /// Returns a [`ReducerError`] when the reducer rejects the action. The
    /// store commits nothing in that case.
    fn reduce(
        &self,
        state: Option<Arc<Self::State>>,
        action: &StoreAction<Self::Action>,
    ) -> Result<Arc<Self::State>, ReducerError>;
}

/// A type-erased, shareable reducer
pub type BoxedReducer<S, A> = Arc<dyn Reducer<State = S, Action = A>>;

impl<R: Reducer + ?Sized> Reducer for Arc<R> {
    type State = R::State;
    type Action = R::Action;

    fn reduce(
        &self,
        state: Option<Arc<Self::State>>,
        action: &StoreAction<Self::Action>,
    ) -> Result<Arc<Self::State>, ReducerError> {
        (**self).reduce(state, action)
    }
}

impl<R: Reducer + ?Sized> Reducer for Box<R> {
    type State = R::State;
    type Action = R::Action;

    fn reduce(
        &self,
        state: Option<Arc<Self::State>>,
        action: &StoreAction<Self::Action>,
    ) -> Result<Arc<Self::State>, ReducerError> {
        (**self).reduce(state, action)
    }
}

/// A reducer backed by a closure
///
/// Created by [`from_fn`].
pub struct FnReducer<F, S, A> {
    f: F,
    _phantom: PhantomData<fn() -> (S, A)>,
}

impl<F, S, A> std::fmt::Debug for FnReducer<F, S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnReducer").finish_non_exhaustive()
    }
}

/// Build a reducer from a closure
///
/// ```
/// use rudux_core::{reducer, Reducer, StoreAction};
/// use std::sync::Arc;
///
/// let names = reducer::from_fn(|state: Option<Arc<Vec<String>>>, action: &StoreAction<&'static str>| {
///     let state = state.unwrap_or_default();
///     Ok(match action.app() {
///         Some(name) => {
///             let mut next = (*state).clone();
///             next.push((*name).to_string());
///             Arc::new(next)
///         },
///         None => state,
///     })
/// });
///
/// let state = names.reduce(None, &StoreAction::App("ada")).unwrap();
/// assert_eq!(*state, vec!["ada".to_string()]);
/// ```
pub const fn from_fn<F, S, A>(f: F) -> FnReducer<F, S, A>
where
    F: Fn(Option<Arc<S>>, &StoreAction<A>) -> Result<Arc<S>, ReducerError> + Send + Sync,
    S: Send + Sync + 'static,
    A: Action,
{
    FnReducer {
        f,
        _phantom: PhantomData,
    }
}

impl<F, S, A> Reducer for FnReducer<F, S, A>
where
    F: Fn(Option<Arc<S>>, &StoreAction<A>) -> Result<Arc<S>, ReducerError> + Send + Sync,
    S: Send + Sync + 'static,
    A: Action,
{
    type State = S;
    type Action = A;

    fn reduce(
        &self,
        state: Option<Arc<S>>,
        action: &StoreAction<A>,
    ) -> Result<Arc<S>, ReducerError> {
        (self.f)(state, action)
    }
}

/// True if two state references point at the same allocation
///
/// This is the "nothing changed" test used throughout the crate.
#[must_use]
pub fn same_state<S: ?Sized>(a: &Arc<S>, b: &Arc<S>) -> bool {
    Arc::ptr_eq(a, b)
}
