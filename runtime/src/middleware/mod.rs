//! Middleware and [`apply_middleware`]
//!
//! A middleware sits between `dispatch` and the reducer. Each one receives
//! the action and a `next` dispatch; it may pass the action on (possibly
//! changed), swallow it, dispatch other actions, or return early.
//!
//! ```text
//! dispatch(a) → m1 → m2 → … → mN → reducer
//! ```
//!
//! Code before `next` runs outermost-first, code after `next` runs
//! innermost-first.

mod logger;
mod serializable;

pub use logger::LoggerMiddleware;
pub use serializable::SerializableCheck;

use crate::config::StoreConfig;
use crate::dispatch::{Dispatch, WeakDispatch};
use crate::store::{Enhancer, Store, StoreCreator};
use crate::StoreError;
use rudux_core::compose::{Composable, compose};
use rudux_core::{Action, BoxedReducer, StoreAction};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

/// A shared, type-erased middleware
pub type BoxedMiddleware<S, A> = Arc<dyn Middleware<S, A>>;

/// Middleware trait
///
/// # Example
///
/// ```
/// use rudux_core::StoreAction;
/// use rudux_runtime::{Dispatch, Middleware, MiddlewareApi, StoreError};
///
/// struct DropPings;
///
/// impl Middleware<i64, &'static str> for DropPings {
///     fn handle(
///         &self,
///         _api: &MiddlewareApi<i64, &'static str>,
///         next: &Dispatch<&'static str>,
///         action: StoreAction<&'static str>,
///     ) -> Result<StoreAction<&'static str>, StoreError> {
///         if action.app() == Some(&"PING") {
///             return Ok(action);
///         }
///         next.call(action)
///     }
/// }
/// ```
pub trait Middleware<S, A>: Send + Sync {
    /// Called once when the middleware is applied to a store.
    ///
    /// `api.get_state()` works here; `api.dispatch()` does not, since the
    /// chain is not built yet.
    ///
    /// # Errors
    ///
    /// An error aborts store creation.
    fn on_apply(&self, api: &MiddlewareApi<S, A>) -> Result<(), StoreError> {
        let _ = api;
        Ok(())
    }

    /// Handle one dispatched action
    ///
    /// # Errors
    ///
    /// Errors propagate to the caller of `dispatch`.
    fn handle(
        &self,
        api: &MiddlewareApi<S, A>,
        next: &Dispatch<A>,
        action: StoreAction<A>,
    ) -> Result<StoreAction<A>, StoreError>;
}

/// What a middleware can see of its store
///
/// `dispatch` goes through the *whole* chain, including this middleware.
pub struct MiddlewareApi<S, A> {
    store: Store<S, A>,
    dispatch: Arc<OnceLock<WeakDispatch<A>>>,
}

impl<S, A> MiddlewareApi<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    /// The store's current state
    ///
    /// # Errors
    ///
    /// See [`Store::get_state`].
    pub fn get_state(&self) -> Result<Arc<S>, StoreError> {
        self.store.get_state()
    }

    /// Dispatch an application action through the full chain
    ///
    /// # Errors
    ///
    /// [`StoreError::MiddlewareConfiguration`] while the chain is being
    /// built, otherwise any error the dispatch raises.
    pub fn dispatch(&self, action: A) -> Result<StoreAction<A>, StoreError> {
        self.call(StoreAction::App(action))
    }

    /// Dispatch an envelope through the full chain
    ///
    /// # Errors
    ///
    /// Same as [`MiddlewareApi::dispatch`].
    pub fn call(&self, action: StoreAction<A>) -> Result<StoreAction<A>, StoreError> {
        let Some(weak) = self.dispatch.get() else {
            return Err(StoreError::MiddlewareConfiguration(
                "Dispatching while constructing your middleware is not allowed. \
                 Other middleware would not be applied to this dispatch."
                    .to_string(),
            ));
        };
        let dispatch = weak.upgrade().ok_or(StoreError::StoreDropped)?;
        dispatch.call(action)
    }

    /// The store's configuration
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        self.store.config()
    }
}

impl<S, A> fmt::Debug for MiddlewareApi<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareApi")
            .field("ready", &self.dispatch.get().is_some())
            .finish_non_exhaustive()
    }
}

/// A middleware backed by a closure
///
/// Created by [`from_fn`].
pub struct FnMiddleware<F, S, A> {
    f: F,
    _phantom: PhantomData<fn() -> (S, A)>,
}

/// Build a middleware from a closure
///
/// ```
/// use rudux_core::StoreAction;
/// use rudux_runtime::{Dispatch, MiddlewareApi, middleware};
///
/// let tracer = middleware::from_fn(
///     |_api: &MiddlewareApi<i64, &'static str>,
///      next: &Dispatch<&'static str>,
///      action: StoreAction<&'static str>| {
///         tracing::info!(?action, "before");
///         next.call(action)
///     },
/// );
/// # let _ = tracer;
/// ```
pub const fn from_fn<F, S, A>(f: F) -> FnMiddleware<F, S, A>
where
    F: Fn(&MiddlewareApi<S, A>, &Dispatch<A>, StoreAction<A>) -> Result<StoreAction<A>, StoreError>
        + Send
        + Sync,
{
    FnMiddleware {
        f,
        _phantom: PhantomData,
    }
}

impl<F, S, A> Middleware<S, A> for FnMiddleware<F, S, A>
where
    F: Fn(&MiddlewareApi<S, A>, &Dispatch<A>, StoreAction<A>) -> Result<StoreAction<A>, StoreError>
        + Send
        + Sync,
{
    fn handle(
        &self,
        api: &MiddlewareApi<S, A>,
        next: &Dispatch<A>,
        action: StoreAction<A>,
    ) -> Result<StoreAction<A>, StoreError> {
        (self.f)(api, next, action)
    }
}

impl<F, S, A> fmt::Debug for FnMiddleware<F, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware").finish_non_exhaustive()
    }
}

/// Build an enhancer that runs every dispatch through `middlewares`.
///
/// The first middleware is the outermost. With an empty list the store is
/// returned unchanged.
///
/// # Example
///
/// ```
/// use rudux_core::{reducer, StoreAction};
/// use rudux_runtime::{apply_middleware, create_store, BoxedMiddleware, LoggerMiddleware};
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
/// let logger: BoxedMiddleware<i64, &'static str> = Arc::new(LoggerMiddleware::new());
/// let store = create_store(counter, None, Some(apply_middleware(vec![logger])))?;
/// store.dispatch("INCREMENT")?;
/// assert_eq!(*store.get_state()?, 1);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn apply_middleware<S, A>(middlewares: Vec<BoxedMiddleware<S, A>>) -> Enhancer<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    Box::new(move |create: StoreCreator<S, A>| {
        let middlewares = middlewares.clone();
        let creator: StoreCreator<S, A> = Arc::new(
            move |reducer: BoxedReducer<S, A>, preloaded: Option<Arc<S>>| {
                let store = create(reducer, preloaded)?;
                if middlewares.is_empty() {
                    return Ok(store);
                }

                let ready = Arc::new(OnceLock::new());
                let api = Arc::new(MiddlewareApi {
                    store: store.clone(),
                    dispatch: Arc::clone(&ready),
                });

                for middleware in &middlewares {
                    middleware.on_apply(&api)?;
                }

                let chain: Vec<Composable<Dispatch<A>>> = middlewares
                    .iter()
                    .map(|middleware| wrap(Arc::clone(middleware), Arc::clone(&api)))
                    .collect();
                let dispatch = compose(chain)(store.dispatcher());

                if ready.set(dispatch.downgrade()).is_err() {
                    return Err(StoreError::MiddlewareConfiguration(
                        "Middleware chain was built twice.".to_string(),
                    ));
                }

                tracing::debug!(count = middlewares.len(), "Middleware applied");
                Ok(store.with_dispatch(dispatch))
            },
        );
        creator
    })
}

fn wrap<S, A>(
    middleware: BoxedMiddleware<S, A>,
    api: Arc<MiddlewareApi<S, A>>,
) -> Composable<Dispatch<A>>
where
    S: Send + Sync + 'static,
    A: Action,
{
    Box::new(move |next: Dispatch<A>| {
        let middleware = Arc::clone(&middleware);
        let api = Arc::clone(&api);
        Dispatch::new(move |action| middleware.handle(&api, &next, action))
    })
}
