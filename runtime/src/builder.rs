//! `StoreBuilder`: store setup with sensible defaults
//!
//! ```
//! use rudux_core::{reducer, StoreAction};
//! use rudux_runtime::{LoggerMiddleware, StoreBuilder, StoreConfig};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), rudux_runtime::StoreError> {
//! let counter = reducer::from_fn(|state: Option<Arc<i64>>, action: &StoreAction<serde_json::Value>| {
//!     let state = state.unwrap_or_default();
//!     Ok(match action.app().and_then(|a| a["type"].as_str()) {
//!         Some("INCREMENT") => Arc::new(*state + 1),
//!         _ => state,
//!     })
//! });
//!
//! let store = StoreBuilder::new(counter)
//!     .preloaded_state(41)
//!     .config(StoreConfig::development())
//!     .with_default_middleware()
//!     .middleware(LoggerMiddleware::new())
//!     .build()?;
//!
//! store.dispatch(serde_json::json!({ "type": "INCREMENT" }))?;
//! assert_eq!(*store.get_state()?, 42);
//! # Ok(())
//! # }
//! ```

use crate::config::StoreConfig;
use crate::middleware::{BoxedMiddleware, Middleware, SerializableCheck, apply_middleware};
use crate::store::{Enhancer, Store, create_store_with_config};
use crate::StoreError;
use rudux_core::Reducer;
use rudux_core::compose::compose;
use serde::Serialize;
use std::sync::Arc;

/// Builder for a [`Store`]
///
/// Middleware is applied in the order it was added (first added is
/// outermost) around the dispatch produced by the extra enhancers.
pub struct StoreBuilder<R: Reducer> {
    reducer: R,
    preloaded_state: Option<R::State>,
    middleware: Vec<BoxedMiddleware<R::State, R::Action>>,
    enhancers: Vec<Enhancer<R::State, R::Action>>,
    config: StoreConfig,
}

impl<R: Reducer + 'static> StoreBuilder<R> {
    /// Start building a store around `reducer`
    #[must_use]
    pub fn new(reducer: R) -> Self {
        Self {
            reducer,
            preloaded_state: None,
            middleware: Vec::new(),
            enhancers: Vec::new(),
            config: StoreConfig::default(),
        }
    }

    /// State to start from instead of the reducer's initial state
    #[must_use]
    pub fn preloaded_state(mut self, state: R::State) -> Self {
        self.preloaded_state = Some(state);
        self
    }

    /// Append a middleware
    #[must_use]
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<R::State, R::Action> + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Append a store enhancer
    #[must_use]
    pub fn enhancer(mut self, enhancer: Enhancer<R::State, R::Action>) -> Self {
        self.enhancers.push(enhancer);
        self
    }

    /// Use `config` instead of [`StoreConfig::default`]
    #[must_use]
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the store and dispatch `Init`
    ///
    /// # Errors
    ///
    /// Any error raised by a middleware's `on_apply`, an enhancer or the
    /// `Init` dispatch.
    pub fn build(self) -> Result<Store<R::State, R::Action>, StoreError> {
        let mut enhancers = Vec::with_capacity(self.enhancers.len() + 1);
        if !self.middleware.is_empty() {
            enhancers.push(apply_middleware(self.middleware));
        }
        enhancers.extend(self.enhancers);

        let enhancer = (!enhancers.is_empty()).then(|| compose(enhancers));
        create_store_with_config(self.reducer, self.preloaded_state, enhancer, self.config)
    }
}

impl<R> StoreBuilder<R>
where
    R: Reducer + 'static,
    R::Action: Serialize,
{
    /// Install the development middleware ([`SerializableCheck`]).
    ///
    /// The check does nothing when the store's `dev_checks` is off.
    #[must_use]
    pub fn with_default_middleware(self) -> Self {
        self.middleware(SerializableCheck::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rudux_core::{StoreAction, reducer};
    use std::sync::Mutex;

    fn counter() -> impl Reducer<State = i64, Action = &'static str> {
        reducer::from_fn(|state: Option<Arc<i64>>, action: &StoreAction<&'static str>| {
            let state = state.unwrap_or_default();
            Ok(match action.app() {
                Some(&"INCREMENT") => Arc::new(*state + 1),
                _ => state,
            })
        })
    }

    #[test]
    fn test_builder_defaults() {
        let store = StoreBuilder::new(counter()).build().unwrap();
        assert_eq!(*store.get_state().unwrap(), 0);
        assert_eq!(store.config(), &StoreConfig::default());
    }

    #[test]
    fn test_middleware_wraps_enhanced_dispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let middleware_log = Arc::clone(&log);
        let middleware = crate::middleware::from_fn(
            move |_api: &crate::MiddlewareApi<i64, &'static str>,
                  next: &crate::Dispatch<&'static str>,
                  action: StoreAction<&'static str>| {
                middleware_log.lock().unwrap().push("middleware");
                next.call(action)
            },
        );

        let enhancer_log = Arc::clone(&log);
        let enhancer: Enhancer<i64, &'static str> = Box::new(move |create| {
            let enhancer_log = Arc::clone(&enhancer_log);
            Arc::new(move |reducer, preloaded| {
                let store = create(reducer, preloaded)?;
                let inner = store.dispatcher();
                let enhancer_log = Arc::clone(&enhancer_log);
                Ok(store.with_dispatch(crate::Dispatch::new(move |action| {
                    enhancer_log.lock().unwrap().push("enhancer");
                    inner.call(action)
                })))
            })
        });

        let store = StoreBuilder::new(counter())
            .preloaded_state(1)
            .middleware(middleware)
            .enhancer(enhancer)
            .build()
            .unwrap();

        log.lock().unwrap().clear();
        store.dispatch("INCREMENT").unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["middleware", "enhancer"]);
        assert_eq!(*store.get_state().unwrap(), 2);
    }

    #[test]
    fn test_production_config_is_kept() {
        let store = StoreBuilder::new(counter())
            .config(StoreConfig::production())
            .build()
            .unwrap();
        assert!(!store.config().dev_checks);
    }
}
