//! # Rudux Runtime
//!
//! The store that owns the state tree, plus everything that plugs into it.
//!
//! ## Core Components
//!
//! - **Store**: holds state and the root reducer, dispatches actions and
//!   notifies listeners
//! - **Middleware**: wraps dispatch (`apply_middleware`)
//! - **Enhancers**: wrap store creation; composable with
//!   [`rudux_core::compose::compose`]
//! - **`StoreBuilder`**: the common setup in one place
//!
//! ## Example
//!
//! ```
//! use rudux_core::{combine_reducers, reducer, CombinedState, StoreAction};
//! use rudux_runtime::create_store;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let counter = reducer::from_fn(|state: Option<Arc<i64>>, action: &StoreAction<&'static str>| {
//!     let state = state.unwrap_or_default();
//!     Ok(match action.app() {
//!         Some(&"INCREMENT") => Arc::new(*state + 1),
//!         _ => state,
//!     })
//! });
//! let clicks = reducer::from_fn(|state: Option<Arc<u32>>, action: &StoreAction<&'static str>| {
//!     let state = state.unwrap_or_default();
//!     Ok(if action.app().is_some() { Arc::new(*state + 1) } else { state })
//! });
//!
//! let root = combine_reducers()
//!     .slice("counter", counter)
//!     .slice("clicks", clicks)
//!     .build()?;
//!
//! let store = create_store(root, None, None)?;
//! store.dispatch("INCREMENT")?;
//!
//! let state: Arc<CombinedState> = store.get_state()?;
//! assert_eq!(state.get::<i64>("counter").as_deref(), Some(&1));
//! assert_eq!(state.get::<u32>("clicks").as_deref(), Some(&1));
//! # Ok(())
//! # }
//! ```

/// Binding action creators to a dispatch function
pub mod bind;

/// Store builder
pub mod builder;

/// Store configuration
pub mod config;

/// Dispatch handles
pub mod dispatch;

mod gate;

/// Listeners and subscriptions
pub mod listeners;

/// Prometheus metrics for observability
pub mod metrics;

/// Middleware, `apply_middleware` and the built-in middleware
pub mod middleware;

/// The store
pub mod store;

/// Error types for the Store runtime
pub mod error {
    use rudux_core::{ActionError, ReducerError};
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// The dispatched action failed validation
        #[error(transparent)]
        InvalidAction(#[from] ActionError),

        /// A store operation was called from inside a reducer
        ///
        /// Same-thread only; other threads wait for the reducer to finish.
        #[error("{0}")]
        Reentrancy(String),

        /// The reducer failed or broke its contract; nothing was committed
        #[error(transparent)]
        Reducer(#[from] ReducerError),

        /// A middleware was used before the chain was complete
        #[error("{0}")]
        MiddlewareConfiguration(String),

        /// The store has no state yet
        ///
        /// Only observable before `Init` has been dispatched, e.g. from a
        /// middleware's `on_apply` with no preloaded state.
        #[error("Store has not been initialized yet")]
        NotInitialized,

        /// The dispatch function a middleware forwards to no longer exists
        #[error("Store has been dropped")]
        StoreDropped,
    }

    impl StoreError {
        /// True for [`StoreError::Reentrancy`]
        #[must_use]
        pub const fn is_reentrancy(&self) -> bool {
            matches!(self, Self::Reentrancy(_))
        }

        /// True when a reducer broke its contract, directly or in a slice
        #[must_use]
        pub fn is_contract_violation(&self) -> bool {
            matches!(self, Self::Reducer(error) if error.is_contract_violation())
        }
    }
}

pub use bind::{ActionCreator, BoundActionCreator, bind_action_creator, bind_action_creators};
pub use builder::StoreBuilder;
pub use config::{ConfigError, Environment, StoreConfig};
pub use dispatch::Dispatch;
pub use error::StoreError;
pub use listeners::{Listener, Subscription};
pub use middleware::{
    BoxedMiddleware, LoggerMiddleware, Middleware, MiddlewareApi, SerializableCheck,
    apply_middleware,
};
pub use store::{
    Enhancer, Store, StoreCreator, WeakStore, create_store, create_store_with_config,
};

#[cfg(test)]
mod tests {
    use super::*;
    use rudux_core::{ActionError, ReducerError};

    #[test]
    fn test_error_messages() {
        let err = StoreError::from(ActionError::MissingType);
        assert!(err.to_string().starts_with("Actions may not have an undefined \"type\""));

        let err = StoreError::Reentrancy("Reducers may not dispatch actions.".to_string());
        assert!(err.is_reentrancy());
        assert_eq!(err.to_string(), "Reducers may not dispatch actions.");

        let err = StoreError::from(ReducerError::Contract("bad".to_string()).in_slice("todos"));
        assert!(err.is_contract_violation());
        assert!(!StoreError::from(ReducerError::failed("boom")).is_contract_violation());
    }
}
