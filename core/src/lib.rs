//! # Rudux Core
//!
//! Core traits and types for the Rudux state container.
//!
//! This crate provides the pure half of the architecture: what an action is,
//! what a reducer is, and how reducers and functions compose. The store that
//! owns state, runs middleware and notifies subscribers lives in
//! `rudux-runtime`.
//!
//! ## Core Concepts
//!
//! - **Action**: A value with a `type` describing something that happened
//! - **`StoreAction`**: The envelope reducers see (application action or an internal one)
//! - **Reducer**: Pure function `(Option<State>, Action) → State`
//! - **State**: Shared as `Arc<S>`; "unchanged" means the same `Arc`
//!
//! ## Architecture Principles
//!
//! - Single source of truth
//! - State is read-only
//! - Changes are made with pure functions
//!
//! ## Example
//!
//! ```
//! use rudux_core::{Action, Reducer, ReducerError, StoreAction};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug)]
//! enum TodoAction {
//!     Add(String),
//! }
//!
//! impl Action for TodoAction {
//!     fn action_type(&self) -> Option<&str> {
//!         Some("todos/add")
//!     }
//! }
//!
//! struct TodoReducer;
//!
//! impl Reducer for TodoReducer {
//!     type State = Vec<String>;
//!     type Action = TodoAction;
//!
//!     fn reduce(
//!         &self,
//!         state: Option<Arc<Vec<String>>>,
//!         action: &StoreAction<TodoAction>,
//!     ) -> Result<Arc<Vec<String>>, ReducerError> {
//!         let state = state.unwrap_or_default();
//!         match action.app() {
//!             Some(TodoAction::Add(title)) => {
//!                 let mut todos = (*state).clone();
//!                 todos.push(title.clone());
//!                 Ok(Arc::new(todos))
//!             },
//!             None => Ok(state),
//!         }
//!     }
//! }
//! ```

/// Actions and the store's reserved action types
pub mod action;

/// Error types for actions and reducers
pub mod error;

/// Reducer trait and helpers
pub mod reducer;

/// Reducer composition (`combine_reducers`, `scope_reducer`, `reduce_reducers`)
pub mod composition;

/// Right-to-left function composition
pub mod compose;

pub use action::{Action, StoreAction, action_types};
pub use composition::{CombinedReducer, CombinedState, combine_reducers, scope_reducer};
pub use error::{ActionError, ReducerError};
pub use reducer::{BoxedReducer, Reducer, same_state};
