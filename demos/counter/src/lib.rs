//! # Counter Example
//!
//! A counter and a todo list sharing one Rudux store.
//!
//! This example showcases:
//! - Deriving [`Action`](rudux_core::Action) for an application enum
//! - Slice reducers that return the incoming state when nothing changes
//! - `combine_reducers` to build the root reducer
//! - Store usage with middleware
//!
//! ## Example
//!
//! ```
//! use counter::{app_reducer, count, AppAction};
//! use rudux_runtime::create_store;
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = create_store(app_reducer()?, None, None)?;
//!
//! store.dispatch(AppAction::Increment)?;
//! let state = store.get_state()?;
//! assert_eq!(count(&state), 1);
//! # Ok(())
//! # }
//! ```

use rudux_core::{
    CombinedReducer, CombinedState, Reducer, ReducerError, StoreAction, combine_reducers,
};
use rudux_macros::Action;
use serde::Serialize;
use std::sync::Arc;

/// Key of the counter slice
pub const COUNTER_KEY: &str = "counter";

/// Key of the todos slice
pub const TODOS_KEY: &str = "todos";

/// Application actions
///
/// Every slice reducer sees every action and ignores the ones it does not
/// handle.
#[derive(Action, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AppAction {
    /// Increment the counter by 1
    Increment,
    /// Decrement the counter by 1
    Decrement,
    /// Reset the counter to 0
    Reset,
    /// Append a todo
    AddTodo {
        /// What to do
        text: String,
    },
    /// Flip a todo's `completed` flag
    #[action(rename = "TOGGLE")]
    ToggleTodo {
        /// Id of the todo
        id: usize,
    },
    /// Remove completed todos
    ClearCompleted,
}

/// Create an [`AppAction::AddTodo`]
#[must_use]
pub fn add_todo(text: impl Into<String>) -> AppAction {
    AppAction::AddTodo { text: text.into() }
}

/// Counter state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CounterState {
    /// Current count value
    pub count: i64,
}

/// A todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    /// Stable id, assigned in creation order
    pub id: usize,
    /// What to do
    pub text: String,
    /// Whether it is done
    pub completed: bool,
}

/// Counter reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterReducer;

impl Reducer for CounterReducer {
    type State = CounterState;
    type Action = AppAction;

    fn reduce(
        &self,
        state: Option<Arc<CounterState>>,
        action: &StoreAction<AppAction>,
    ) -> Result<Arc<CounterState>, ReducerError> {
        let state = state.unwrap_or_default();

        let count = match action.app() {
            Some(AppAction::Increment) => state.count.checked_add(1),
            Some(AppAction::Decrement) => state.count.checked_sub(1),
            Some(AppAction::Reset) if state.count != 0 => Some(0),
            _ => return Ok(state),
        }
        .ok_or_else(|| ReducerError::failed("counter out of range"))?;

        Ok(Arc::new(CounterState { count }))
    }
}

/// Todo list reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct TodosReducer;

impl Reducer for TodosReducer {
    type State = Vec<Todo>;
    type Action = AppAction;

    fn reduce(
        &self,
        state: Option<Arc<Vec<Todo>>>,
        action: &StoreAction<AppAction>,
    ) -> Result<Arc<Vec<Todo>>, ReducerError> {
        let state = state.unwrap_or_default();

        match action.app() {
            Some(AppAction::AddTodo { text }) => {
                if text.trim().is_empty() {
                    return Err(ReducerError::failed("todo text may not be empty"));
                }
                let id = state.iter().map(|todo| todo.id + 1).max().unwrap_or(0);
                let mut todos = (*state).clone();
                todos.push(Todo {
                    id,
                    text: text.clone(),
                    completed: false,
                });
                Ok(Arc::new(todos))
            },
            Some(AppAction::ToggleTodo { id }) if state.iter().any(|todo| todo.id == *id) => {
                let todos = state
                    .iter()
                    .map(|todo| Todo {
                        completed: todo.completed ^ (todo.id == *id),
                        ..todo.clone()
                    })
                    .collect();
                Ok(Arc::new(todos))
            },
            Some(AppAction::ClearCompleted) if state.iter().any(|todo| todo.completed) => Ok(
                Arc::new(state.iter().filter(|todo| !todo.completed).cloned().collect()),
            ),
            _ => Ok(state),
        }
    }
}

/// The root reducer: `counter` and `todos` slices
///
/// # Errors
///
/// Returns [`ReducerError::Contract`] if a slice reducer breaks the reducer
/// contract.
pub fn app_reducer() -> Result<CombinedReducer<AppAction>, ReducerError> {
    combine_reducers()
        .slice(COUNTER_KEY, CounterReducer)
        .slice(TODOS_KEY, TodosReducer)
        .build()
}

/// Current count, 0 if the slice is missing
#[must_use]
pub fn count(state: &CombinedState) -> i64 {
    state
        .get::<CounterState>(COUNTER_KEY)
        .map_or(0, |counter| counter.count)
}

/// Current todos, empty if the slice is missing
#[must_use]
pub fn todos(state: &CombinedState) -> Arc<Vec<Todo>> {
    state.get::<Vec<Todo>>(TODOS_KEY).unwrap_or_default()
}
