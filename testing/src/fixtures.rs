//! Small reducers shared by store tests

use rudux_core::{Reducer, ReducerError, StoreAction, reducer};
use serde_json::Value;
use std::sync::Arc;

/// Counter over string actions
///
/// `INCREMENT` adds one, `DECREMENT` subtracts one, `FAIL` returns an
/// error; everything else leaves the state untouched.
#[must_use]
pub fn counter() -> impl Reducer<State = i64, Action = &'static str> {
    reducer::from_fn(|state: Option<Arc<i64>>, action: &StoreAction<&'static str>| {
        let state = state.unwrap_or_default();
        Ok(match action.app() {
            Some(&"INCREMENT") => Arc::new(*state + 1),
            Some(&"DECREMENT") => Arc::new(*state - 1),
            Some(&"FAIL") => return Err(ReducerError::failed("counter was asked to fail")),
            _ => state,
        })
    })
}

/// Todo list over JSON actions
///
/// `{"type": "ADD_TODO", "text": …}` appends; `{"type": "CLEAR"}` empties.
#[must_use]
pub fn todos() -> impl Reducer<State = Vec<String>, Action = Value> {
    reducer::from_fn(|state: Option<Arc<Vec<String>>>, action: &StoreAction<Value>| {
        let state = state.unwrap_or_default();
        let Some(action) = action.app() else {
            return Ok(state);
        };

        Ok(match action["type"].as_str() {
            Some("ADD_TODO") => {
                let text = action["text"]
                    .as_str()
                    .ok_or_else(|| ReducerError::failed("ADD_TODO needs a \"text\" string"))?;
                let mut next = (*state).clone();
                next.push(text.to_string());
                Arc::new(next)
            },
            Some("CLEAR") if !state.is_empty() => Arc::new(Vec::new()),
            _ => state,
        })
    })
}
