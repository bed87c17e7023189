//! Tests for #[derive(Action)] macro

#![allow(clippy::unwrap_used)]

use rudux_core::{Action, Reducer, ReducerError, StoreAction, reducer};
use rudux_macros::Action;
use std::sync::Arc;

#[derive(Action, Clone, Debug, PartialEq)]
enum TodoAction {
    AddTodo { text: String },
    ToggleTodo(usize),
    #[action(rename = "todos/clear")]
    ClearCompleted,
}

#[derive(Action, Clone, Debug)]
#[action(prefix = "counter/")]
enum CounterAction {
    Increment,
    Decrement,
    #[action(rename = "reset")]
    Reset,
}

#[derive(Action, Clone, Debug)]
struct SetVisibilityFilter {
    filter: String,
}

#[derive(Action, Clone, Debug)]
#[action(rename = "app/ready")]
struct Ready;

#[derive(Action, Clone, Debug)]
enum Loaded<T: Clone + std::fmt::Debug + Send + Sync + 'static> {
    HttpResponse(T),
    Empty,
}

#[test]
fn test_variant_names_become_screaming_snake_case() {
    let add = TodoAction::AddTodo {
        text: "Read the docs".to_string(),
    };

    assert_eq!(add.action_type(), Some("ADD_TODO"));
    assert_eq!(TodoAction::ToggleTodo(3).action_type(), Some("TOGGLE_TODO"));
}

#[test]
fn test_rename_overrides_variant_name() {
    assert_eq!(TodoAction::ClearCompleted.action_type(), Some("todos/clear"));
}

#[test]
fn test_prefix_applies_to_every_variant() {
    assert_eq!(CounterAction::Increment.action_type(), Some("counter/INCREMENT"));
    assert_eq!(CounterAction::Decrement.action_type(), Some("counter/DECREMENT"));
    assert_eq!(CounterAction::Reset.action_type(), Some("counter/reset"));
}

#[test]
fn test_action_types_constant_lists_declaration_order() {
    assert_eq!(
        TodoAction::ACTION_TYPES,
        &["ADD_TODO", "TOGGLE_TODO", "todos/clear"]
    );
    assert_eq!(
        CounterAction::ACTION_TYPES,
        &["counter/INCREMENT", "counter/DECREMENT", "counter/reset"]
    );
}

#[test]
fn test_structs_have_a_single_type() {
    let action = SetVisibilityFilter {
        filter: "SHOW_ALL".to_string(),
    };
    assert_eq!(action.action_type(), Some("SET_VISIBILITY_FILTER"));
    assert_eq!(action.filter, "SHOW_ALL");
    assert_eq!(Ready.action_type(), Some("app/ready"));
    assert_eq!(SetVisibilityFilter::ACTION_TYPES, &["SET_VISIBILITY_FILTER"]);
}

#[test]
fn test_generic_actions() {
    assert_eq!(Loaded::HttpResponse(7_u32).action_type(), Some("HTTP_RESPONSE"));
    assert_eq!(Loaded::<u32>::Empty.action_type(), Some("EMPTY"));
}

#[test]
fn test_derived_actions_validate() {
    assert!(TodoAction::ClearCompleted.validate().is_ok());
    assert!(StoreAction::App(CounterAction::Increment).validate().is_ok());
}

#[test]
fn test_derived_actions_drive_a_reducer() {
    let counter = reducer::from_fn(
        |state: Option<Arc<i64>>, action: &StoreAction<CounterAction>| -> Result<Arc<i64>, ReducerError> {
            let state = state.unwrap_or_default();
            Ok(match action.app() {
                Some(CounterAction::Increment) => Arc::new(*state + 1),
                Some(CounterAction::Decrement) => Arc::new(*state - 1),
                Some(CounterAction::Reset) => Arc::new(0),
                None => state,
            })
        },
    );

    let state = counter.reduce(None, &StoreAction::Init).unwrap();
    let state = counter
        .reduce(Some(state), &StoreAction::App(CounterAction::Increment))
        .unwrap();
    let state = counter
        .reduce(Some(state), &StoreAction::App(CounterAction::Increment))
        .unwrap();
    assert_eq!(*state, 2);

    let state = counter
        .reduce(Some(state), &StoreAction::App(CounterAction::Reset))
        .unwrap();
    assert_eq!(*state, 0);
}
