//! Property-based testing utilities using proptest.

use proptest::prelude::*;
use serde_json::{Value, json};

/// Action names understood by [`crate::fixtures::counter`], plus one it ignores
pub const COUNTER_ACTIONS: &[&str] = &["INCREMENT", "DECREMENT", "NOOP"];

/// A single counter action
pub fn counter_action() -> impl Strategy<Value = &'static str> {
    prop::sample::select(COUNTER_ACTIONS)
}

/// A sequence of counter actions
pub fn counter_actions(max_len: usize) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(counter_action(), 0..=max_len)
}

/// A well-formed JSON action understood by [`crate::fixtures::todos`]
pub fn todo_action() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z ]{1,12}".prop_map(|text| json!({ "type": "ADD_TODO", "text": text })),
        Just(json!({ "type": "CLEAR" })),
        "[A-Z]{1,8}".prop_map(|kind| json!({ "type": format!("OTHER_{kind}") })),
    ]
}

/// A JSON value that is not a valid action
pub fn invalid_json_action() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
        Just(Value::Null),
        Just(json!([1, 2, 3])),
        Just(json!({ "payload": 1 })),
        any::<bool>().prop_map(|flag| json!({ "type": flag })),
    ]
}
