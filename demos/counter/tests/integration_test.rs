//! Integration tests for Counter with Store
//!
//! These tests drive the combined root reducer through a real store.

#![allow(clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/panic

use counter::{
    AppAction, COUNTER_KEY, CounterState, TODOS_KEY, add_todo, app_reducer, count, todos,
};
use proptest::prelude::*;
use rudux_core::CombinedState;
use rudux_runtime::{LoggerMiddleware, StoreBuilder, StoreConfig, create_store};
use rudux_testing::{ActionRecorder, ListenerProbe, init_tracing};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn test_counter_with_store() {
    let store = create_store(app_reducer().unwrap(), None, None).unwrap();
    assert_eq!(count(&store.get_state().unwrap()), 0);

    store.dispatch(AppAction::Increment).unwrap();
    assert_eq!(count(&store.get_state().unwrap()), 1);

    store.dispatch(AppAction::Increment).unwrap();
    assert_eq!(count(&store.get_state().unwrap()), 2);

    store.dispatch(AppAction::Decrement).unwrap();
    assert_eq!(count(&store.get_state().unwrap()), 1);

    store.dispatch(AppAction::Reset).unwrap();
    assert_eq!(count(&store.get_state().unwrap()), 0);
}

#[test]
fn test_overflow_is_an_error_not_a_panic() {
    let preloaded = CombinedState::new().with(COUNTER_KEY, CounterState { count: i64::MAX });
    let store = create_store(app_reducer().unwrap(), Some(preloaded), None).unwrap();

    let error = store.dispatch(AppAction::Increment).unwrap_err();
    assert!(error.to_string().contains("counter out of range"), "{error}");
    assert_eq!(count(&store.get_state().unwrap()), i64::MAX);

    store.dispatch(AppAction::Decrement).unwrap();
    assert_eq!(count(&store.get_state().unwrap()), i64::MAX - 1);
}

#[test]
fn test_slices_change_independently() {
    let store = create_store(app_reducer().unwrap(), None, None).unwrap();
    let before = store.get_state().unwrap();

    store.dispatch(add_todo("write tests")).unwrap();
    let after = store.get_state().unwrap();

    assert_eq!(todos(&after).len(), 1);
    assert!(Arc::ptr_eq(
        &before.get::<CounterState>(COUNTER_KEY).unwrap(),
        &after.get::<CounterState>(COUNTER_KEY).unwrap()
    ));

    // Nothing to clear: the whole tree keeps its reference
    store.dispatch(AppAction::ClearCompleted).unwrap();
    assert!(Arc::ptr_eq(&after, &store.get_state().unwrap()));
}

#[test]
fn test_todo_flow_through_middleware() {
    init_tracing();
    let recorder = ActionRecorder::<AppAction>::new();
    let probe = ListenerProbe::new();
    let store = StoreBuilder::new(app_reducer().unwrap())
        .config(StoreConfig::development())
        .middleware(LoggerMiddleware::new())
        .middleware(recorder.clone())
        .with_default_middleware()
        .build()
        .unwrap();
    store.subscribe(probe.listener()).unwrap();

    store.dispatch(add_todo("first")).unwrap();
    store.dispatch(add_todo("second")).unwrap();
    store.dispatch(AppAction::ToggleTodo { id: 0 }).unwrap();
    store.dispatch(AppAction::ClearCompleted).unwrap();

    let remaining = todos(&store.get_state().unwrap());
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].text, "second");
    assert_eq!(remaining[0].id, 1);

    assert_eq!(recorder.app_actions().len(), 4);
    assert_eq!(probe.calls(), 4);
}

#[test]
fn test_rejected_todo_keeps_state() {
    let store = create_store(app_reducer().unwrap(), None, None).unwrap();
    let probe = ListenerProbe::new();
    store.subscribe(probe.listener()).unwrap();

    let error = store.dispatch(add_todo("")).unwrap_err();
    assert!(error.to_string().contains("todo text may not be empty"));
    assert!(todos(&store.get_state().unwrap()).is_empty());
    assert_eq!(probe.calls(), 0);
}

#[test]
fn test_concurrent_increments() {
    let store = create_store(app_reducer().unwrap(), None, None).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || store.dispatch(AppAction::Increment))
        })
        .collect();

    for handle in handles {
        if let Err(e) = handle.join().unwrap() {
            panic!("concurrent increment failed: {e}");
        }
    }

    assert_eq!(count(&store.get_state().unwrap()), 10);
}

#[test]
fn test_state_isolation() {
    let store1 = create_store(app_reducer().unwrap(), None, None).unwrap();
    let store2 = create_store(app_reducer().unwrap(), None, None).unwrap();

    store1.dispatch(AppAction::Increment).unwrap();
    store1.dispatch(AppAction::Increment).unwrap();
    store2.dispatch(AppAction::Increment).unwrap();

    assert_eq!(count(&store1.get_state().unwrap()), 2);
    assert_eq!(count(&store2.get_state().unwrap()), 1);
}

#[test]
fn test_preloaded_large_count() {
    let preloaded = CombinedState::new().with(COUNTER_KEY, CounterState { count: i64::MAX - 5 });
    let store = create_store(app_reducer().unwrap(), Some(preloaded), None).unwrap();

    for _ in 0..3 {
        store.dispatch(AppAction::Increment).unwrap();
    }
    let state = store.get_state().unwrap();
    assert_eq!(count(&state), i64::MAX - 2);
    assert!(state.contains_key(TODOS_KEY));

    store.dispatch(AppAction::Reset).unwrap();
    assert_eq!(count(&store.get_state().unwrap()), 0);
}

fn app_action() -> impl Strategy<Value = AppAction> {
    prop_oneof![
        Just(AppAction::Increment),
        Just(AppAction::Decrement),
        Just(AppAction::Reset),
        "[a-z]{1,10}".prop_map(|text: String| add_todo(text)),
        (0_usize..5).prop_map(|id| AppAction::ToggleTodo { id }),
        Just(AppAction::ClearCompleted),
    ]
}

proptest! {
    #[test]
    fn todo_ids_stay_unique(actions in prop::collection::vec(app_action(), 0..40)) {
        let store = create_store(app_reducer().unwrap(), None, None).unwrap();
        for action in actions {
            store.dispatch(action).unwrap();
        }

        let state = store.get_state().unwrap();
        let list = todos(&state);
        let ids: HashSet<usize> = list.iter().map(|todo| todo.id).collect();
        prop_assert_eq!(ids.len(), list.len());
    }
}
