//! Multi-threaded dispatch

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use rudux_core::{StoreAction, reducer};
use rudux_runtime::{StoreError, create_store};
use rudux_testing::{ListenerProbe, fixtures};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn concurrent_dispatches_are_serialized() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    let store = create_store(fixtures::counter(), None, None).unwrap();
    let probe = ListenerProbe::new();
    store.subscribe(probe.listener()).unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let store = store.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..PER_THREAD {
                    store.dispatch("INCREMENT").unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected = i64::try_from(THREADS * PER_THREAD).unwrap();
    assert_eq!(*store.get_state().unwrap(), expected);
    assert_eq!(probe.calls(), THREADS * PER_THREAD);
}

#[test]
fn other_threads_wait_instead_of_failing() {
    let in_reducer = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));

    let slow = {
        let in_reducer = Arc::clone(&in_reducer);
        let max_seen = Arc::clone(&max_seen);
        reducer::from_fn(move |state: Option<Arc<u64>>, action: &StoreAction<&'static str>| {
            let state = state.unwrap_or_default();
            if action.app().is_none() {
                return Ok(state);
            }
            let now = in_reducer.fetch_add(1, Ordering::SeqCst) + 1;
            max_seen.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            in_reducer.fetch_sub(1, Ordering::SeqCst);
            Ok(Arc::new(*state + 1))
        })
    };

    let store = create_store(slow, None, None).unwrap();
    let results: Vec<Result<(), StoreError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                scope.spawn(move || -> Result<(), StoreError> {
                    for _ in 0..5 {
                        store.dispatch("TICK")?;
                    }
                    Ok(())
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(*store.get_state().unwrap(), 20);
    assert_eq!(max_seen.load(Ordering::SeqCst), 1);
}

#[test]
fn readers_never_see_a_torn_state() {
    let store = create_store(fixtures::counter(), None, None).unwrap();
    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for _ in 0..500 {
                store.dispatch("INCREMENT").unwrap();
            }
        })
    };

    let mut last = 0;
    while !writer.is_finished() {
        let current = *store.get_state().unwrap();
        assert!(current >= last, "state went backwards: {last} -> {current}");
        last = current;
    }
    writer.join().unwrap();

    assert_eq!(*store.get_state().unwrap(), 500);
}
