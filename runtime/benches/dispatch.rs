//! Dispatch benchmarks
//!
//! - Root reducer alone, plain and combined
//! - Store dispatch with and without middleware
//! - Listener fan-out
//!
//! Run with: `cargo bench -p rudux-runtime`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rudux_core::{Reducer, StoreAction, combine_reducers, reducer};
use rudux_runtime::{BoxedMiddleware, LoggerMiddleware, apply_middleware, create_store};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct BenchState {
    counter: i64,
    data: Vec<u8>,
}

fn bench_reducer() -> impl Reducer<State = BenchState, Action = &'static str> {
    reducer::from_fn(|state: Option<Arc<BenchState>>, action: &StoreAction<&'static str>| {
        let state = state.unwrap_or_else(|| {
            Arc::new(BenchState {
                counter: 0,
                // 1KB payload so clones are not free
                data: vec![0; 1024],
            })
        });
        Ok(match action.app() {
            Some(&"INCREMENT") => Arc::new(BenchState {
                counter: state.counter + 1,
                data: state.data.clone(),
            }),
            _ => state,
        })
    })
}

fn counter() -> impl Reducer<State = i64, Action = &'static str> {
    reducer::from_fn(|state: Option<Arc<i64>>, action: &StoreAction<&'static str>| {
        let state = state.unwrap_or_default();
        Ok(match action.app() {
            Some(&"INCREMENT") => Arc::new(*state + 1),
            _ => state,
        })
    })
}

fn benchmark_reducer_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("reducer");
    group.throughput(Throughput::Elements(1));

    let plain = bench_reducer();
    let state = plain.reduce(None, &StoreAction::Init).expect("initial state");
    let increment = StoreAction::App("INCREMENT");
    let noop = StoreAction::App("NOOP");

    group.bench_function("increment", |b| {
        b.iter(|| plain.reduce(Some(Arc::clone(&state)), black_box(&increment)));
    });

    group.bench_function("unchanged", |b| {
        b.iter(|| plain.reduce(Some(Arc::clone(&state)), black_box(&noop)));
    });

    for slices in [1_usize, 8, 32] {
        let keys: Vec<String> = (0..slices).map(|i| format!("slice_{i}")).collect();
        let combined = keys
            .iter()
            .fold(combine_reducers(), |builder, key| builder.slice(key.clone(), counter()))
            .build()
            .expect("valid combination");
        let state = combined.reduce(None, &StoreAction::Init).expect("initial state");

        group.bench_with_input(BenchmarkId::new("combined", slices), &state, |b, state| {
            b.iter(|| combined.reduce(Some(Arc::clone(state)), black_box(&increment)));
        });
    }

    group.finish();
}

fn benchmark_store_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_dispatch");
    group.throughput(Throughput::Elements(1));

    group.bench_function("bare", |b| {
        let store = create_store(bench_reducer(), None, None).expect("store");
        b.iter(|| store.dispatch(black_box("INCREMENT")));
    });

    group.bench_function("with_logger", |b| {
        let logger: BoxedMiddleware<BenchState, &'static str> =
            Arc::new(LoggerMiddleware::new().without_state());
        let store = create_store(bench_reducer(), None, Some(apply_middleware(vec![logger])))
            .expect("store");
        b.iter(|| store.dispatch(black_box("INCREMENT")));
    });

    group.bench_function("dispatch_and_read_state", |b| {
        let store = create_store(bench_reducer(), None, None).expect("store");
        b.iter(|| {
            store.dispatch(black_box("INCREMENT")).expect("dispatch");
            store.get_state().map(|state| state.counter)
        });
    });

    group.finish();
}

fn benchmark_listener_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("listener_fanout");

    for listeners in [1_usize, 16, 128] {
        let store = create_store(counter(), None, None).expect("store");
        for _ in 0..listeners {
            store.subscribe(|| {}).expect("subscribe");
        }

        group.throughput(Throughput::Elements(listeners as u64));
        group.bench_with_input(BenchmarkId::from_parameter(listeners), &store, |b, store| {
            b.iter(|| store.dispatch(black_box("INCREMENT")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_reducer_execution,
    benchmark_store_dispatch,
    benchmark_listener_fanout
);
criterion_main!(benches);
