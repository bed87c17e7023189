//! Counter example binary
//!
//! Runs a counter and a todo list through one store, logging every action
//! and printing the Prometheus metrics at the end.

use counter::{AppAction, add_todo, app_reducer, count, todos};
use rudux_runtime::metrics::install_prometheus_recorder;
use rudux_runtime::{LoggerMiddleware, StoreBuilder, StoreConfig, bind_action_creator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter=debug,rudux_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let metrics = install_prometheus_recorder()?;
    let config = StoreConfig::from_env()?;

    println!("=== Counter Example: Rudux ===\n");

    let store = StoreBuilder::new(app_reducer()?)
        .config(config)
        .middleware(LoggerMiddleware::new().without_state().skip_internal())
        .with_default_middleware()
        .build()?;

    let watcher = store.downgrade();
    let subscription = store.subscribe(move || {
        let Some(store) = watcher.upgrade() else { return };
        if let Ok(state) = store.get_state() {
            tracing::debug!(count = count(&state), todos = todos(&state).len(), "State changed");
        }
    })?;

    let state = store.get_state()?;
    println!("Initial count: {}", count(&state));

    for action in [
        AppAction::Increment,
        AppAction::Increment,
        AppAction::Increment,
        AppAction::Decrement,
    ] {
        println!("\n>>> Dispatching: {action:?}");
        store.dispatch(action)?;
        let state = store.get_state()?;
        println!("Count: {}", count(&state));
    }

    let add = bind_action_creator(|text: String| add_todo(text), &store.dispatcher());
    add.call("Read the store docs".to_string())?;
    add.call("Write a reducer".to_string())?;
    store.dispatch(AppAction::ToggleTodo { id: 0 })?;

    println!("\nTodos:");
    let state = store.get_state()?;
    for todo in todos(&state).iter() {
        let mark = if todo.completed { 'x' } else { ' ' };
        println!("  [{mark}] {} {}", todo.id, todo.text);
    }

    if let Err(error) = store.dispatch(add_todo("")) {
        println!("\nRejected empty todo: {error}");
    }

    store.dispatch(AppAction::ClearCompleted)?;
    store.dispatch(AppAction::Reset)?;
    subscription.unsubscribe()?;

    let state = store.get_state()?;
    println!(
        "\nFinal: count = {}, todos left = {}",
        count(&state),
        todos(&state).len()
    );

    println!("\n=== Metrics ===\n{}", metrics.render());
    Ok(())
}
