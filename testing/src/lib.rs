//! # Rudux Testing
//!
//! Testing utilities and helpers for Rudux.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Recording middleware and listeners ([`ActionRecorder`], [`ListenerProbe`])
//! - Small fixture reducers and proptest strategies
//!
//! ## Example
//!
//! ```
//! use rudux_runtime::create_store;
//! use rudux_testing::{fixtures, ListenerProbe};
//!
//! # fn main() -> Result<(), rudux_runtime::StoreError> {
//! let store = create_store(fixtures::counter(), None, None)?;
//! let probe = ListenerProbe::new();
//! store.subscribe(probe.listener())?;
//!
//! store.dispatch("INCREMENT")?;
//!
//! assert_eq!(*store.get_state()?, 1);
//! assert_eq!(probe.calls(), 1);
//! # Ok(())
//! # }
//! ```


/// Recording middleware and listeners
pub mod mocks;

/// Fixture reducers
pub mod fixtures;

/// Property-based testing utilities
pub mod properties;

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a `tracing` subscriber that writes through the test harness.
    ///
    /// Honors `RUST_LOG` (default `debug`). Safe to call from every test;
    /// only the first call installs anything.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_tracing;
pub use mocks::{ActionRecorder, ListenerProbe};
pub use reducer_test::{ReducerTest, assertions};
