use super::{Middleware, MiddlewareApi};
use crate::StoreError;
use crate::dispatch::Dispatch;
use crate::metrics::SERIALIZABLE_CHECK_FAILURES;
use rudux_core::{Action, StoreAction};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Development check: every application action must serialize to JSON.
///
/// A failing action is logged with `tracing::error!` and still forwarded.
/// The check is skipped when the store's `dev_checks` is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializableCheck {
    warn_after: Option<Duration>,
}

impl SerializableCheck {
    /// A check that warns after the store's `warn_after`
    #[must_use]
    pub const fn new() -> Self {
        Self { warn_after: None }
    }

    /// Override the slow-check warning threshold
    #[must_use]
    pub const fn with_warn_after(mut self, threshold: Duration) -> Self {
        self.warn_after = Some(threshold);
        self
    }
}

impl<S, A> Middleware<S, A> for SerializableCheck
where
    S: Send + Sync + 'static,
    A: Action + Serialize,
{
    fn handle(
        &self,
        api: &MiddlewareApi<S, A>,
        next: &Dispatch<A>,
        action: StoreAction<A>,
    ) -> Result<StoreAction<A>, StoreError> {
        let config = api.config();
        if !config.dev_checks {
            return next.call(action);
        }

        if let Some(app) = action.app() {
            let start = Instant::now();
            if let Err(error) = serde_json::to_value(app) {
                metrics::counter!(SERIALIZABLE_CHECK_FAILURES).increment(1);
                tracing::error!(
                    action_type = app.action_type().unwrap_or_default(),
                    %error,
                    "A non-serializable value was detected in an action"
                );
            }

            let elapsed = start.elapsed();
            let threshold = self.warn_after.unwrap_or(config.warn_after);
            if elapsed > threshold {
                tracing::warn!(
                    elapsed_ms = elapsed.as_millis(),
                    threshold_ms = threshold.as_millis(),
                    "SerializableCheck took longer than the warning threshold"
                );
            }
        }

        next.call(action)
    }
}
