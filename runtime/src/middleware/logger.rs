use super::{Middleware, MiddlewareApi};
use crate::StoreError;
use crate::dispatch::Dispatch;
use rudux_core::{Action, StoreAction};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;

/// Logs every action passing through, with the state before and after.
///
/// Action types, and whether the state reference changed, are logged at
/// `info`; states and the full action at `debug`.
#[derive(Debug, Clone, Copy)]
pub struct LoggerMiddleware {
    log_state: bool,
    skip_internal: bool,
}

impl LoggerMiddleware {
    /// Log actions and states, including the store's internal actions
    #[must_use]
    pub const fn new() -> Self {
        Self {
            log_state: true,
            skip_internal: false,
        }
    }

    /// Log only the action, not the surrounding states
    #[must_use]
    pub const fn without_state(mut self) -> Self {
        self.log_state = false;
        self
    }

    /// Don't log `Init`, `Replace` and probe actions
    #[must_use]
    pub const fn skip_internal(mut self) -> Self {
        self.skip_internal = true;
        self
    }
}

impl Default for LoggerMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Middleware<S, A> for LoggerMiddleware
where
    S: Debug + Send + Sync + 'static,
    A: Action,
{
    fn handle(
        &self,
        api: &MiddlewareApi<S, A>,
        next: &Dispatch<A>,
        action: StoreAction<A>,
    ) -> Result<StoreAction<A>, StoreError> {
        if self.skip_internal && action.is_internal() {
            return next.call(action);
        }

        let action_type = action.action_type().unwrap_or("<untyped>").to_string();
        let prev = api.get_state().ok();

        tracing::info!(action_type = %action_type, "Action dispatched");
        tracing::debug!(?action, "Action payload");
        if self.log_state {
            if let Some(prev) = &prev {
                tracing::debug!(state = ?prev, "Previous state");
            }
        }

        let start = Instant::now();
        let result = next.call(action);
        let elapsed_us = start.elapsed().as_micros();

        match &result {
            Ok(_) => {
                let next_state = api.get_state().ok();
                let changed = match (&prev, &next_state) {
                    (Some(before), Some(after)) => !Arc::ptr_eq(before, after),
                    (None, None) => false,
                    _ => true,
                };
                tracing::info!(action_type = %action_type, changed, elapsed_us, "Action reduced");
                if self.log_state {
                    if let Some(next_state) = &next_state {
                        tracing::debug!(state = ?next_state, "Next state");
                    }
                }
            },
            Err(error) => {
                tracing::warn!(action_type = %action_type, %error, elapsed_us, "Dispatch failed");
            },
        }

        result
    }
}
