//! Action creators bound to a dispatch function
//!
//! A bound creator builds the action and dispatches it in one call, so
//! code handed one never needs the store itself.
//!
//! ```
//! use rudux_core::{reducer, StoreAction};
//! use rudux_runtime::{bind_action_creator, create_store};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), rudux_runtime::StoreError> {
//! let todos = reducer::from_fn(|state: Option<Arc<Vec<String>>>, action: &StoreAction<serde_json::Value>| {
//!     let state = state.unwrap_or_default();
//!     Ok(match action.app() {
//!         Some(action) if action["type"] == "ADD_TODO" => {
//!             let mut next = (*state).clone();
//!             next.push(action["text"].as_str().unwrap_or_default().to_string());
//!             Arc::new(next)
//!         },
//!         _ => state,
//!     })
//! });
//!
//! let store = create_store(todos, None, None)?;
//! let add_todo = bind_action_creator(
//!     |text: String| serde_json::json!({ "type": "ADD_TODO", "text": text }),
//!     &store.dispatcher(),
//! );
//!
//! add_todo.call("Use Rudux".to_string())?;
//! assert_eq!(*store.get_state()?, vec!["Use Rudux".to_string()]);
//! # Ok(())
//! # }
//! ```

use crate::StoreError;
use crate::dispatch::Dispatch;
use rudux_core::{Action, StoreAction};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A function producing an action from its arguments
///
/// Creators taking several arguments take them as a tuple.
pub type ActionCreator<P, A> = Arc<dyn Fn(P) -> A + Send + Sync>;

/// An action creator that dispatches what it creates
pub struct BoundActionCreator<P, A> {
    creator: ActionCreator<P, A>,
    dispatch: Dispatch<A>,
}

impl<P, A: Action> BoundActionCreator<P, A> {
    /// Create the action and dispatch it
    ///
    /// # Errors
    ///
    /// Whatever the dispatch returns.
    pub fn call(&self, args: P) -> Result<StoreAction<A>, StoreError> {
        self.dispatch.dispatch((self.creator)(args))
    }

    /// Convert into a plain closure
    pub fn into_fn(self) -> impl Fn(P) -> Result<StoreAction<A>, StoreError> + Send + Sync {
        move |args| self.call(args)
    }
}

impl<P, A> Clone for BoundActionCreator<P, A> {
    fn clone(&self) -> Self {
        Self {
            creator: Arc::clone(&self.creator),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<P, A> fmt::Debug for BoundActionCreator<P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundActionCreator").finish_non_exhaustive()
    }
}

/// Bind one action creator to `dispatch`
pub fn bind_action_creator<P, A, F>(creator: F, dispatch: &Dispatch<A>) -> BoundActionCreator<P, A>
where
    A: Action,
    F: Fn(P) -> A + Send + Sync + 'static,
{
    BoundActionCreator {
        creator: Arc::new(creator),
        dispatch: dispatch.clone(),
    }
}

/// Bind every creator of a keyed collection, keeping the keys
pub fn bind_action_creators<K, P, A, I>(
    creators: I,
    dispatch: &Dispatch<A>,
) -> BTreeMap<K, BoundActionCreator<P, A>>
where
    K: Ord,
    A: Action,
    I: IntoIterator<Item = (K, ActionCreator<P, A>)>,
{
    creators
        .into_iter()
        .map(|(key, creator)| {
            (
                key,
                BoundActionCreator {
                    creator,
                    dispatch: dispatch.clone(),
                },
            )
        })
        .collect()
}
