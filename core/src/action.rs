//! Actions: values describing "something happened"
//!
//! Applications describe their actions as enums (usually with
//! `#[derive(Action)]` from `rudux-macros`). Reducers and middleware receive
//! them wrapped in a [`StoreAction`], which also carries the store's reserved
//! internal actions (`Init`, `Replace`, `Probe`).
//!
//! # Example
//!
//! ```
//! use rudux_core::{Action, StoreAction};
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//!     Add(i64),
//! }
//!
//! impl Action for CounterAction {
//!     fn action_type(&self) -> Option<&str> {
//!         Some(match self {
//!             Self::Increment => "INCREMENT",
//!             Self::Add(_) => "ADD",
//!         })
//!     }
//! }
//!
//! let action = StoreAction::App(CounterAction::Add(2));
//! assert_eq!(action.action_type(), Some("ADD"));
//! assert!(StoreAction::<CounterAction>::Init.is_internal());
//! ```

use crate::error::ActionError;
use serde_json::Value;
use std::fmt::Debug;

/// An action that can be dispatched to a store.
///
/// The only requirement is a `type` discriminator. Typed enums always have
/// one; untyped representations (such as [`serde_json::Value`]) override
/// [`Action::validate`] to reject malformed values.
pub trait Action: Clone + Debug + Send + Sync + 'static {
    /// The action's `type`, or `None` if it has none
    fn action_type(&self) -> Option<&str>;

    /// Check that this action can be dispatched
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MissingType`] when [`Action::action_type`] is `None`.
    fn validate(&self) -> Result<(), ActionError> {
        self.action_type()
            .map(|_| ())
            .ok_or(ActionError::MissingType)
    }
}

impl Action for &'static str {
    fn action_type(&self) -> Option<&str> {
        Some(*self)
    }
}

/// JSON-shaped actions: `{"type": "...", ...payload}`
impl Action for Value {
    fn action_type(&self) -> Option<&str> {
        self.get("type").and_then(Value::as_str)
    }

    fn validate(&self) -> Result<(), ActionError> {
        let Value::Object(fields) = self else {
            return Err(ActionError::NotPlainObject(kind_of(self).to_string()));
        };

        match fields.get("type") {
            None | Some(Value::Null) => Err(ActionError::MissingType),
            Some(Value::String(_)) => Ok(()),
            Some(other) => Err(ActionError::NonStringType(kind_of(other).to_string())),
        }
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reserved action types used internally by the store.
///
/// Consumers must not rely on the exact strings: `INIT` and `REPLACE` carry a
/// random suffix chosen once per process, and every probe type is fresh.
pub mod action_types {
    use rand::Rng;
    use std::sync::LazyLock;

    /// Prefix shared by every reserved action type
    pub const PREFIX: &str = "@@rudux/";

    static INIT: LazyLock<String> = LazyLock::new(|| format!("{PREFIX}INIT{}", random_string()));
    static REPLACE: LazyLock<String> =
        LazyLock::new(|| format!("{PREFIX}REPLACE{}", random_string()));

    /// Six random base-36 characters separated by dots (`"k.3.z.a.9.q"`)
    fn random_string() -> String {
        let mut rng = rand::thread_rng();
        (0..6)
            .filter_map(|_| char::from_digit(rng.gen_range(0..36), 36))
            .map(String::from)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Type of the action dispatched when a store is created
    #[must_use]
    pub fn init() -> &'static str {
        &INIT
    }

    /// Type of the action dispatched by `replace_reducer`
    #[must_use]
    pub fn replace() -> &'static str {
        &REPLACE
    }

    /// A fresh action type no reducer can know about
    #[must_use]
    pub fn probe_unknown_action() -> String {
        format!("{PREFIX}PROBE_UNKNOWN_ACTION{}", random_string())
    }

    /// True if `action_type` belongs to the reserved namespace
    #[must_use]
    pub fn is_reserved(action_type: &str) -> bool {
        action_type.starts_with(PREFIX)
    }
}

/// The envelope every reducer and middleware receives.
///
/// Reducers match on [`StoreAction::App`] for their own actions and fall
/// through to "return the current (or initial) state" for everything else,
/// including the internal variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction<A> {
    /// Dispatched once when the store is created
    Init,
    /// Dispatched after the store's reducer is replaced
    Replace,
    /// Random unknown action used by development checks
    Probe(String),
    /// An application action
    App(A),
}

impl<A> StoreAction<A> {
    /// The application action, if this is one
    #[must_use]
    pub const fn app(&self) -> Option<&A> {
        match self {
            Self::App(action) => Some(action),
            Self::Init | Self::Replace | Self::Probe(_) => None,
        }
    }

    /// Consume the envelope, returning the application action if present
    #[must_use]
    pub fn into_app(self) -> Option<A> {
        match self {
            Self::App(action) => Some(action),
            Self::Init | Self::Replace | Self::Probe(_) => None,
        }
    }

    /// True for the store's reserved actions
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        !matches!(self, Self::App(_))
    }

    /// A probe action with a fresh random type
    #[must_use]
    pub fn probe() -> Self {
        Self::Probe(action_types::probe_unknown_action())
    }
}

impl<A> From<A> for StoreAction<A> {
    fn from(action: A) -> Self {
        Self::App(action)
    }
}

impl<A: Action> Action for StoreAction<A> {
    fn action_type(&self) -> Option<&str> {
        match self {
            Self::Init => Some(action_types::init()),
            Self::Replace => Some(action_types::replace()),
            Self::Probe(action_type) => Some(action_type),
            Self::App(action) => action.action_type(),
        }
    }

    fn validate(&self) -> Result<(), ActionError> {
        match self {
            Self::App(action) => action.validate(),
            Self::Init | Self::Replace | Self::Probe(_) => Ok(()),
        }
    }
}
