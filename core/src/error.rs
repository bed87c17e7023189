//! Error types shared by actions and reducers.

use thiserror::Error;

/// Reasons an action is rejected before it reaches a reducer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The action is not a plain object (only reachable for untyped actions)
    #[error("Actions must be plain objects. Instead, the actual type was: '{0}'.")]
    NotPlainObject(String),

    /// The action has no `type`
    #[error(
        "Actions may not have an undefined \"type\" property. \
         You may have misspelled an action type string constant."
    )]
    MissingType,

    /// The action's `type` is present but not a string
    #[error("Action \"type\" property must be a string. Instead, the actual type was: '{0}'.")]
    NonStringType(String),
}

/// Errors produced while computing the next state.
#[derive(Error, Debug)]
pub enum ReducerError {
    /// A reducer broke the reducer contract
    ///
    /// Raised by development checks: a reducer that cannot produce an initial
    /// state, or a slice whose stored value has the wrong type.
    #[error("Reducer contract violated: {0}")]
    Contract(String),

    /// A slice reducer inside a combined reducer failed
    #[error("Slice reducer for key \"{key}\" failed: {source}")]
    Slice {
        /// Key of the failing slice
        key: String,
        /// The slice reducer's error
        #[source]
        source: Box<ReducerError>,
    },

    /// The reducer rejected the action
    #[error("{0}")]
    Failed(String),

    /// Any other error raised by user code inside a reducer
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ReducerError {
    /// Create a [`ReducerError::Failed`] from a message
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Wrap this error with the key of the slice that produced it
    #[must_use]
    pub fn in_slice(self, key: impl Into<String>) -> Self {
        Self::Slice {
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// True if this error (or the slice error it wraps) is a contract violation
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Self::Contract(_) => true,
            Self::Slice { source, .. } => source.is_contract_violation(),
            Self::Failed(_) | Self::Other(_) => false,
        }
    }
}
