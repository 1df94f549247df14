//! Scene graph errors

use thiserror::Error;

/// Errors raised by nodes, modules and the lifecycle state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Operation on a destroyed or not yet created object
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Another sibling already holds this name
    #[error("A sibling named '{0}' already exists")]
    DuplicateName(String),

    /// The node already carries a module of this type
    #[error("Node already has a {0}")]
    DuplicateModule(&'static str),

    /// Lookup failed
    #[error("Not found: {0}")]
    NotFound(String),

    /// Attempt to write a read-only property
    #[error("Property '{0}' is read-only")]
    ReadOnlyProperty(String),

    /// A value was rejected
    #[error("Invalid value for '{property}': {reason}")]
    InvalidValue {
        /// Property or setting name
        property: String,
        /// Why it was rejected
        reason: String,
    },

    /// The module is mandatory and cannot be removed
    #[error("{0} is required and cannot be removed")]
    RequiredModule(&'static str),
}

impl SceneError {
    /// Shorthand for [`SceneError::InvalidValue`]
    pub fn invalid_value(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
