//! Error types for the schema registry.

use biomech_types::FailureCategory;
use thiserror::Error;

/// Errors raised while resolving landmarks through a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No schema is registered under this id.
    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    /// The schema has no landmark with this name.
    #[error("landmark '{name}' not found in schema '{schema}'")]
    LandmarkNotFound {
        /// Schema id.
        schema: String,
        /// Requested landmark name.
        name: String,
    },

    /// The schema has no group with this name.
    #[error("group '{group}' not found in schema '{schema}'")]
    GroupNotFound {
        /// Schema id.
        schema: String,
        /// Requested group name.
        group: String,
    },

    /// The landmark resolved to an index the supplied frame does not contain.
    #[error("landmark '{name}' at index {index} missing from frame of {len} landmarks")]
    LandmarkMissing {
        /// Landmark name.
        name: String,
        /// Resolved index.
        index: usize,
        /// Number of landmarks supplied.
        len: usize,
    },

    /// The schema definition itself is malformed.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl SchemaError {
    /// Creates an unknown schema error.
    #[must_use]
    pub fn unknown_schema(id: impl Into<String>) -> Self {
        Self::UnknownSchema(id.into())
    }

    /// Creates a landmark not found error.
    #[must_use]
    pub fn landmark_not_found(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self::LandmarkNotFound {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Creates a group not found error.
    #[must_use]
    pub fn group_not_found(schema: impl Into<String>, group: impl Into<String>) -> Self {
        Self::GroupNotFound {
            schema: schema.into(),
            group: group.into(),
        }
    }

    /// Creates a landmark missing error.
    #[must_use]
    pub fn landmark_missing(name: impl Into<String>, index: usize, len: usize) -> Self {
        Self::LandmarkMissing {
            name: name.into(),
            index,
            len,
        }
    }

    /// Creates an invalid schema error.
    #[must_use]
    pub fn invalid_schema(reason: impl Into<String>) -> Self {
        Self::InvalidSchema(reason.into())
    }

    /// Broad failure class.
    #[must_use]
    pub const fn category(&self) -> FailureCategory {
        match self {
            Self::LandmarkNotFound { .. } | Self::GroupNotFound { .. } | Self::LandmarkMissing { .. } => {
                FailureCategory::MissingLandmark
            }
            Self::UnknownSchema(_) | Self::InvalidSchema(_) => FailureCategory::InvalidConfig,
        }
    }
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
