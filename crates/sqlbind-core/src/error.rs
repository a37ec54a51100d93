//! Error codes and binding errors
//!
//! IMPORTANT: Error codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Error code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Expression evaluation
    /// An iteration source evaluated to null where null is not allowed
    ExprNullValue,

    /// An iteration source evaluated to something that cannot be iterated
    ExprNotIterable,

    /// The expression engine rejected or failed to evaluate an expression
    ExprEvaluationFailed,

    // Parameter resolution
    /// A property path could not be parsed
    PathInvalid,

    /// A property path navigates through a value without that property
    PathNoSuchProperty,

    /// An index was applied to a value that cannot be indexed
    PathNotIndexable,

    /// An index is outside the bounds of the indexed sequence
    PathIndexOutOfRange,

    /// A named parameter is not present in the parameter map
    ParamNotFound,

    /// A method id was never registered
    ParamUnknownMethod,

    // Statement execution
    /// The native statement could not be prepared
    StmtPrepareFailed,

    /// A value could not be bound onto the native statement
    StmtBindFailed,

    /// The native statement failed while executing
    StmtExecutionFailed,

    // Configuration
    /// The configuration file could not be read or parsed
    ConfigInvalid,
}

impl ErrorCode {
    /// Get the error code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExprNullValue => "EXPR_NULL_VALUE",
            Self::ExprNotIterable => "EXPR_NOT_ITERABLE",
            Self::ExprEvaluationFailed => "EXPR_EVALUATION_FAILED",
            Self::PathInvalid => "PATH_INVALID",
            Self::PathNoSuchProperty => "PATH_NO_SUCH_PROPERTY",
            Self::PathNotIndexable => "PATH_NOT_INDEXABLE",
            Self::PathIndexOutOfRange => "PATH_INDEX_OUT_OF_RANGE",
            Self::ParamNotFound => "PARAM_NOT_FOUND",
            Self::ParamUnknownMethod => "PARAM_UNKNOWN_METHOD",
            Self::StmtPrepareFailed => "STMT_PREPARE_FAILED",
            Self::StmtBindFailed => "STMT_BIND_FAILED",
            Self::StmtExecutionFailed => "STMT_EXECUTION_FAILED",
            Self::ConfigInvalid => "CONFIG_INVALID",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while addressing values inside a parameter context
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("Invalid property path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("There is no property named '{property}' in path '{path}'")]
    NoSuchProperty { path: String, property: String },

    #[error("Property '{property}' in path '{path}' cannot be indexed")]
    NotIndexable { path: String, property: String },

    #[error("Index '{index}' is not valid for '{property}' in path '{path}'")]
    InvalidIndex { path: String, property: String, index: String },

    #[error("Index {index} is out of range for '{property}' (length {len}) in path '{path}'")]
    IndexOutOfRange { path: String, property: String, index: usize, len: usize },

    #[error("Parameter '{name}' not found. Available parameters are {available:?}")]
    ParameterNotFound { name: String, available: Vec<String> },
}

impl BindingError {
    /// Stable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidPath { .. } => ErrorCode::PathInvalid,
            Self::NoSuchProperty { .. } => ErrorCode::PathNoSuchProperty,
            Self::NotIndexable { .. } | Self::InvalidIndex { .. } => ErrorCode::PathNotIndexable,
            Self::IndexOutOfRange { .. } => ErrorCode::PathIndexOutOfRange,
            Self::ParameterNotFound { .. } => ErrorCode::ParamNotFound,
        }
    }
}
