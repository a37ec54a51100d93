//! Expression evaluation errors

use sqlbind_core::ErrorCode;

/// Errors raised while evaluating conditions and iteration sources
///
/// Every variant carries the expression text verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("The expression '{expression}' evaluated to a null value.")]
    NullValue { expression: String },

    #[error("Error evaluating expression '{expression}'. Return value ({value}) was not iterable.")]
    NotIterable { expression: String, value: String },

    /// Raised by the expression engine itself (syntax, unresolved names)
    #[error("Error evaluating expression '{expression}'. Cause: {message}")]
    Failed { expression: String, message: String },
}

impl EvaluationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NullValue { .. } => ErrorCode::ExprNullValue,
            Self::NotIterable { .. } => ErrorCode::ExprNotIterable,
            Self::Failed { .. } => ErrorCode::ExprEvaluationFailed,
        }
    }

    /// The expression that failed
    pub fn expression(&self) -> &str {
        match self {
            Self::NullValue { expression }
            | Self::NotIterable { expression, .. }
            | Self::Failed { expression, .. } => expression,
        }
    }
}
