//! Expression engines
//!
//! The evaluator only needs `evaluate(expression, context) -> value`; the
//! engine behind it is pluggable.

use minijinja::value::Value as JinjaValue;
use minijinja::{Environment, UndefinedBehavior};
use sqlbind_core::Value;

use crate::bridge::{from_jinja, ScopeObject, NULL_KEYWORD};
use crate::error::EvaluationError;

/// General-purpose expression evaluation against a parameter context
pub trait ExpressionEngine: Send + Sync {
    /// Evaluate `expression` with `context` as the root
    ///
    /// Syntax errors and unresolved names are reported as
    /// [`EvaluationError::Failed`].
    fn evaluate(&self, expression: &str, context: &Value) -> Result<Value, EvaluationError>;
}

/// MiniJinja-backed expression engine
///
/// Expressions use MiniJinja syntax (`user.id == 1`, `ids | length > 0`,
/// `name is not none`) with `null` accepted as a synonym for `none`.
/// Undefined top-level names are errors.
pub struct JinjaExpressionEngine {
    env: Environment<'static>,
}

impl JinjaExpressionEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_global(NULL_KEYWORD, JinjaValue::from(()));

        Self { env }
    }

    fn failure(expression: &str, error: impl std::fmt::Display) -> EvaluationError {
        EvaluationError::Failed {
            expression: expression.to_string(),
            message: error.to_string(),
        }
    }
}

impl Default for JinjaExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEngine for JinjaExpressionEngine {
    fn evaluate(&self, expression: &str, context: &Value) -> Result<Value, EvaluationError> {
        let compiled = self
            .env
            .compile_expression_owned(expression.to_string())
            .map_err(|e| Self::failure(expression, e))?;

        let root = JinjaValue::from_object(ScopeObject::new(context.clone()));
        let result = compiled
            .eval(root)
            .map_err(|e| Self::failure(expression, e))?;

        if result.is_undefined() {
            tracing::debug!(expression, "expression evaluated to an undefined value");
            return Err(Self::failure(expression, "expression refers to an undefined value"));
        }

        let value = from_jinja(&result, context).map_err(|e| Self::failure(expression, e))?;
        tracing::trace!(expression, result = %value, "evaluated expression");
        Ok(value)
    }
}
