//! Conditions and iteration sources
//!
//! `ExpressionEvaluator` is stateless apart from its engine and can be shared
//! across threads. It interprets engine results two ways:
//!
//! - as a condition (`<if test="...">`, `<when test="...">`)
//! - as an iteration source (`<foreach collection="...">`)

use sqlbind_core::Value;

use crate::engine::{ExpressionEngine, JinjaExpressionEngine};
use crate::error::EvaluationError;

/// Evaluates conditions and iteration sources through an injected engine
pub struct ExpressionEvaluator<E = JinjaExpressionEngine> {
    engine: E,
}

impl<E: ExpressionEngine> ExpressionEvaluator<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Evaluate a condition
    ///
    /// Booleans pass through. Numbers are true unless exactly zero. Anything
    /// else is true when non-null.
    pub fn evaluate_boolean(&self, expression: &str, context: &Value) -> Result<bool, EvaluationError> {
        let value = self.engine.evaluate(expression, context)?;

        let result = match &value {
            Value::Bool(b) => *b,
            other => match other.numeric_is_zero() {
                Some(zero) => !zero,
                None => !other.is_null(),
            },
        };

        tracing::trace!(expression, result, "evaluated condition");
        Ok(result)
    }

    /// Evaluate an iteration source
    ///
    /// A null result is `Ok(None)` when `nullable`, an error otherwise.
    /// Collections come back in their own order, fixed arrays are
    /// materialized element by element and maps yield their entries.
    pub fn evaluate_iterable(
        &self,
        expression: &str,
        context: &Value,
        nullable: bool,
    ) -> Result<Option<Iterable>, EvaluationError> {
        let value = self.engine.evaluate(expression, context)?;

        let iterable = match value {
            Value::Null if nullable => return Ok(None),
            Value::Null => {
                return Err(EvaluationError::NullValue {
                    expression: expression.to_string(),
                })
            }
            // arrays already own their elements, boxed or not
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                Iterable::Elements(items)
            }
            Value::Map(map) => Iterable::Entries(map.into_iter().collect()),
            other @ (Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Decimal(_)
            | Value::String(_)) => {
                return Err(EvaluationError::NotIterable {
                    expression: expression.to_string(),
                    value: other.to_string(),
                })
            }
        };

        tracing::trace!(expression, len = iterable.len(), "evaluated iteration source");
        Ok(Some(iterable))
    }
}

impl Default for ExpressionEvaluator<JinjaExpressionEngine> {
    fn default() -> Self {
        Self::new(JinjaExpressionEngine::new())
    }
}

/// An ordered iteration source
#[derive(Debug, Clone, PartialEq)]
pub enum Iterable {
    /// Elements of a collection or array
    Elements(Vec<Value>),

    /// Key/value entries of a map, in the map's order
    Entries(Vec<(String, Value)>),
}

impl Iterable {
    pub fn len(&self) -> usize {
        match self {
            Iterable::Elements(items) => items.len(),
            Iterable::Entries(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, position: usize) -> Option<IterItem<'_>> {
        match self {
            Iterable::Elements(items) => items
                .get(position)
                .map(|value| IterItem::Element { position, value }),
            Iterable::Entries(entries) => entries
                .get(position)
                .map(|(key, value)| IterItem::Entry { key, value }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = IterItem<'_>> {
        (0..self.len()).filter_map(move |position| self.get(position))
    }
}

/// One step of an iteration
///
/// Loop bodies bind `index` and `item`: the position and element for
/// collections, the key and value for maps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterItem<'a> {
    Element { position: usize, value: &'a Value },
    Entry { key: &'a str, value: &'a Value },
}

impl<'a> IterItem<'a> {
    /// Value bound to the loop's index variable
    pub fn index(&self) -> Value {
        match self {
            IterItem::Element { position, .. } => {
                Value::Int(i64::try_from(*position).unwrap_or(i64::MAX))
            }
            IterItem::Entry { key, .. } => Value::from(*key),
        }
    }

    /// Value bound to the loop's item variable
    pub fn item(&self) -> &'a Value {
        match *self {
            IterItem::Element { value, .. } | IterItem::Entry { value, .. } => value,
        }
    }
}
