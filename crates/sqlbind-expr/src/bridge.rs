//! Bridge between parameter values and MiniJinja values
//!
//! Containers are exposed to MiniJinja as objects instead of being copied
//! into native sequences and maps, so a container returned by an expression
//! comes back with its original shape (list, set, array or map).
//!
//! MiniJinja has no exact decimal type. Whole decimals enter as 128-bit
//! integers and fractional ones as floats; a numeric result equal to the
//! projection of a decimal in scope is handed back as that decimal.

use minijinja::value::{Enumerator, Object, ObjectRepr, Value as JinjaValue, ValueKind};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlbind_core::{Shape, Value, ValueMap};
use std::sync::Arc;

use crate::context::PARAMETER_OBJECT_KEY;

/// Name resolving to null in expressions, alongside MiniJinja's `none`
pub(crate) const NULL_KEYWORD: &str = "null";

/// A parameter container seen from MiniJinja
#[derive(Debug)]
pub(crate) struct ValueObject(Value);

impl Object for ValueObject {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        match &self.0 {
            Value::Map(_) => ObjectRepr::Map,
            _ => ObjectRepr::Seq,
        }
    }

    fn get_value(self: &Arc<Self>, key: &JinjaValue) -> Option<JinjaValue> {
        match &self.0 {
            // nested maps answer missing keys with null
            Value::Map(map) => {
                let key = key.as_str()?;
                Some(map.get(key).map_or_else(|| JinjaValue::from(()), to_jinja))
            }
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                let position = usize::try_from(key.clone()).ok()?;
                items.get(position).map(to_jinja)
            }
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        match &self.0 {
            Value::Map(map) => Enumerator::Values(
                map.keys().map(|key| JinjaValue::from(key.as_str())).collect(),
            ),
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                Enumerator::Seq(items.len())
            }
            _ => Enumerator::Empty,
        }
    }
}

/// The evaluation root
///
/// Top-level names resolve strictly: a name missing from the root map is
/// undefined. `_parameter` addresses the whole root, and a scalar parameter
/// object answers any other name with itself.
#[derive(Debug)]
pub(crate) struct ScopeObject {
    root: Value,
}

impl ScopeObject {
    pub(crate) fn new(root: Value) -> Self {
        Self { root }
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        match &self.root {
            Value::Map(map) => map
                .get(name)
                .or_else(|| (name == PARAMETER_OBJECT_KEY).then_some(&self.root))
                .or_else(|| {
                    map.get(PARAMETER_OBJECT_KEY)
                        .filter(|parameter| answers_any_name(parameter, name))
                }),
            other if name == PARAMETER_OBJECT_KEY => Some(other),
            other => answers_any_name(other, name).then_some(other),
        }
    }
}

impl Object for ScopeObject {
    fn get_value(self: &Arc<Self>, key: &JinjaValue) -> Option<JinjaValue> {
        self.lookup(key.as_str()?).map(to_jinja)
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        let mut keys: Vec<JinjaValue> = match &self.root {
            Value::Map(map) => map.keys().map(|key| JinjaValue::from(key.as_str())).collect(),
            _ => Vec::new(),
        };
        if !self.root.as_map().is_some_and(|map| map.contains_key(PARAMETER_OBJECT_KEY)) {
            keys.push(JinjaValue::from(PARAMETER_OBJECT_KEY));
        }
        Enumerator::Values(keys)
    }
}

fn answers_any_name(parameter: &Value, name: &str) -> bool {
    parameter.shape() == Shape::Scalar && name != NULL_KEYWORD
}

/// Convert a parameter value for MiniJinja
pub(crate) fn to_jinja(value: &Value) -> JinjaValue {
    match value {
        Value::Null => JinjaValue::from(()),
        Value::Bool(b) => JinjaValue::from(*b),
        Value::Int(i) => JinjaValue::from(*i),
        Value::Float(f) => JinjaValue::from(*f),
        Value::Decimal(d) => decimal_to_jinja(d),
        Value::String(s) => JinjaValue::from(s.as_str()),
        Value::List(_) | Value::Set(_) | Value::Array(_) | Value::Map(_) => {
            JinjaValue::from_object(ValueObject(value.clone()))
        }
    }
}

fn decimal_to_jinja(decimal: &Decimal) -> JinjaValue {
    if decimal.scale() == 0 {
        JinjaValue::from(decimal.mantissa())
    } else {
        JinjaValue::from(decimal.to_f64().unwrap_or(f64::NAN))
    }
}

/// A decimal reachable from `scope` whose MiniJinja form is `number`
fn scope_decimal(scope: &Value, number: &JinjaValue) -> Option<Decimal> {
    match scope {
        Value::Decimal(d) => {
            let projected = decimal_to_jinja(d);
            (projected.is_integer() == number.is_integer() && projected == *number).then_some(*d)
        }
        Value::List(items) | Value::Set(items) | Value::Array(items) => {
            items.iter().find_map(|item| scope_decimal(item, number))
        }
        Value::Map(map) => map.values().find_map(|item| scope_decimal(item, number)),
        _ => None,
    }
}

fn number_from_jinja(value: &JinjaValue) -> Value {
    if value.is_integer() {
        if let Ok(i) = i64::try_from(value.clone()) {
            return Value::Int(i);
        }
        if let Some(d) = i128::try_from(value.clone())
            .ok()
            .and_then(|i| Decimal::try_from_i128_with_scale(i, 0).ok())
        {
            return Value::Decimal(d);
        }
    }
    f64::try_from(value.clone()).map_or(Value::Null, Value::Float)
}

/// Convert a MiniJinja result back into a parameter value
///
/// Objects created by [`to_jinja`] are unwrapped as they were. Native and
/// lazy sequences become lists, native maps become maps in their own order.
/// `scope` is the root the expression ran against.
pub(crate) fn from_jinja(value: &JinjaValue, scope: &Value) -> Result<Value, minijinja::Error> {
    if let Some(object) = value.downcast_object_ref::<ValueObject>() {
        return Ok(object.0.clone());
    }
    if let Some(scope) = value.downcast_object_ref::<ScopeObject>() {
        return Ok(scope.root.clone());
    }

    let converted = match value.kind() {
        ValueKind::Undefined | ValueKind::None => Value::Null,
        ValueKind::Bool => Value::Bool(value.is_true()),
        ValueKind::Number => scope_decimal(scope, value)
            .map_or_else(|| number_from_jinja(value), Value::Decimal),
        ValueKind::String => Value::String(value.as_str().unwrap_or_default().to_string()),
        ValueKind::Seq | ValueKind::Iterable => Value::List(
            value
                .try_iter()?
                .map(|item| from_jinja(&item, scope))
                .collect::<Result<_, _>>()?,
        ),
        ValueKind::Map => {
            let mut map = ValueMap::new();
            for key in value.try_iter()? {
                let item = value.get_item(&key)?;
                map.insert(key.to_string(), from_jinja(&item, scope)?);
            }
            Value::Map(map)
        }
        _ => Value::String(value.to_string()),
    };

    Ok(converted)
}
