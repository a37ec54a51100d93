//! Runtime values bound to statement parameters
//!
//! Every call argument entering the binding core is a [`Value`]. Its
//! [`Shape`] is decided once here and branched on exhaustively everywhere
//! else.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Entries of a [`Value::Map`], in insertion order
pub type ValueMap = IndexMap<String, Value>;

/// A call-time value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value
    Null,

    Bool(bool),

    Int(i64),

    Float(f64),

    /// Exact decimal number
    Decimal(Decimal),

    String(String),

    /// List-shaped collection (ordered, indexable)
    List(Vec<Value>),

    /// Collection that is not list-shaped (no positional contract)
    Set(Vec<Value>),

    /// Fixed-size array
    Array(Vec<Value>),

    /// Key/value mapping, iterated in insertion order
    Map(ValueMap),
}

/// Shape classification of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Null,

    /// Anything that is neither a collection, an array nor a mapping
    Scalar,

    /// A collection; `list_shaped` when it is a [`Value::List`]
    Sequence { list_shaped: bool },

    FixedArray,

    Mapping,
}

impl Value {
    /// Classify this value
    pub fn shape(&self) -> Shape {
        match self {
            Value::Null => Shape::Null,
            Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Decimal(_)
            | Value::String(_) => Shape::Scalar,
            Value::List(_) => Shape::Sequence { list_shaped: true },
            Value::Set(_) => Shape::Sequence { list_shaped: false },
            Value::Array(_) => Shape::FixedArray,
            Value::Map(_) => Shape::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for collections, arrays and mappings
    pub fn is_container(&self) -> bool {
        matches!(
            self.shape(),
            Shape::Sequence { .. } | Shape::FixedArray | Shape::Mapping
        )
    }

    /// Exact zero test for numeric values
    ///
    /// Returns `None` when the value is not numeric. Decimals compare by value
    /// regardless of scale (`0.000` is zero). Only positive and negative zero
    /// floats are zero; NaN, infinities and subnormals are not.
    pub fn numeric_is_zero(&self) -> Option<bool> {
        match self {
            Value::Int(i) => Some(*i == 0),
            Value::Float(f) => Some(*f == 0.0),
            Value::Decimal(d) => Some(d.is_zero()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Decimal(Decimal::from(u))
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn shape_classification() {
        assert_eq!(Value::Null.shape(), Shape::Null);
        assert_eq!(Value::from("a").shape(), Shape::Scalar);
        assert_eq!(
            Value::List(vec![]).shape(),
            Shape::Sequence { list_shaped: true }
        );
        assert_eq!(
            Value::Set(vec![]).shape(),
            Shape::Sequence { list_shaped: false }
        );
        assert_eq!(Value::Array(vec![]).shape(), Shape::FixedArray);
        assert_eq!(Value::Map(ValueMap::new()).shape(), Shape::Mapping);
    }

    #[test]
    fn exact_zero_comparison() {
        assert_eq!(Value::Int(0).numeric_is_zero(), Some(true));
        assert_eq!(Value::Float(0.0).numeric_is_zero(), Some(true));
        assert_eq!(Value::Float(-0.0).numeric_is_zero(), Some(true));
        assert_eq!(Value::Float(1e-300).numeric_is_zero(), Some(false));
        assert_eq!(Value::Float(f64::NAN).numeric_is_zero(), Some(false));
        assert_eq!(
            Value::Decimal(Decimal::from_str("0.000").unwrap()).numeric_is_zero(),
            Some(true)
        );
        assert_eq!(Value::from("0").numeric_is_zero(), None);
    }

    #[test]
    fn from_json() {
        let value = Value::from(serde_json::json!({"ids": [1, 2], "name": "x", "ratio": 0.5}));
        let map = value.as_map().unwrap();
        assert_eq!(map["ids"], Value::List(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(map["name"], Value::from("x"));
        assert_eq!(map["ratio"], Value::Float(0.5));
    }

    #[test]
    fn display_is_readable() {
        let mut map = ValueMap::new();
        map.insert("b".to_string(), Value::List(vec![Value::Int(2), Value::Null]));
        map.insert("a".to_string(), Value::Int(1));
        assert_eq!(Value::Map(map).to_string(), "{b=[2, null], a=1}");
    }

    #[test]
    fn map_equality_ignores_entry_order() {
        let forward: ValueMap = [("a", 1), ("b", 2)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::Int(v)))
            .collect();
        let backward: ValueMap = forward.clone().into_iter().rev().collect();

        assert_eq!(Value::Map(forward.clone()), Value::Map(backward.clone()));
        assert_ne!(
            forward.keys().collect::<Vec<_>>(),
            backward.keys().collect::<Vec<_>>()
        );
    }
}
