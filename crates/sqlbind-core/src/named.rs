//! Named parameter context handed to renderers and statement layers

use crate::error::BindingError;
use crate::value::Value;
use std::collections::BTreeMap;

/// Parameter map keyed by logical parameter names
///
/// Lookups through [`ParamMap::get`] are strict: asking for a name that was
/// never bound is an error rather than a silent null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    entries: BTreeMap<String, Value>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(name.into(), value)
    }

    /// Strict lookup
    pub fn get(&self, name: &str) -> Result<&Value, BindingError> {
        self.entries
            .get(name)
            .ok_or_else(|| BindingError::ParameterNotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Bound names, in key order
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn into_value(self) -> Value {
        Value::Map(self.entries.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The parameter object of one invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NamedParams {
    /// No bindable parameters, or no arguments supplied
    #[default]
    Absent,

    /// A single unnamed argument, passed through as is
    Single(Value),

    /// Named entries: explicit names, positional names, generic aliases
    /// or the canonical wrapping keys of a lone collection
    Map(ParamMap),
}

impl NamedParams {
    pub fn is_absent(&self) -> bool {
        matches!(self, NamedParams::Absent)
    }

    pub fn as_map(&self) -> Option<&ParamMap> {
        match self {
            NamedParams::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Root value for expression evaluation
    pub fn to_value(&self) -> Value {
        match self {
            NamedParams::Absent => Value::Null,
            NamedParams::Single(value) => value.clone(),
            NamedParams::Map(map) => map.clone().into_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_lookup_reports_available_names() {
        let mut map = ParamMap::new();
        map.insert("id", Value::Int(1));
        map.insert("param1", Value::Int(1));

        assert_eq!(map.get("id").unwrap(), &Value::Int(1));
        match map.get("name").unwrap_err() {
            BindingError::ParameterNotFound { name, available } => {
                assert_eq!(name, "name");
                assert_eq!(available, vec!["id".to_string(), "param1".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn insert_overwrites() {
        let mut map = ParamMap::new();
        map.insert("a", Value::Int(1));
        let previous = map.insert("a", Value::Int(2));
        assert_eq!(previous, Some(Value::Int(1)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn to_value_shapes() {
        assert_eq!(NamedParams::Absent.to_value(), Value::Null);
        assert_eq!(NamedParams::Single(Value::Int(3)).to_value(), Value::Int(3));

        let mut map = ParamMap::new();
        map.insert("a", Value::Int(1));
        let value = NamedParams::Map(map).to_value();
        assert_eq!(value.as_map().unwrap()["a"], Value::Int(1));
    }
}
