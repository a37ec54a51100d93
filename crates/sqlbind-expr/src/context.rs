//! Evaluation scope for one render of a dynamic statement
//!
//! Names visible to expressions, in lookup order:
//! - renderer bindings (loop variables, `_parameter`, `_databaseId`)
//! - entries of the parameter object when it is a map
//! - the parameter object itself when it is a scalar

use sqlbind_core::{NamedParams, Value};
use std::collections::BTreeMap;

/// Name of the whole parameter object inside expressions
pub const PARAMETER_OBJECT_KEY: &str = "_parameter";

/// Name of the active database vendor id inside expressions
pub const DATABASE_ID_KEY: &str = "_databaseId";

/// Per-render evaluation scope
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicContext {
    parameter: Value,
    bindings: BTreeMap<String, Value>,
}

impl DynamicContext {
    /// Create a scope for the given parameter context
    pub fn new(params: &NamedParams) -> Self {
        let parameter = params.to_value();

        let mut bindings = BTreeMap::new();
        bindings.insert(PARAMETER_OBJECT_KEY.to_string(), parameter.clone());
        bindings.insert(DATABASE_ID_KEY.to_string(), Value::Null);

        Self { parameter, bindings }
    }

    /// Set the database vendor id
    pub fn with_database_id(mut self, database_id: impl Into<String>) -> Self {
        self.bind(DATABASE_ID_KEY, Value::String(database_id.into()));
        self
    }

    /// Bind a renderer variable, shadowing any parameter entry of the same name
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        let name = name.into();
        tracing::trace!(name = %name, "bound context variable");
        self.bindings.insert(name, value);
        self
    }

    /// Remove a renderer variable
    pub fn unbind(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    /// Look up a name the way expressions see it
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .get(name)
            .or_else(|| self.parameter.as_map().and_then(|map| map.get(name)))
    }

    pub fn parameter(&self) -> &Value {
        &self.parameter
    }

    pub fn database_id(&self) -> Option<&str> {
        self.bindings.get(DATABASE_ID_KEY).and_then(Value::as_str)
    }

    pub fn bindings(&self) -> &BTreeMap<String, Value> {
        &self.bindings
    }

    /// Flatten into an expression root
    pub fn to_value(&self) -> Value {
        let mut root = self.parameter.as_map().cloned().unwrap_or_default();
        root.extend(
            self.bindings
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        Value::Map(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqlbind_core::ParamMap;

    fn map_params() -> NamedParams {
        let mut map = ParamMap::new();
        map.insert("id", Value::Int(1));
        map.insert("param1", Value::Int(1));
        NamedParams::Map(map)
    }

    #[test]
    fn map_entries_are_visible() {
        let ctx = DynamicContext::new(&map_params());
        assert_eq!(ctx.get("id"), Some(&Value::Int(1)));
        assert_eq!(ctx.get("param1"), Some(&Value::Int(1)));
        assert_eq!(ctx.get(DATABASE_ID_KEY), Some(&Value::Null));
        assert!(ctx.get(PARAMETER_OBJECT_KEY).unwrap().as_map().is_some());
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn bindings_shadow_parameter_entries() {
        let mut ctx = DynamicContext::new(&map_params());
        ctx.bind("id", Value::Int(99));
        assert_eq!(ctx.get("id"), Some(&Value::Int(99)));

        let root = ctx.to_value();
        assert_eq!(root.as_map().unwrap().get("id"), Some(&Value::Int(99)));

        ctx.unbind("id");
        assert_eq!(ctx.get("id"), Some(&Value::Int(1)));
    }

    #[test]
    fn scalar_parameter() {
        let ctx = DynamicContext::new(&NamedParams::Single(Value::from("ada")))
            .with_database_id("postgres");

        assert_eq!(ctx.parameter(), &Value::from("ada"));
        assert_eq!(ctx.database_id(), Some("postgres"));

        let root = ctx.to_value();
        let map = root.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(PARAMETER_OBJECT_KEY), Some(&Value::from("ada")));
    }

    #[test]
    fn absent_parameter_is_null() {
        let ctx = DynamicContext::new(&NamedParams::Absent);
        assert_eq!(ctx.parameter(), &Value::Null);
        assert_eq!(ctx.database_id(), None);
    }
}
