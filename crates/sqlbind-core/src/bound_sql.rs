//! Bound SQL: the finished render of one statement
//!
//! SQL text, placeholder descriptors and the parameter object are fixed at
//! construction. The additional-parameter store is written by the renderer
//! (loop variables, bind variables) and addressed with the same property
//! paths as the parameter object, so placeholder resolution treats both alike.

use crate::error::BindingError;
use crate::mapping::ParameterMapping;
use crate::named::NamedParams;
use crate::path::PropertyPath;
use crate::value::{Value, ValueMap};

/// SQL text plus everything needed to bind its placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSql {
    sql: String,
    parameter_mappings: Vec<ParameterMapping>,
    parameter_object: NamedParams,
    additional_parameters: Value,
}

impl BoundSql {
    pub fn new(
        sql: impl Into<String>,
        parameter_mappings: Vec<ParameterMapping>,
        parameter_object: NamedParams,
    ) -> Self {
        Self {
            sql: sql.into(),
            parameter_mappings,
            parameter_object,
            additional_parameters: Value::Map(ValueMap::new()),
        }
    }

    /// Final SQL text with placeholders
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Placeholder descriptors, in placeholder order
    pub fn parameter_mappings(&self) -> &[ParameterMapping] {
        &self.parameter_mappings
    }

    /// The raw parameter object of the invocation
    pub fn parameter_object(&self) -> &NamedParams {
        &self.parameter_object
    }

    /// True if a value was stored under the leading segment of `name`
    pub fn has_additional_parameter(&self, name: &str) -> bool {
        match PropertyPath::parse(name) {
            Ok(path) => self.has_leading(path.leading_name()),
            Err(_) => false,
        }
    }

    /// Store a synthesized value at a property path
    pub fn set_additional_parameter(
        &mut self,
        name: &str,
        value: Value,
    ) -> Result<(), BindingError> {
        let path = PropertyPath::parse(name)?;
        tracing::trace!(name, value = %value, "set additional parameter");
        path.set(&mut self.additional_parameters, value)
    }

    /// Read a synthesized value at a property path
    pub fn additional_parameter(&self, name: &str) -> Result<Option<&Value>, BindingError> {
        let path = PropertyPath::parse(name)?;
        path.get(&self.additional_parameters)
    }

    /// All synthesized values, keyed by leading name
    pub fn additional_parameters(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.additional_parameters.as_map().into_iter().flatten()
    }

    /// Resolve the value a placeholder property binds to
    ///
    /// Synthesized values shadow the parameter object. A scalar parameter
    /// object answers every property with itself; a parameter map is looked
    /// up strictly by the leading name.
    pub fn parameter_value(&self, property: &str) -> Result<Value, BindingError> {
        let path = PropertyPath::parse(property)?;

        if self.has_leading(path.leading_name()) {
            return Ok(path
                .get(&self.additional_parameters)?
                .cloned()
                .unwrap_or(Value::Null));
        }

        let value = match &self.parameter_object {
            NamedParams::Absent => None,
            NamedParams::Single(value) if !value.is_container() => Some(value),
            NamedParams::Single(value) => path.get(value)?,
            NamedParams::Map(map) => {
                let leading = map.get(path.leading_name())?;
                path.get_from_leading(leading)?
            }
        };

        Ok(value.cloned().unwrap_or(Value::Null))
    }

    /// Values for every input placeholder, in placeholder order
    pub fn bind_values(&self) -> Result<Vec<Value>, BindingError> {
        self.parameter_mappings
            .iter()
            .filter(|mapping| mapping.is_input())
            .map(|mapping| self.parameter_value(&mapping.property))
            .collect()
    }

    fn has_leading(&self, name: &str) -> bool {
        self.additional_parameters
            .as_map()
            .is_some_and(|map| map.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::ParameterMode;
    use crate::named::ParamMap;
    use pretty_assertions::assert_eq;

    fn user_params() -> NamedParams {
        let mut user = ValueMap::new();
        user.insert("id".to_string(), Value::Int(7));
        user.insert("name".to_string(), Value::from("ada"));

        let mut map = ParamMap::new();
        map.insert("user", Value::Map(user.clone()));
        map.insert("param1", Value::Map(user));
        map.insert("limit", Value::Int(10));
        map.insert("param2", Value::Int(10));
        NamedParams::Map(map)
    }

    #[test]
    fn accessors_return_construction_inputs() {
        let bound = BoundSql::new(
            "select * from users where id = ?",
            vec![ParameterMapping::new("user.id")],
            user_params(),
        );

        assert_eq!(bound.sql(), "select * from users where id = ?");
        assert_eq!(bound.parameter_mappings().len(), 1);
        assert!(bound.parameter_object().as_map().is_some());
        assert_eq!(bound.additional_parameters().count(), 0);
    }

    #[test]
    fn nested_additional_parameter_registers_leading_name() {
        let mut bound = BoundSql::new("select 1", vec![], NamedParams::Absent);
        bound
            .set_additional_parameter("x.y", Value::Int(1))
            .unwrap();

        assert!(bound.has_additional_parameter("x"));
        assert!(bound.has_additional_parameter("x.z"));
        assert!(!bound.has_additional_parameter("y"));
        assert_eq!(
            bound.additional_parameter("x.y").unwrap(),
            Some(&Value::Int(1))
        );
    }

    #[test]
    fn additional_parameters_shadow_parameter_object() {
        let mut bound = BoundSql::new(
            "select * from users where id = ?",
            vec![ParameterMapping::new("limit")],
            user_params(),
        );
        bound
            .set_additional_parameter("limit", Value::Int(99))
            .unwrap();

        assert_eq!(bound.parameter_value("limit").unwrap(), Value::Int(99));
    }

    #[test]
    fn parameter_map_lookup_is_strict() {
        let bound = BoundSql::new("select 1", vec![], user_params());

        assert_eq!(bound.parameter_value("user.name").unwrap(), Value::from("ada"));
        assert_eq!(bound.parameter_value("param1.id").unwrap(), Value::Int(7));
        assert_eq!(bound.parameter_value("user.email").unwrap(), Value::Null);
        assert!(matches!(
            bound.parameter_value("missing").unwrap_err(),
            BindingError::ParameterNotFound { .. }
        ));
    }

    #[test]
    fn scalar_parameter_object_answers_any_property() {
        let bound = BoundSql::new("select 1", vec![], NamedParams::Single(Value::Int(5)));
        assert_eq!(bound.parameter_value("id").unwrap(), Value::Int(5));
        assert_eq!(bound.parameter_value("whatever").unwrap(), Value::Int(5));
    }

    #[test]
    fn absent_parameter_object_binds_null() {
        let bound = BoundSql::new("select 1", vec![], NamedParams::Absent);
        assert_eq!(bound.parameter_value("id").unwrap(), Value::Null);
    }

    #[test]
    fn bind_values_follow_placeholder_order_and_skip_out() {
        let mut bound = BoundSql::new(
            "call proc(?, ?, ?)",
            vec![
                ParameterMapping::new("limit"),
                ParameterMapping::builder("result")
                    .mode(ParameterMode::Out)
                    .build(),
                ParameterMapping::new("__frch_id_0"),
            ],
            user_params(),
        );
        bound
            .set_additional_parameter("__frch_id_0", Value::from("a"))
            .unwrap();

        assert_eq!(
            bound.bind_values().unwrap(),
            vec![Value::Int(10), Value::from("a")]
        );
    }
}
