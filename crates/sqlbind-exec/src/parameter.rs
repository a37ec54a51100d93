//! Default placeholder binding

use sqlbind_core::{BindingConfig, BoundSql, NamedParams, SqlType, Value};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::handler::{ParameterHandler, StatementError};

/// A native statement that accepts positional parameter values
pub trait BindTarget {
    /// Bind `value` to the 1-based `position`
    ///
    /// `sql_type` is the declared storage type, or the configured type for
    /// nulls when nothing was declared.
    fn bind(&mut self, position: usize, value: &Value, sql_type: Option<SqlType>) -> Result<(), String>;
}

/// Binds placeholders in declaration order
///
/// Output-only placeholders are skipped but keep their position, so
/// positions always match placeholder order in the SQL text.
pub struct DefaultParameterHandler<S> {
    bound_sql: Arc<BoundSql>,
    sql_type_for_null: SqlType,
    _statement: PhantomData<fn(&mut S)>,
}

impl<S> DefaultParameterHandler<S> {
    pub fn new(bound_sql: Arc<BoundSql>, config: &BindingConfig) -> Self {
        Self {
            bound_sql,
            sql_type_for_null: config.sql_type_for_null,
            _statement: PhantomData,
        }
    }

    pub fn bound_sql(&self) -> &BoundSql {
        &self.bound_sql
    }
}

impl<S> Clone for DefaultParameterHandler<S> {
    fn clone(&self) -> Self {
        Self {
            bound_sql: Arc::clone(&self.bound_sql),
            sql_type_for_null: self.sql_type_for_null,
            _statement: PhantomData,
        }
    }
}

impl<S: BindTarget> ParameterHandler for DefaultParameterHandler<S> {
    type Statement = S;

    fn parameter_object(&self) -> &NamedParams {
        self.bound_sql.parameter_object()
    }

    fn set_parameters(&self, statement: &mut S) -> Result<(), StatementError> {
        for (index, mapping) in self.bound_sql.parameter_mappings().iter().enumerate() {
            if !mapping.is_input() {
                continue;
            }

            let position = index + 1;
            let value = self.bound_sql.parameter_value(&mapping.property)?;
            let sql_type = match mapping.sql_type {
                None if value.is_null() => Some(self.sql_type_for_null),
                declared => declared,
            };

            tracing::trace!(position, property = %mapping.property, value = %value, "binding parameter");
            statement
                .bind(position, &value, sql_type)
                .map_err(|message| StatementError::Bind {
                    position,
                    property: mapping.property.clone(),
                    message,
                })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqlbind_core::{ParamMap, ParameterMapping, ParameterMode};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(usize, Value, Option<SqlType>)>,
        reject: Option<usize>,
    }

    impl BindTarget for Recorder {
        fn bind(&mut self, position: usize, value: &Value, sql_type: Option<SqlType>) -> Result<(), String> {
            if self.reject == Some(position) {
                return Err("rejected".to_string());
            }
            self.calls.push((position, value.clone(), sql_type));
            Ok(())
        }
    }

    fn bound_sql() -> Arc<BoundSql> {
        let mut params = ParamMap::new();
        params.insert("id", Value::Int(7));
        params.insert("email", Value::Null);

        Arc::new(BoundSql::new(
            "call update_user(?, ?, ?)",
            vec![
                ParameterMapping::new("id"),
                ParameterMapping::builder("status").mode(ParameterMode::Out).build(),
                ParameterMapping::new("email"),
            ],
            NamedParams::Map(params),
        ))
    }

    #[test]
    fn binds_inputs_and_keeps_positions() {
        let handler = DefaultParameterHandler::<Recorder>::new(bound_sql(), &BindingConfig::default());
        let mut statement = Recorder::default();
        handler.set_parameters(&mut statement).unwrap();

        assert_eq!(
            statement.calls,
            vec![
                (1, Value::Int(7), None),
                (3, Value::Null, Some(SqlType::Other)),
            ]
        );
    }

    #[test]
    fn null_type_follows_config() {
        let config = BindingConfig {
            sql_type_for_null: SqlType::Null,
            ..BindingConfig::default()
        };
        let handler = DefaultParameterHandler::<Recorder>::new(bound_sql(), &config);
        let mut statement = Recorder::default();
        handler.set_parameters(&mut statement).unwrap();

        assert_eq!(statement.calls[1].2, Some(SqlType::Null));
    }

    #[test]
    fn declared_type_wins_for_null() {
        let bound_sql = Arc::new(BoundSql::new(
            "select ?",
            vec![ParameterMapping::builder("x").sql_type(SqlType::Varchar).build()],
            NamedParams::Single(Value::Null),
        ));
        let handler = DefaultParameterHandler::<Recorder>::new(bound_sql, &BindingConfig::default());
        let mut statement = Recorder::default();
        handler.set_parameters(&mut statement).unwrap();

        assert_eq!(statement.calls, vec![(1, Value::Null, Some(SqlType::Varchar))]);
    }

    #[test]
    fn driver_rejection_names_the_placeholder() {
        let handler = DefaultParameterHandler::<Recorder>::new(bound_sql(), &BindingConfig::default());
        let mut statement = Recorder {
            reject: Some(3),
            ..Recorder::default()
        };

        let err = handler.set_parameters(&mut statement).unwrap_err();
        assert_eq!(
            err,
            StatementError::Bind {
                position: 3,
                property: "email".to_string(),
                message: "rejected".to_string(),
            }
        );
    }

    #[test]
    fn missing_parameter_is_a_binding_error() {
        let bound_sql = Arc::new(BoundSql::new(
            "select ?",
            vec![ParameterMapping::new("missing")],
            NamedParams::Map(ParamMap::new()),
        ));
        let handler = DefaultParameterHandler::<Recorder>::new(bound_sql, &BindingConfig::default());

        let err = handler.set_parameters(&mut Recorder::default()).unwrap_err();
        assert!(matches!(err, StatementError::Binding(_)));
    }
}
