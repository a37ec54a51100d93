//! Placeholder descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage type hint for a bound value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Double,
    Char,
    Varchar,
    Clob,
    Date,
    Time,
    Timestamp,
    Array,
    Null,
    Other,
}

impl Default for SqlType {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "BOOLEAN",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Decimal => "DECIMAL",
            Self::Double => "DOUBLE",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::Clob => "CLOB",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Array => "ARRAY",
            Self::Null => "NULL",
            Self::Other => "OTHER",
        };
        write!(f, "{}", name)
    }
}

/// Direction of a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterMode {
    In,

    /// Output-only; never bound before execution
    Out,

    InOut,
}

impl Default for ParameterMode {
    fn default() -> Self {
        Self::In
    }
}

/// One SQL placeholder, referencing a property path into the parameter context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMapping {
    /// Property path, e.g. `user.id` or `__frch_item_0`
    pub property: String,

    #[serde(default)]
    pub mode: ParameterMode,

    /// Declared storage type, if any
    #[serde(default)]
    pub sql_type: Option<SqlType>,

    #[serde(default)]
    pub numeric_scale: Option<u32>,
}

impl ParameterMapping {
    /// An `In` mapping with no type hints
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            mode: ParameterMode::In,
            sql_type: None,
            numeric_scale: None,
        }
    }

    pub fn builder(property: impl Into<String>) -> ParameterMappingBuilder {
        ParameterMappingBuilder {
            mapping: Self::new(property),
        }
    }

    /// Whether a value is bound for this placeholder before execution
    pub fn is_input(&self) -> bool {
        self.mode != ParameterMode::Out
    }
}

/// Builder for ParameterMapping
pub struct ParameterMappingBuilder {
    mapping: ParameterMapping,
}

impl ParameterMappingBuilder {
    pub fn mode(mut self, mode: ParameterMode) -> Self {
        self.mapping.mode = mode;
        self
    }

    pub fn sql_type(mut self, sql_type: SqlType) -> Self {
        self.mapping.sql_type = Some(sql_type);
        self
    }

    pub fn numeric_scale(mut self, scale: u32) -> Self {
        self.mapping.numeric_scale = Some(scale);
        self
    }

    pub fn build(self) -> ParameterMapping {
        self.mapping
    }
}
