//! sqlbind core
//!
//! Shared domain model for parameter binding: runtime values and their shape
//! classification, property paths, the named parameter context, placeholder
//! descriptors and the bound SQL produced by one render.
//! Error codes are part of the public API - never rename them.

pub mod error;
pub mod value;
pub mod path;
pub mod named;
pub mod mapping;
pub mod bound_sql;
pub mod config;

pub use error::{BindingError, ErrorCode};
pub use value::{Shape, Value, ValueMap};
pub use path::{PropertyPath, PathSegment};
pub use named::{NamedParams, ParamMap};
pub use mapping::{ParameterMapping, ParameterMappingBuilder, ParameterMode, SqlType};
pub use bound_sql::BoundSql;
pub use config::{BindingConfig, ConfigError};
