//! Expression evaluation for dynamic SQL
//!
//! This crate handles:
//! - The pluggable expression engine seam (`ExpressionEngine`)
//! - A MiniJinja-backed engine that evaluates against parameter values
//! - The per-render evaluation scope (`DynamicContext`)
//! - Boolean conditions and iteration sources (`ExpressionEvaluator`)

pub mod error;
mod bridge;
pub mod engine;
pub mod context;
pub mod evaluator;

pub use error::EvaluationError;
pub use engine::{ExpressionEngine, JinjaExpressionEngine};
pub use context::{DynamicContext, DATABASE_ID_KEY, PARAMETER_OBJECT_KEY};
pub use evaluator::{ExpressionEvaluator, IterItem, Iterable};
