//! Statement execution contract for finished Bound SQL
//!
//! This crate provides:
//! - `StatementHandler`: prepare, bind, batch and execute one statement
//! - `ParameterHandler` with `DefaultParameterHandler`, binding placeholders
//!   in order onto any `BindTarget`
//! - The transaction timeout policy
//! - An in-memory handler (`MockStatementHandler`) for tests and demos
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlbind_exec::{MockConnection, MockStatementHandler, StatementHandler};
//!
//! let handler = MockStatementHandler::new(bound_sql, &config);
//! let mut statement = handler.prepare(&mut MockConnection::new(), None).await?;
//! handler.parameterize(&mut statement).await?;
//! let affected = handler.update(&mut statement).await?;
//! ```

pub mod handler;
pub mod parameter;
pub mod mock;

pub use handler::{
    apply_transaction_timeout, ParameterHandler, ResultHandler, StatementError, StatementHandler,
};
pub use parameter::{BindTarget, DefaultParameterHandler};
pub use mock::{MockConnection, MockCursor, MockStatement, MockStatementHandler};
