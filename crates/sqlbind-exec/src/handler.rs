//! Statement execution contracts
//!
//! A statement layer implements [`StatementHandler`] for its driver. The
//! handler owns one finished [`BoundSql`] and a [`ParameterHandler`] that
//! binds its placeholders onto a native statement.

use sqlbind_core::{BindingError, BoundSql, ErrorCode, NamedParams};
use std::time::Duration;

/// Errors raised while preparing, binding or executing a statement
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatementError {
    #[error("Error preparing statement: {0}")]
    Prepare(String),

    #[error("Could not set parameter #{position} ({property}): {message}")]
    Bind {
        position: usize,
        property: String,
        message: String,
    },

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("Error executing statement: {0}")]
    Execution(String),

    #[error("Statement timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl StatementError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Prepare(_) => ErrorCode::StmtPrepareFailed,
            Self::Bind { .. } => ErrorCode::StmtBindFailed,
            Self::Binding(err) => err.code(),
            Self::Execution(_) | Self::Timeout(_) | Self::Connection(_) => {
                ErrorCode::StmtExecutionFailed
            }
        }
    }
}

/// Binds a statement's placeholders
pub trait ParameterHandler: Send + Sync {
    type Statement;

    /// The parameter object the placeholders resolve against
    fn parameter_object(&self) -> &NamedParams;

    /// Bind every input placeholder onto `statement`, in placeholder order
    fn set_parameters(&self, statement: &mut Self::Statement) -> Result<(), StatementError>;
}

/// Receives rows one at a time instead of collecting them
pub trait ResultHandler<R>: Send {
    fn handle_row(&mut self, row: R);
}

impl<R> ResultHandler<R> for Vec<R>
where
    R: Send,
{
    fn handle_row(&mut self, row: R) {
        self.push(row);
    }
}

/// What a statement layer must do with a finished [`BoundSql`]
#[async_trait::async_trait]
pub trait StatementHandler: Send + Sync {
    /// Connection-like resource statements are created from
    type Connection: Send;

    /// Native statement handle
    type Statement: Send;

    type Row: Send;

    /// Lazy row sequence
    type Cursor: Send;

    type Parameters: ParameterHandler<Statement = Self::Statement>;

    /// Create a native statement, applying the statement and transaction
    /// timeouts (see [`apply_transaction_timeout`])
    async fn prepare(
        &self,
        connection: &mut Self::Connection,
        transaction_timeout: Option<Duration>,
    ) -> Result<Self::Statement, StatementError>;

    /// Bind all placeholders in order
    async fn parameterize(&self, statement: &mut Self::Statement) -> Result<(), StatementError>;

    /// Queue the bound statement for batched execution without executing it
    async fn batch(&self, statement: &mut Self::Statement) -> Result<(), StatementError>;

    /// Execute and return the affected row count
    async fn update(&self, statement: &mut Self::Statement) -> Result<u64, StatementError>;

    /// Execute and collect the result rows
    ///
    /// With a result handler, rows are streamed into it and the returned
    /// list is empty.
    async fn query(
        &self,
        statement: &mut Self::Statement,
        result_handler: Option<&mut dyn ResultHandler<Self::Row>>,
    ) -> Result<Vec<Self::Row>, StatementError>;

    /// Execute and return a lazy cursor over the result rows
    async fn query_cursor(&self, statement: &mut Self::Statement) -> Result<Self::Cursor, StatementError>;

    fn bound_sql(&self) -> &BoundSql;

    fn parameter_handler(&self) -> &Self::Parameters;
}

/// Effective timeout once a transaction timeout is applied
///
/// The transaction timeout replaces the statement timeout when the statement
/// has none (or zero), or when the transaction's is shorter.
pub fn apply_transaction_timeout(
    statement_timeout: Option<Duration>,
    transaction_timeout: Option<Duration>,
) -> Option<Duration> {
    let Some(transaction) = transaction_timeout else {
        return statement_timeout;
    };

    match statement_timeout {
        Some(statement) if !statement.is_zero() && statement <= transaction => Some(statement),
        _ => Some(transaction),
    }
}
