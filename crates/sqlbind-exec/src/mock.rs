//! In-memory statement handler for testing
//!
//! No driver is involved: statements record what was bound to them and
//! execution returns configured rows or affected-row counts. Useful for:
//! - Testing rendering and binding end to end
//! - Demos without a database
//! - Simulating prepare failures, execution failures and timeouts
//!
//! ## Usage
//!
//! ```rust,ignore
//! let handler = MockStatementHandler::new(bound_sql, &config)
//!     .with_rows(vec![row])
//!     .with_affected_rows(1);
//!
//! let mut connection = MockConnection::new();
//! let mut statement = handler.prepare(&mut connection, None).await?;
//! handler.parameterize(&mut statement).await?;
//! let rows = handler.query(&mut statement, None).await?;
//! ```

use sqlbind_core::{BindingConfig, BoundSql, SqlType, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::handler::{
    apply_transaction_timeout, ParameterHandler, ResultHandler, StatementError, StatementHandler,
};
use crate::parameter::{BindTarget, DefaultParameterHandler};

/// Connection stand-in that logs the SQL of every statement it creates
#[derive(Debug, Default)]
pub struct MockConnection {
    prepared: Vec<String>,
    closed: bool,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A connection that refuses to create statements
    pub fn closed() -> Self {
        Self {
            closed: true,
            ..Self::default()
        }
    }

    /// SQL of every statement prepared on this connection, in order
    pub fn prepared(&self) -> &[String] {
        &self.prepared
    }
}

/// Statement stand-in
#[derive(Debug, Clone, PartialEq)]
pub struct MockStatement {
    sql: String,
    timeout: Option<Duration>,
    bound: BTreeMap<usize, (Value, Option<SqlType>)>,
    batches: Vec<Vec<Value>>,
}

impl MockStatement {
    fn new(sql: &str, timeout: Option<Duration>) -> Self {
        Self {
            sql: sql.to_string(),
            timeout,
            bound: BTreeMap::new(),
            batches: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Effective timeout after the transaction timeout was applied
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Currently bound values in position order
    pub fn bound_values(&self) -> Vec<Value> {
        self.bound.values().map(|(value, _)| value.clone()).collect()
    }

    /// Value and type bound at a 1-based position
    pub fn bound_at(&self, position: usize) -> Option<&(Value, Option<SqlType>)> {
        self.bound.get(&position)
    }

    /// Parameter sets queued for batched execution
    pub fn batches(&self) -> &[Vec<Value>] {
        &self.batches
    }

    fn add_batch(&mut self) {
        let values = self.bound_values();
        self.batches.push(values);
        self.bound.clear();
    }
}

impl BindTarget for MockStatement {
    fn bind(&mut self, position: usize, value: &Value, sql_type: Option<SqlType>) -> Result<(), String> {
        if position == 0 {
            return Err("parameter positions start at 1".to_string());
        }
        self.bound.insert(position, (value.clone(), sql_type));
        Ok(())
    }
}

/// Lazy sequence of result rows
#[derive(Debug)]
pub struct MockCursor {
    rows: std::vec::IntoIter<Value>,
}

impl Iterator for MockCursor {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.rows.next()
    }
}

/// Statement handler backed by memory
///
/// Rows are shared between clones, so rows added through one clone are seen
/// by all of them.
pub struct MockStatementHandler {
    bound_sql: Arc<BoundSql>,
    parameter_handler: DefaultParameterHandler<MockStatement>,

    /// Rows returned by queries
    rows: Arc<RwLock<Vec<Value>>>,

    affected_rows: u64,
    statement_timeout: Option<Duration>,
    fail_prepare: bool,
    fail_execution: bool,

    /// Simulated execution latency (milliseconds)
    latency_ms: u64,
}

impl MockStatementHandler {
    pub fn new(bound_sql: BoundSql, config: &BindingConfig) -> Self {
        let bound_sql = Arc::new(bound_sql);
        Self {
            parameter_handler: DefaultParameterHandler::new(Arc::clone(&bound_sql), config),
            bound_sql,
            rows: Arc::new(RwLock::new(Vec::new())),
            affected_rows: 0,
            statement_timeout: config.default_statement_timeout(),
            fail_prepare: false,
            fail_execution: false,
            latency_ms: 0,
        }
    }

    pub fn with_rows(mut self, rows: Vec<Value>) -> Self {
        self.rows = Arc::new(RwLock::new(rows));
        self
    }

    pub fn with_affected_rows(mut self, affected_rows: u64) -> Self {
        self.affected_rows = affected_rows;
        self
    }

    /// Statement timeout, overriding the configured default
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    pub fn with_prepare_failure(mut self) -> Self {
        self.fail_prepare = true;
        self
    }

    pub fn with_execution_failure(mut self) -> Self {
        self.fail_execution = true;
        self
    }

    /// Delay every execution; executions slower than the statement timeout
    /// fail with [`StatementError::Timeout`]
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub async fn add_row(&self, row: Value) {
        self.rows.write().await.push(row);
    }

    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    async fn execute(&self, statement: &MockStatement) -> Result<(), StatementError> {
        let latency = Duration::from_millis(self.latency_ms);

        match statement.timeout {
            Some(limit) if latency > Duration::ZERO => {
                tokio::time::timeout(limit, tokio::time::sleep(latency))
                    .await
                    .map_err(|_| StatementError::Timeout(limit))?;
            }
            _ if latency > Duration::ZERO => tokio::time::sleep(latency).await,
            _ => {}
        }

        if self.fail_execution {
            return Err(StatementError::Execution("Simulated execution failure".to_string()));
        }

        tracing::debug!(sql = %statement.sql, values = statement.bound.len(), "executed statement");
        Ok(())
    }
}

impl Clone for MockStatementHandler {
    fn clone(&self) -> Self {
        Self {
            bound_sql: Arc::clone(&self.bound_sql),
            parameter_handler: self.parameter_handler.clone(),
            rows: Arc::clone(&self.rows),
            affected_rows: self.affected_rows,
            statement_timeout: self.statement_timeout,
            fail_prepare: self.fail_prepare,
            fail_execution: self.fail_execution,
            latency_ms: self.latency_ms,
        }
    }
}

#[async_trait::async_trait]
impl StatementHandler for MockStatementHandler {
    type Connection = MockConnection;
    type Statement = MockStatement;
    type Row = Value;
    type Cursor = MockCursor;
    type Parameters = DefaultParameterHandler<MockStatement>;

    async fn prepare(
        &self,
        connection: &mut MockConnection,
        transaction_timeout: Option<Duration>,
    ) -> Result<MockStatement, StatementError> {
        if connection.closed {
            return Err(StatementError::Connection("Connection is closed".to_string()));
        }
        if self.fail_prepare {
            return Err(StatementError::Prepare("Simulated prepare failure".to_string()));
        }

        let timeout = apply_transaction_timeout(self.statement_timeout, transaction_timeout);
        connection.prepared.push(self.bound_sql.sql().to_string());

        tracing::debug!(sql = %self.bound_sql.sql(), ?timeout, "prepared statement");
        Ok(MockStatement::new(self.bound_sql.sql(), timeout))
    }

    async fn parameterize(&self, statement: &mut MockStatement) -> Result<(), StatementError> {
        self.parameter_handler.set_parameters(statement)
    }

    async fn batch(&self, statement: &mut MockStatement) -> Result<(), StatementError> {
        statement.add_batch();
        Ok(())
    }

    async fn update(&self, statement: &mut MockStatement) -> Result<u64, StatementError> {
        self.execute(statement).await?;
        Ok(self.affected_rows)
    }

    async fn query(
        &self,
        statement: &mut MockStatement,
        result_handler: Option<&mut dyn ResultHandler<Value>>,
    ) -> Result<Vec<Value>, StatementError> {
        self.execute(statement).await?;
        let rows = self.rows.read().await.clone();

        match result_handler {
            Some(handler) => {
                for row in rows {
                    handler.handle_row(row);
                }
                Ok(Vec::new())
            }
            None => Ok(rows),
        }
    }

    async fn query_cursor(&self, statement: &mut MockStatement) -> Result<MockCursor, StatementError> {
        self.execute(statement).await?;
        let rows = self.rows.read().await.clone();
        Ok(MockCursor {
            rows: rows.into_iter(),
        })
    }

    fn bound_sql(&self) -> &BoundSql {
        &self.bound_sql
    }

    fn parameter_handler(&self) -> &DefaultParameterHandler<MockStatement> {
        &self.parameter_handler
    }
}
