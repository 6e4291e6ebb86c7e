//! Scoped query execution.
//!
//! Provides isolated query execution that can be tested independently
//! of the dashboard.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::db::{Connector, QueryResult};
use crate::error::Result;

/// Builds the fixed query issued when a table is selected.
pub fn preview_sql(table: &str, limit: usize) -> String {
    format!("SELECT * FROM {table} LIMIT {limit}")
}

/// Builds the text the query box is pre-filled with for `table`.
pub fn default_query_text(table: &str, limit: usize) -> String {
    preview_sql(table, limit)
}

/// Runs each query on a fresh connection and always closes it.
#[derive(Clone)]
pub struct QueryExecutor {
    connector: Arc<dyn Connector>,
}

impl QueryExecutor {
    /// Creates a new query executor.
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Description of the target database, safe to display.
    pub fn target(&self) -> String {
        self.connector.describe()
    }

    /// Connects, executes `sql` verbatim, and closes the connection.
    ///
    /// A failed close is logged and does not change the returned outcome.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();
        let client = self.connector.connect().await?;

        let result = client.execute_query(sql).await;

        if let Err(e) = client.close().await {
            warn!("Failed to close connection: {}", e);
        }

        let elapsed = start.elapsed();
        match &result {
            Ok(qr) => info!("Query returned {} rows in {:?}", qr.row_count, elapsed),
            Err(e) => warn!("Query failed after {:?}: {}", elapsed, e),
        }

        result
    }

    /// Executes the canned preview query for `table`.
    pub async fn preview_table(&self, table: &str, limit: usize) -> Result<QueryResult> {
        self.execute(&preview_sql(table, limit)).await
    }
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("target", &self.connector.describe())
            .finish()
    }
}
