//! Dashboard dispatcher for tour-dash.
//!
//! Turns user actions from the TUI into query executions. The dashboard
//! holds no session state of its own: every result goes back to the caller
//! as an `Outcome` and is applied to the `App`.

use std::sync::Arc;

use tracing::{debug, info};

use crate::db::{Connector, QueryResult};
use crate::error::Result;
use crate::query::QueryExecutor;

/// A request produced by user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the first rows of a table.
    PreviewTable(String),
    /// Run the text from the query box.
    RunQuery(String),
}

/// The result of one action.
#[derive(Debug)]
pub enum Outcome {
    /// Rows fetched for the table preview.
    Preview {
        table: String,
        result: Result<QueryResult>,
    },
    /// Rows fetched for a submitted query.
    Query {
        sql: String,
        result: Result<QueryResult>,
    },
}

/// Executes dashboard actions against the configured database.
#[derive(Debug, Clone)]
pub struct Dashboard {
    executor: QueryExecutor,
    preview_limit: usize,
}

impl Dashboard {
    /// Creates a dashboard that previews `preview_limit` rows per table.
    pub fn new(connector: Arc<dyn Connector>, preview_limit: usize) -> Self {
        Self {
            executor: QueryExecutor::new(connector),
            preview_limit,
        }
    }

    /// Display-safe description of the database.
    pub fn target(&self) -> String {
        self.executor.target()
    }

    /// Runs one action to completion.
    pub async fn dispatch(&self, action: Action) -> Outcome {
        match action {
            Action::PreviewTable(table) => {
                info!("Previewing table {}", table);
                let result = self
                    .executor
                    .preview_table(&table, self.preview_limit)
                    .await;
                Outcome::Preview { table, result }
            }
            Action::RunQuery(sql) => {
                debug!("Running query: {}", sql);
                let result = self.executor.execute(&sql).await;
                Outcome::Query { sql, result }
            }
        }
    }
}
