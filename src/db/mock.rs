//! Mock database clients for testing.
//!
//! `MockConnector` hands out clients that answer every query with a canned
//! result and counts how many connections were opened and closed.

use super::{ColumnInfo, Connector, DatabaseClient, QueryResult, Value};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned behaviour of a mock client.
#[derive(Debug, Clone)]
enum Response {
    Rows(QueryResult),
    Fail(String),
}

/// A mock database client that returns predefined results.
#[derive(Debug)]
pub struct MockDatabaseClient {
    response: Response,
    closes: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockDatabaseClient {
    /// Creates a mock client that returns `result` for every query.
    pub fn new(result: QueryResult) -> Self {
        Self {
            response: Response::Rows(result),
            closes: Arc::default(),
            queries: Arc::default(),
        }
    }

    /// Creates a mock client whose queries fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Response::Fail(message.into()),
            closes: Arc::default(),
            queries: Arc::default(),
        }
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new(sample_result())
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(sql.to_string());
        }

        match &self.response {
            Response::Rows(result) => Ok(result.clone()),
            Response::Fail(message) => Err(DashError::query(message.clone())),
        }
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Connector producing `MockDatabaseClient`s.
#[derive(Debug, Clone)]
pub struct MockConnector {
    response: Response,
    connects: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    /// Every query succeeds with `result`.
    pub fn returning(result: QueryResult) -> Self {
        Self::with_response(Response::Rows(result))
    }

    /// Every connection succeeds but every query fails with `message`.
    pub fn failing_queries(message: impl Into<String>) -> Self {
        Self::with_response(Response::Fail(message.into()))
    }

    fn with_response(response: Response) -> Self {
        Self {
            response,
            connects: Arc::default(),
            closes: Arc::default(),
            queries: Arc::default(),
        }
    }

    /// Number of connections opened so far.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Number of connections closed so far.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// SQL strings received, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::returning(sample_result())
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self) -> Result<Box<dyn DatabaseClient>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDatabaseClient {
            response: self.response.clone(),
            closes: Arc::clone(&self.closes),
            queries: Arc::clone(&self.queries),
        }))
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// Connector whose connection attempts always fail.
#[derive(Debug, Clone)]
pub struct FailingConnector {
    message: String,
}

impl FailingConnector {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Connector for FailingConnector {
    async fn connect(&self) -> Result<Box<dyn DatabaseClient>> {
        Err(DashError::connection(self.message.clone()))
    }

    fn describe(&self) -> String {
        "unreachable".to_string()
    }
}

/// A small two-column result used by default mocks.
fn sample_result() -> QueryResult {
    QueryResult::with_data(
        vec![
            ColumnInfo::new("name", "VARCHAR"),
            ColumnInfo::new("score", "INT"),
        ],
        vec![
            vec![Value::from("Scottie Scheffler"), Value::Int(68)],
            vec![Value::from("Xander Schauffele"), Value::Int(70)],
            vec![Value::from("Ludvig Aberg"), Value::Int(71)],
        ],
    )
    .with_execution_time(Duration::from_millis(1))
}
