//! Built-in golf demo database.
//!
//! `--mock-db` runs the dashboard against a SQLite file seeded with sample
//! PGA Tour data, so no MySQL server is needed for demos and tests.

use crate::config::ConnectionConfig;
use crate::error::{DashError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

/// Seed SQL for the five dashboard tables.
pub const DEFAULT_SEED: &str = include_str!("seed.sql");

/// A seeded SQLite database that lives as long as this value.
#[derive(Debug)]
pub struct DemoDatabase {
    _dir: TempDir,
    config: ConnectionConfig,
}

impl DemoDatabase {
    /// Creates the demo database from the built-in seed.
    pub async fn create() -> Result<Self> {
        Self::with_seed(DEFAULT_SEED).await
    }

    /// Creates the demo database from a seed file.
    pub async fn from_seed_file(path: &Path) -> Result<Self> {
        let seed = std::fs::read_to_string(path).map_err(|e| {
            DashError::config(format!("Failed to read seed file {}: {e}", path.display()))
        })?;
        Self::with_seed(&seed).await
    }

    /// Creates the demo database and runs `seed` against it.
    pub async fn with_seed(seed: &str) -> Result<Self> {
        let dir = TempDir::new()
            .map_err(|e| DashError::internal(format!("Failed to create temp directory: {e}")))?;
        let path = dir.path().join("tour-dash-demo.db");

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| DashError::connection(format!("Cannot create demo database: {e}")))?;

        sqlx::raw_sql(seed)
            .execute(&mut conn)
            .await
            .map_err(|e| DashError::query(format!("Failed to seed demo database: {e}")))?;

        conn.close()
            .await
            .map_err(|e| DashError::connection(format!("Failed to close demo database: {e}")))?;

        info!("Demo database seeded at {}", path.display());

        Ok(Self {
            _dir: dir,
            config: ConnectionConfig::sqlite(path),
        })
    }

    /// Connection settings for the demo database.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, Value};

    #[tokio::test]
    async fn test_demo_has_dashboard_tables() {
        let demo = DemoDatabase::create().await.unwrap();
        let client = db::connect(demo.config()).await.unwrap();

        for table in crate::config::DEFAULT_TABLES {
            let result = client
                .execute_query(&format!("SELECT * FROM {table} LIMIT 100"))
                .await
                .unwrap();
            assert!(!result.is_empty(), "{table} should have rows");
        }
        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_performance_stats_has_name_and_score() {
        let demo = DemoDatabase::create().await.unwrap();
        let client = db::connect(demo.config()).await.unwrap();

        let result = client
            .execute_query("SELECT name, score FROM PerformanceStats LIMIT 5")
            .await
            .unwrap();
        assert_eq!(result.column_names(), vec!["name", "score"]);
        assert_eq!(result.row_count, 5);
        assert!(matches!(result.rows[0][1], Value::Float(_)));
    }

    #[tokio::test]
    async fn test_custom_seed() {
        let demo = DemoDatabase::with_seed(
            "CREATE TABLE Players (name TEXT); INSERT INTO Players VALUES ('Jon Rahm');",
        )
        .await
        .unwrap();
        let client = db::connect(demo.config()).await.unwrap();
        let result = client.execute_query("SELECT * FROM Players").await.unwrap();
        assert_eq!(result.row_count, 1);
    }

    #[tokio::test]
    async fn test_invalid_seed_is_query_error() {
        let err = DemoDatabase::with_seed("CREATE TABLEX").await.unwrap_err();
        assert!(matches!(err, DashError::Query(_)));
    }

    #[tokio::test]
    async fn test_missing_seed_file() {
        let err = DemoDatabase::from_seed_file(Path::new("/nonexistent/seed.sql"))
            .await
            .unwrap_err();
        assert!(matches!(err, DashError::Config(_)));
    }
}
