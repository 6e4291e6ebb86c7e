//! Backends behind one [`DatabaseClient`] trait. MySQL is the real target;
//! SQLite backs the demo database and the tests.

mod mock;
mod mysql;
mod sqlite;
mod types;

pub use mock::{FailingConnector, MockConnector, MockDatabaseClient};
pub use mysql::MySqlClient;
pub use sqlite::SqliteClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Maximum rows kept from a single query.
pub const MAX_ROWS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    #[serde(alias = "mariadb")]
    MySql,
    Sqlite,
}

impl DatabaseBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Backend named by a URL scheme or config value, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        const NAMES: [(&str, DatabaseBackend); 4] = [
            ("mysql", DatabaseBackend::MySql),
            ("mariadb", DatabaseBackend::MySql),
            ("sqlite", DatabaseBackend::Sqlite),
            ("sqlite3", DatabaseBackend::Sqlite),
        ];
        NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, backend)| backend)
    }

    /// Returns the default port for this backend (0 when not networked).
    pub fn default_port(&self) -> u16 {
        match self {
            Self::MySql => 3306,
            Self::Sqlite => 0,
        }
    }
}

/// Opens a client for whichever backend `config` names.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    let client: Box<dyn DatabaseClient> = match config.backend {
        DatabaseBackend::MySql => Box::new(MySqlClient::connect(config).await?),
        DatabaseBackend::Sqlite => Box::new(SqliteClient::connect(config).await?),
    };
    Ok(client)
}

/// One open connection.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Sends `sql` as written and keeps at most [`MAX_ROWS`] rows.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    async fn close(&self) -> Result<()>;
}

/// Source of fresh database connections, one per query.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Opens a new connection.
    async fn connect(&self) -> Result<Box<dyn DatabaseClient>>;

    /// Display-safe description of the target database.
    fn describe(&self) -> String;
}

#[async_trait]
impl Connector for ConnectionConfig {
    async fn connect(&self) -> Result<Box<dyn DatabaseClient>> {
        connect(self).await
    }

    fn describe(&self) -> String {
        self.display_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!(DatabaseBackend::parse("mysql"), Some(DatabaseBackend::MySql));
        assert_eq!(DatabaseBackend::parse("MariaDB"), Some(DatabaseBackend::MySql));
        assert_eq!(DatabaseBackend::parse("sqlite"), Some(DatabaseBackend::Sqlite));
        assert_eq!(DatabaseBackend::parse("postgres"), None);
    }

    #[test]
    fn test_backend_defaults() {
        assert_eq!(DatabaseBackend::default(), DatabaseBackend::MySql);
        assert_eq!(DatabaseBackend::MySql.default_port(), 3306);
        assert_eq!(DatabaseBackend::Sqlite.as_str(), "sqlite");
    }
}
