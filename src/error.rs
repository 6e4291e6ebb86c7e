//! Dashboard errors.

use thiserror::Error;

/// Everything that can go wrong between reading the config and drawing a chart.
#[derive(Error, Debug)]
pub enum DashError {
    /// The server could not be reached, or refused the login.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server rejected or failed a statement. Holds the server's message.
    #[error("Query error: {0}")]
    Query(String),

    /// Bad config file, CLI arguments, seed file or headless script.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The selected columns cannot be plotted.
    #[error("Chart error: {0}")]
    Chart(String),

    /// Terminal and other local failures.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn chart(msg: impl Into<String>) -> Self {
        Self::Chart(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short lowercase tag used as a structured log field.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Query(_) => "query",
            Self::Config(_) => "config",
            Self::Chart(_) => "chart",
            Self::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
