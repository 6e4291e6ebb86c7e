//! Result sets as the dashboard sees them, independent of the backend.

use std::fmt;
use std::time::Duration;

/// Rows returned by one statement, capped at [`MAX_ROWS`](super::MAX_ROWS).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<ColumnInfo>,
    /// Each row holds one value per column.
    pub rows: Vec<Row>,
    pub execution_time: Duration,
    /// Rows kept, equal to `rows.len()`.
    pub row_count: usize,
    /// Rows the server sent, when known.
    pub total_rows: Option<usize>,
    pub was_truncated: bool,
}

impl QueryResult {
    /// A complete result holding every row.
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        let total = rows.len();
        Self::from_fetched(columns, rows, total)
    }

    /// A result holding `rows` out of `fetched` rows read from the server.
    pub fn from_fetched(columns: Vec<ColumnInfo>, rows: Vec<Row>, fetched: usize) -> Self {
        Self {
            row_count: rows.len(),
            total_rows: Some(fetched),
            was_truncated: fetched > rows.len(),
            columns,
            rows,
            execution_time: Duration::ZERO,
        }
    }

    pub fn with_execution_time(self, execution_time: Duration) -> Self {
        Self {
            execution_time,
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// One column, top to bottom. Short rows read as NULL.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).unwrap_or(&Value::Null))
    }

    /// Footer note shown when rows were dropped.
    pub fn truncation_warning(&self) -> Option<String> {
        self.was_truncated.then(|| {
            format!(
                "⚠ Result truncated: showing {} of {} rows",
                self.row_count,
                self.total_rows.unwrap_or(self.row_count)
            )
        })
    }
}

/// Name and driver-reported type of a result column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

pub type Row = Vec<Value>;

/// A decoded cell.
///
/// MySQL `DECIMAL` columns (prize money, earnings) keep the server's text so
/// the table shows them exactly; [`Value::as_f64`] parses them for charts.
/// Dates and times arrive as `String`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(String),
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        *self == Value::Null
    }

    /// The value as a chart coordinate. Text never counts as numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => f.is_finite().then_some(*f),
            Value::Decimal(d) => d.trim().parse().ok(),
            Value::Null | Value::String(_) | Value::Bytes(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Decimal(s) | Value::String(s) => f.write_str(s),
            Value::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}
