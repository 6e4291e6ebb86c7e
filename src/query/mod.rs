//! Query execution for tour-dash.
//!
//! Every query gets its own connection, opened and closed around the call.

pub mod executor;

pub use executor::{default_query_text, preview_sql, QueryExecutor};
