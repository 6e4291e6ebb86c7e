//! Integration tests for tour-dash.
//!
//! Most tests run against the built-in SQLite demo database. MySQL tests
//! skip unless TOUR_DASH_TEST_MYSQL_URL is set.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
mod tui;
