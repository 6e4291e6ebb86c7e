//! tour-dash - A terminal dashboard for browsing and charting PGA Tour data.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod db;
pub mod demo;
pub mod error;
pub mod logging;
pub mod query;
pub mod tui;
