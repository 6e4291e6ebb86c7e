//! Executor and dashboard tests against real databases.

pub mod dashboard_test;
pub mod executor_test;
pub mod mysql_test;
