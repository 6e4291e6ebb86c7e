//! Query executor tests against the SQLite demo database.

use pretty_assertions::assert_eq;
use std::sync::Arc;
use tour_dash::demo::DemoDatabase;
use tour_dash::error::DashError;
use tour_dash::query::{preview_sql, QueryExecutor};

async fn demo_executor() -> (DemoDatabase, QueryExecutor) {
    let demo = DemoDatabase::create().await.unwrap();
    let executor = QueryExecutor::new(Arc::new(demo.config().clone()));
    (demo, executor)
}

#[tokio::test]
async fn test_preview_caps_rows() {
    let (_demo, executor) = demo_executor().await;

    let result = executor.preview_table("Players", 100).await.unwrap();
    assert!(result.row_count <= 100);
    assert_eq!(result.row_count, result.rows.len());
    assert_eq!(result.columns[0].name, "player_id");

    let result = executor.preview_table("TournamentParticipation", 3).await.unwrap();
    assert_eq!(result.row_count, 3);
}

#[tokio::test]
async fn test_every_dashboard_table_previews() {
    let (_demo, executor) = demo_executor().await;

    for table in tour_dash::config::DEFAULT_TABLES {
        let result = executor
            .execute(&preview_sql(table, 100))
            .await
            .unwrap_or_else(|e| panic!("{table}: {e}"));
        assert!(!result.is_empty(), "{table} should have rows");
    }
}

#[tokio::test]
async fn test_query_columns_match_select_list() {
    let (_demo, executor) = demo_executor().await;

    let result = executor
        .execute("SELECT name, score FROM PerformanceStats LIMIT 5")
        .await
        .unwrap();

    assert_eq!(result.column_names(), vec!["name", "score"]);
    assert!(result.row_count <= 5);
    assert!(result.rows.iter().all(|row| row.len() == 2));
}

#[tokio::test]
async fn test_empty_result_is_ok() {
    let (_demo, executor) = demo_executor().await;

    let result = executor
        .execute("SELECT * FROM Players WHERE world_ranking > 1000")
        .await
        .unwrap();
    assert!(result.is_empty());
    assert_eq!(result.row_count, 0);
}

#[tokio::test]
async fn test_syntax_error_is_query_error() {
    let (_demo, executor) = demo_executor().await;

    let err = executor.execute("SELEC * FROM X").await.unwrap_err();
    assert!(matches!(err, DashError::Query(_)), "got {err:?}");
}

#[tokio::test]
async fn test_failure_does_not_poison_next_query() {
    let (_demo, executor) = demo_executor().await;

    assert!(executor.execute("SELECT * FROM Nope").await.is_err());
    let result = executor.execute("SELECT COUNT(*) AS n FROM Players").await.unwrap();
    assert_eq!(result.row_count, 1);
}

#[tokio::test]
async fn test_missing_database_file_is_connection_error() {
    let executor = QueryExecutor::new(Arc::new(tour_dash::config::ConnectionConfig::sqlite(
        "/nonexistent/golf.db",
    )));

    let err = executor.execute("SELECT 1").await.unwrap_err();
    assert!(matches!(err, DashError::Connection(_)), "got {err:?}");
}
