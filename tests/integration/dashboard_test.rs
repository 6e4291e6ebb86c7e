//! End-to-end dashboard flows: actions dispatched against the demo
//! database and applied to the TUI state.

use pretty_assertions::assert_eq;
use std::sync::Arc;
use tour_dash::app::{Action, Dashboard};
use tour_dash::chart::{self, AxisSelection, ChartData, ChartKind, ChartSpec};
use tour_dash::config::DashboardConfig;
use tour_dash::demo::DemoDatabase;
use tour_dash::tui::app::QueryState;
use tour_dash::tui::App;

async fn setup() -> (DemoDatabase, Dashboard, App) {
    let demo = DemoDatabase::create().await.unwrap();
    let config = DashboardConfig::default();
    let dashboard = Dashboard::new(Arc::new(demo.config().clone()), config.preview_limit);
    let app = App::new(&config, Some(demo.config().display_string()));
    (demo, dashboard, app)
}

async fn perform(dashboard: &Dashboard, app: &mut App, action: Action) {
    let outcome = dashboard.dispatch(action).await;
    app.apply(outcome);
}

#[tokio::test]
async fn test_opening_previews_players() {
    let (_demo, dashboard, mut app) = setup().await;

    let action = app.initial_action().unwrap();
    assert_eq!(action, Action::PreviewTable("Players".to_string()));
    perform(&dashboard, &mut app, action).await;

    let preview = app.preview.result().unwrap();
    assert!(preview.row_count > 0 && preview.row_count <= 100);
    assert_eq!(app.input.text, "SELECT * FROM Players LIMIT 10");
    assert!(app.chart.is_none());
}

#[tokio::test]
async fn test_selecting_table_replaces_preview() {
    let (_demo, dashboard, mut app) = setup().await;
    let action = app.initial_action().unwrap();
    perform(&dashboard, &mut app, action).await;

    let action = app.select_table(4).unwrap();
    assert_eq!(action, Action::PreviewTable("Financials".to_string()));
    perform(&dashboard, &mut app, action).await;

    let preview = app.preview.result().unwrap();
    assert_eq!(preview.columns[0].name, "financial_id");
    assert_eq!(app.input.text, "SELECT * FROM Financials LIMIT 10");
}

#[tokio::test]
async fn test_query_then_bar_chart() {
    let (_demo, dashboard, mut app) = setup().await;

    app.input.set("SELECT name, score FROM PerformanceStats LIMIT 5");
    let action = app.run_query_action().unwrap();
    perform(&dashboard, &mut app, action).await;

    let result = app.results.result().unwrap().clone();
    assert_eq!(result.column_names(), vec!["name", "score"]);
    assert!(result.row_count <= 5);

    let controls = app.chart.as_ref().unwrap();
    assert_eq!(controls.x_name(), "name");
    assert_eq!(controls.y_names(), vec!["score"]);

    let spec = ChartSpec {
        kind: ChartKind::Bar,
        selection: AxisSelection { x: 0, y: vec![1] },
    };
    match chart::build(&result, &spec).unwrap() {
        ChartData::Bar(bars) => {
            assert_eq!(bars.x_title, "name");
            assert_eq!(bars.series_names, vec!["score"]);
            assert_eq!(bars.categories.len(), result.row_count);
        }
        other => panic!("expected bar chart, got {:?}", other.kind()),
    }
}

#[tokio::test]
async fn test_bad_query_shows_error_and_no_chart() {
    let (_demo, dashboard, mut app) = setup().await;

    app.input.set("SELECT name, score FROM PerformanceStats LIMIT 5");
    let action = app.run_query_action().unwrap();
    perform(&dashboard, &mut app, action).await;
    assert!(app.chart.is_some());

    app.input.set("SELEC * FROM X");
    let action = app.run_query_action().unwrap();
    perform(&dashboard, &mut app, action).await;

    assert!(matches!(app.results, QueryState::Failed(_)));
    assert_eq!(app.results.row_count(), 0);
    assert!(app.error.is_some());
    assert!(app.chart.is_none());
}

#[tokio::test]
async fn test_empty_result_has_no_chart() {
    let (_demo, dashboard, mut app) = setup().await;

    app.input.set("SELECT * FROM Players WHERE 1 = 0");
    let action = app.run_query_action().unwrap();
    perform(&dashboard, &mut app, action).await;

    assert!(matches!(app.results, QueryState::Loaded(_)));
    assert!(app.chart.is_none());
    assert!(app.error.is_none());
}

#[tokio::test]
async fn test_single_column_defaults_y_to_it() {
    let (_demo, dashboard, mut app) = setup().await;

    app.input.set("SELECT score FROM PerformanceStats");
    let action = app.run_query_action().unwrap();
    perform(&dashboard, &mut app, action).await;

    let controls = app.chart.as_ref().unwrap();
    assert_eq!(controls.x_name(), "score");
    assert_eq!(controls.y_names(), vec!["score"]);
}
