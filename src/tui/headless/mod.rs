//! Headless runs of the dashboard.
//!
//! The dashboard is drawn into an in-memory [`TestBackend`] while a step
//! script drives it, so sessions can be checked from tests and CI without a
//! terminal or a MySQL server.

mod script;

pub use script::{parse, Check, Step};

use crate::app::{Action, Dashboard};
use crate::cli::{Cli, OutputFormat, ScreenSize};
use crate::error::{DashError, Result};
use crate::tui::app::App;
use crate::tui::{ui, Event};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use serde::Serialize;
use tracing::warn;

/// What a script can observe about the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadlessState {
    pub focus: String,
    pub input_text: String,
    pub selected_table: Option<String>,
    pub preview_rows: usize,
    pub result_rows: usize,
    pub result_columns: Vec<String>,
    pub has_chart: bool,
    pub chart_kind: Option<String>,
    pub x_axis: Option<String>,
    pub y_axis: Vec<String>,
    pub error: Option<String>,
}

impl HeadlessState {
    pub fn from_app(app: &App) -> Self {
        let chart = app.chart.as_ref();
        Self {
            focus: app.focus.as_str().to_string(),
            input_text: app.input.text.clone(),
            selected_table: app.current_table().map(String::from),
            preview_rows: app.preview.row_count(),
            result_rows: app.results.row_count(),
            result_columns: app.results.column_names(),
            has_chart: chart.is_some(),
            chart_kind: chart.map(|c| c.kind.label().to_string()),
            x_axis: chart.map(|c| c.x_name().to_string()),
            y_axis: chart
                .map(|c| c.y_names().into_iter().map(String::from).collect())
                .unwrap_or_default(),
            error: app.error.clone(),
        }
    }

    /// A field rendered as text: lists are comma-joined and missing values are empty.
    pub fn field(&self, name: &str) -> Option<String> {
        let fields = serde_json::to_value(self).ok()?;
        Some(match fields.get(name)? {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map_or_else(|| v.to_string(), String::from))
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        })
    }
}

/// Outcome of a headless run.
#[derive(Debug, Serialize)]
pub struct Report {
    pub screen: Vec<String>,
    pub steps: usize,
    pub assertions: Assertions,
    pub state: HeadlessState,
}

#[derive(Debug, Default, Serialize)]
pub struct Assertions {
    pub passed: usize,
    pub failed: usize,
}

impl Report {
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .map(|json| json + "\n")
                .map_err(|e| DashError::internal(format!("Failed to encode report: {e}"))),
            OutputFormat::Text => Ok(format!(
                "{}\nSteps: {} run | Assertions: {} passed, {} failed\n",
                self.screen.join("\n"),
                self.steps,
                self.assertions.passed,
                self.assertions.failed
            )),
        }
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.assertions.failed > 0)
    }
}

/// Drives an [`App`] and [`Dashboard`] from a script.
pub struct HeadlessRunner {
    terminal: Terminal<TestBackend>,
    app: App,
    dashboard: Dashboard,
    fail_fast: bool,
}

impl HeadlessRunner {
    pub fn new(app: App, dashboard: Dashboard, size: ScreenSize) -> Result<Self> {
        let terminal = Terminal::new(TestBackend::new(size.width, size.height))
            .map_err(|e| DashError::internal(format!("Failed to create test terminal: {e}")))?;
        Ok(Self {
            terminal,
            app,
            dashboard,
            fail_fast: false,
        })
    }

    /// Stops the run at the first failed assertion.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Loads the first table, runs `steps` in order and reports the final screen.
    pub async fn run(mut self, steps: Vec<Step>) -> Result<Report> {
        if let Some(action) = self.app.initial_action() {
            self.perform(action).await;
        }

        let mut assertions = Assertions::default();
        let mut executed = 0;

        for step in steps {
            executed += 1;
            match step {
                Step::Key(key) => {
                    if let Some(action) = self.app.handle_event(Event::Key(key)) {
                        self.perform(action).await;
                    }
                }
                Step::Type(text) => text.chars().for_each(|c| self.app.input.insert(c)),
                Step::Expect(check) => {
                    let screen = self.draw()?.join("\n");
                    if check.holds(&screen, &HeadlessState::from_app(&self.app)) {
                        assertions.passed += 1;
                    } else {
                        warn!(?check, "Assertion failed");
                        assertions.failed += 1;
                        if self.fail_fast {
                            break;
                        }
                    }
                }
            }
            if !self.app.running {
                break;
            }
        }

        Ok(Report {
            screen: self.draw()?,
            steps: executed,
            assertions,
            state: HeadlessState::from_app(&self.app),
        })
    }

    async fn perform(&mut self, action: Action) {
        let outcome = self.dashboard.dispatch(action).await;
        self.app.apply(outcome);
    }

    fn draw(&mut self) -> Result<Vec<String>> {
        let app = &self.app;
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| DashError::internal(format!("Failed to render: {e}")))?;
        Ok(screen_lines(self.terminal.backend().buffer()))
    }
}

/// Buffer rows with trailing blanks trimmed, and trailing empty rows dropped.
fn screen_lines(buffer: &Buffer) -> Vec<String> {
    let width = usize::from(buffer.area.width).max(1);
    let mut lines: Vec<String> = buffer
        .content
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect();
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Runs the `--headless` session described by `cli` and prints its report.
pub async fn run_headless(cli: &Cli, app: App, dashboard: Dashboard) -> Result<i32> {
    let args = &cli.headless;
    let script = args
        .events
        .as_deref()
        .ok_or_else(|| DashError::config("--headless requires --events"))?;
    let steps = parse(script)?;

    let report = HeadlessRunner::new(app, dashboard, args.size)?
        .fail_fast(args.fail_fast)
        .run(steps)
        .await?;

    print!("{}", report.render(args.output)?);
    Ok(report.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::db::{Connector, FailingConnector, MockConnector};
    use crate::tui::app::QueryState;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const SIZE: ScreenSize = ScreenSize {
        width: 120,
        height: 40,
    };

    fn runner(connector: Arc<dyn Connector>) -> HeadlessRunner {
        let dashboard = DashboardConfig::default();
        let app = App::new(&dashboard, Some("mock".to_string()));
        HeadlessRunner::new(app, Dashboard::new(connector, dashboard.preview_limit), SIZE).unwrap()
    }

    #[tokio::test]
    async fn test_initial_preview_is_loaded() {
        let connector = Arc::new(MockConnector::default());
        let report = runner(connector.clone())
            .run(parse("assert:contains:Data from Players").unwrap())
            .await
            .unwrap();

        assert_eq!(report.assertions.failed, 0);
        assert_eq!(report.state.preview_rows, 3);
        assert_eq!(connector.queries(), vec!["SELECT * FROM Players LIMIT 100"]);
        assert_eq!(connector.close_count(), 1);
    }

    #[tokio::test]
    async fn test_run_query_shows_chart_controls() {
        let report = runner(Arc::new(MockConnector::default()))
            .run(parse("key:f5,assert:state:has_chart=true,assert:contains:Scatter").unwrap())
            .await
            .unwrap();

        assert_eq!(report.assertions.failed, 0);
        assert_eq!(report.state.result_columns, vec!["name", "score"]);
        assert_eq!(report.state.x_axis.as_deref(), Some("name"));
        assert_eq!(report.state.y_axis, vec!["score"]);
        assert_eq!(report.state.field("result_columns").as_deref(), Some("name,score"));
    }

    #[tokio::test]
    async fn test_unreachable_database_shows_banner() {
        let report = runner(Arc::new(FailingConnector::new("Connection refused")))
            .run(parse("assert:contains:Error executing query,assert:state:has_chart=false").unwrap())
            .await
            .unwrap();

        assert_eq!(report.assertions.failed, 0);
        assert!(report.state.error.is_some());
        assert_eq!(report.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_after_first_failure() {
        let report = runner(Arc::new(MockConnector::default()))
            .fail_fast(true)
            .run(parse("assert:contains:no such text,key:f5").unwrap())
            .await
            .unwrap();

        assert_eq!(report.assertions.failed, 1);
        assert_eq!(report.steps, 1);
        assert_eq!(report.state.result_rows, 0);
        assert_eq!(report.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_failed_assertion_does_not_stop_by_default() {
        let report = runner(Arc::new(MockConnector::default()))
            .run(parse("assert:state:focus=chart,key:f5").unwrap())
            .await
            .unwrap();

        assert_eq!(report.assertions.failed, 1);
        assert_eq!(report.steps, 2);
        assert_eq!(report.state.result_rows, 3);
    }

    #[test]
    fn test_state_field_text() {
        let mut app = App::new(&DashboardConfig::default(), None);
        app.results = QueryState::Failed("boom".to_string());
        app.error = Some("boom".to_string());
        let state = HeadlessState::from_app(&app);

        assert_eq!(state.field("selected_table").as_deref(), Some("Players"));
        assert_eq!(state.field("has_chart").as_deref(), Some("false"));
        assert_eq!(state.field("chart_kind").as_deref(), Some(""));
        assert_eq!(state.field("error").as_deref(), Some("boom"));
        assert_eq!(state.field("no_such_field"), None);
    }

    #[test]
    fn test_report_rendering() {
        let report = Report {
            screen: vec!["PGA Tour Analytics".to_string(), "Data from Players".to_string()],
            steps: 2,
            assertions: Assertions { passed: 1, failed: 0 },
            state: HeadlessState {
                selected_table: Some("Players".to_string()),
                ..Default::default()
            },
        };

        let text = report.render(OutputFormat::Text).unwrap();
        assert!(text.starts_with("PGA Tour Analytics\nData from Players\n"));
        assert!(text.contains("Steps: 2 run | Assertions: 1 passed, 0 failed"));

        let json: serde_json::Value =
            serde_json::from_str(&report.render(OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["screen"][1], "Data from Players");
        assert_eq!(json["assertions"]["passed"], 1);
        assert_eq!(json["state"]["selected_table"], "Players");
        assert_eq!(json["state"]["error"], serde_json::Value::Null);
    }
}
