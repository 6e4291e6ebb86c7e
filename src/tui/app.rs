//! Application state for the TUI.
//!
//! `App` is the session context: selected table, query text, both result
//! panes, chart controls and the error banner. Input handling returns
//! `Action`s for the dashboard; results come back through `App::apply`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, Outcome};
use crate::chart::{AxisSelection, ChartKind, ChartSpec};
use crate::config::DashboardConfig;
use crate::db::QueryResult;
use crate::query::default_query_text;

use super::Event;

/// Rows moved by PageUp/PageDown in the result panes.
const PAGE_SIZE: usize = 10;

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tables,
    Query,
    Preview,
    Results,
    Chart,
}

impl Focus {
    /// Cycles to the next focus panel. The chart panel is skipped when absent.
    pub fn next(self, has_chart: bool) -> Self {
        match self {
            Self::Tables => Self::Query,
            Self::Query => Self::Preview,
            Self::Preview => Self::Results,
            Self::Results if has_chart => Self::Chart,
            Self::Results | Self::Chart => Self::Tables,
        }
    }

    /// Cycles to the previous focus panel.
    pub fn prev(self, has_chart: bool) -> Self {
        match self {
            Self::Tables if has_chart => Self::Chart,
            Self::Tables => Self::Results,
            Self::Query => Self::Tables,
            Self::Preview => Self::Query,
            Self::Results => Self::Preview,
            Self::Chart => Self::Results,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tables => "tables",
            Self::Query => "query",
            Self::Preview => "preview",
            Self::Results => "results",
            Self::Chart => "chart",
        }
    }
}

/// State of one result pane.
#[derive(Debug, Clone, Default)]
pub enum QueryState {
    /// Nothing has run yet.
    #[default]
    NotRun,
    /// The last execution failed; the pane shows no rows.
    Failed(String),
    /// The last execution returned this result.
    Loaded(QueryResult),
}

impl QueryState {
    pub fn result(&self) -> Option<&QueryResult> {
        match self {
            Self::Loaded(result) => Some(result),
            _ => None,
        }
    }

    /// Number of rows on display (zero unless loaded).
    pub fn row_count(&self) -> usize {
        self.result().map_or(0, |r| r.rows.len())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.result().map(QueryResult::column_names).unwrap_or_default()
    }
}

/// The chart control that arrow keys currently adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartControl {
    #[default]
    X,
    Y,
    Type,
}

/// Axis pickers and chart-type selector for a non-empty result.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartControls {
    pub columns: Vec<String>,
    pub x: usize,
    /// Selected Y columns, kept in column order.
    pub y: Vec<usize>,
    /// Column highlighted in the Y picker.
    pub y_cursor: usize,
    pub kind: ChartKind,
    pub active: ChartControl,
}

impl ChartControls {
    /// Builds default controls for `result`, or `None` when it has no rows.
    pub fn for_result(result: &QueryResult) -> Option<Self> {
        if result.is_empty() {
            return None;
        }
        let columns = result.column_names();
        let selection = AxisSelection::default_for(columns.len())?;
        let y_cursor = selection.y.first().copied().unwrap_or(0);

        Some(Self {
            columns,
            x: selection.x,
            y: selection.y,
            y_cursor,
            kind: ChartKind::default(),
            active: ChartControl::default(),
        })
    }

    /// The chart request described by the current controls.
    pub fn spec(&self) -> ChartSpec {
        ChartSpec {
            kind: self.kind,
            selection: AxisSelection {
                x: self.x,
                y: self.y.clone(),
            },
        }
    }

    pub fn x_name(&self) -> &str {
        self.columns.get(self.x).map(String::as_str).unwrap_or("")
    }

    pub fn y_names(&self) -> Vec<&str> {
        self.y
            .iter()
            .filter_map(|&i| self.columns.get(i).map(String::as_str))
            .collect()
    }

    pub fn next_control(&mut self) {
        self.active = match self.active {
            ChartControl::X => ChartControl::Y,
            ChartControl::Y => ChartControl::Type,
            ChartControl::Type => ChartControl::X,
        };
    }

    pub fn prev_control(&mut self) {
        self.active = match self.active {
            ChartControl::X => ChartControl::Type,
            ChartControl::Y => ChartControl::X,
            ChartControl::Type => ChartControl::Y,
        };
    }

    /// Moves the active control one step forward (`true`) or back.
    pub fn step(&mut self, forward: bool) {
        let n = self.columns.len().max(1);
        let shift = |i: usize| if forward { (i + 1) % n } else { (i + n - 1) % n };

        match self.active {
            ChartControl::X => self.x = shift(self.x),
            ChartControl::Y => self.y_cursor = shift(self.y_cursor),
            ChartControl::Type => {
                self.kind = if forward {
                    self.kind.next()
                } else {
                    self.kind.prev()
                }
            }
        }
    }

    /// Adds or removes the column under the Y cursor.
    pub fn toggle_y(&mut self) {
        if let Some(pos) = self.y.iter().position(|&i| i == self.y_cursor) {
            self.y.remove(pos);
        } else if self.y_cursor < self.columns.len() {
            self.y.push(self.y_cursor);
            self.y.sort_unstable();
        }
    }
}

/// Input state for text editing.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current input text.
    pub text: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl InputState {
    /// Creates a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the text and moves the cursor to the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_count();
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    /// Deletes the character at the cursor (delete key).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    /// Moves the cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor to the start of the input.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the end of the input.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Clears the input.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Returns true if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus panel.
    pub focus: Focus,
    /// Dashboard title shown in the header.
    pub title: String,
    /// Tables offered by the picker.
    pub tables: Vec<String>,
    /// Index into `tables`.
    pub selected_table: usize,
    /// Row limit used for the query box's default text.
    pub query_limit: usize,
    /// Query box state.
    pub input: InputState,
    /// "Data from <table>" pane.
    pub preview: QueryState,
    /// "Query Results" pane.
    pub results: QueryState,
    pub preview_scroll: usize,
    pub results_scroll: usize,
    /// Present only while `results` holds rows.
    pub chart: Option<ChartControls>,
    /// Error banner text.
    pub error: Option<String>,
    /// Whether a query is currently running.
    pub is_processing: bool,
    /// Database connection info for display.
    pub connection_info: Option<String>,
}

impl App {
    /// Creates a new App instance with the first table selected.
    pub fn new(dashboard: &DashboardConfig, connection_info: Option<String>) -> Self {
        let mut app = Self {
            running: true,
            focus: Focus::default(),
            title: dashboard.title.clone(),
            tables: dashboard.tables.clone(),
            selected_table: 0,
            query_limit: dashboard.query_limit,
            input: InputState::new(),
            preview: QueryState::NotRun,
            results: QueryState::NotRun,
            preview_scroll: 0,
            results_scroll: 0,
            chart: None,
            error: None,
            is_processing: false,
            connection_info,
        };
        app.reset_query_text();
        app
    }

    /// Name of the selected table.
    pub fn current_table(&self) -> Option<&str> {
        self.tables.get(self.selected_table).map(String::as_str)
    }

    /// The preview to load when the dashboard opens.
    pub fn initial_action(&self) -> Option<Action> {
        self.current_table()
            .map(|t| Action::PreviewTable(t.to_string()))
    }

    fn reset_query_text(&mut self) {
        let text = self
            .current_table()
            .map(|t| default_query_text(t, self.query_limit))
            .unwrap_or_default();
        self.input.set(text);
    }

    /// Selects the table at `index` and returns its preview action.
    ///
    /// The query box is reset to the table's default query.
    pub fn select_table(&mut self, index: usize) -> Option<Action> {
        if index >= self.tables.len() {
            return None;
        }
        self.selected_table = index;
        self.reset_query_text();
        self.initial_action()
    }

    /// Builds the action for the query box, ignoring blank text.
    pub fn run_query_action(&self) -> Option<Action> {
        let sql = self.input.text.trim();
        if sql.is_empty() {
            None
        } else {
            Some(Action::RunQuery(sql.to_string()))
        }
    }

    /// Stores an outcome, replacing the previous contents of its pane.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Preview { result, .. } => {
                self.preview_scroll = 0;
                self.preview = match result {
                    Ok(result) => {
                        self.error = None;
                        QueryState::Loaded(result)
                    }
                    Err(e) => {
                        self.error = Some(e.to_string());
                        QueryState::Failed(e.to_string())
                    }
                };
            }
            Outcome::Query { result, .. } => {
                self.results_scroll = 0;
                match result {
                    Ok(result) => {
                        self.error = None;
                        self.chart = ChartControls::for_result(&result);
                        self.results = QueryState::Loaded(result);
                    }
                    Err(e) => {
                        self.error = Some(e.to_string());
                        self.chart = None;
                        self.results = QueryState::Failed(e.to_string());
                    }
                }
                if self.chart.is_none() && self.focus == Focus::Chart {
                    self.focus = Focus::Results;
                }
            }
        }
    }

    /// Handles an event and returns the action it triggers, if any.
    pub fn handle_event(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(key),
            // Terminal resize is handled automatically by ratatui
            Event::Resize(_, _) | Event::Tick => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
                None
            }
            KeyCode::Char('r') if ctrl => self.run_query_action(),
            KeyCode::F(5) => self.run_query_action(),
            KeyCode::Esc => {
                self.error = None;
                None
            }
            KeyCode::Tab => {
                self.focus = self.focus.next(self.chart.is_some());
                None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev(self.chart.is_some());
                None
            }
            _ => match self.focus {
                Focus::Tables => self.handle_tables_key(key),
                Focus::Query => self.handle_query_key(key),
                Focus::Preview => {
                    let rows = self.preview.row_count();
                    scroll(&mut self.preview_scroll, rows, key.code);
                    None
                }
                Focus::Results => {
                    let rows = self.results.row_count();
                    scroll(&mut self.results_scroll, rows, key.code);
                    None
                }
                Focus::Chart => {
                    self.handle_chart_key(key);
                    None
                }
            },
        }
    }

    fn handle_tables_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up if self.selected_table > 0 => self.select_table(self.selected_table - 1),
            KeyCode::Down => self.select_table(self.selected_table + 1),
            KeyCode::Enter => self.initial_action(),
            _ => None,
        }
    }

    fn handle_query_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter => return self.run_query_action(),
            KeyCode::Char('u') if ctrl => self.input.clear(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.input.insert(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
        None
    }

    fn handle_chart_key(&mut self, key: KeyEvent) {
        let Some(controls) = self.chart.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Left => controls.prev_control(),
            KeyCode::Right => controls.next_control(),
            KeyCode::Up => controls.step(false),
            KeyCode::Down => controls.step(true),
            KeyCode::Char(' ') | KeyCode::Enter if controls.active == ChartControl::Y => {
                controls.toggle_y()
            }
            _ => {}
        }
    }
}

/// Applies a scroll key to `offset`, keeping it within `rows`.
fn scroll(offset: &mut usize, rows: usize, code: KeyCode) {
    let max = rows.saturating_sub(1);
    *offset = match code {
        KeyCode::Up => offset.saturating_sub(1),
        KeyCode::Down => offset.saturating_add(1),
        KeyCode::PageUp => offset.saturating_sub(PAGE_SIZE),
        KeyCode::PageDown => offset.saturating_add(PAGE_SIZE),
        KeyCode::Home => 0,
        KeyCode::End => max,
        _ => *offset,
    }
    .min(max);
}
