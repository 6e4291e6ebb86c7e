//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, Focus};
use super::widgets::{banner, chart, header, input, sidebar, table};
use crate::chart as charting;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Widest the sidebar gets.
const SIDEBAR_MAX_WIDTH: u16 = 36;

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let sidebar_width = SIDEBAR_MAX_WIDTH.min(area.width / 3);
    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(10)])
        .split(main_layout[1]);

    render_header(frame, main_layout[0], app);
    render_sidebar(frame, content_layout[0], app);
    render_main(frame, content_layout[1], app);
}

/// Renders the header bar.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let widget = header::Header::new(&app.title, app.connection_info.as_deref(), app.is_processing);
    frame.render_widget(widget, area);
}

/// Renders the table picker, query editor and info panel.
fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(sidebar::TablePicker::height(&app.tables)),
            Constraint::Min(4),
            Constraint::Length(6),
        ])
        .split(area);

    let picker = sidebar::TablePicker::new(&app.tables, app.selected_table, app.focus == Focus::Tables);
    frame.render_widget(picker, layout[0]);

    let focused = app.focus == Focus::Query;
    let editor = input::QueryEditor::new(&app.input.text, app.input.cursor, focused);
    let cursor = editor.cursor_position(layout[1]);
    frame.render_widget(editor, layout[1]);

    // Position cursor in the editor when focused
    if focused {
        if let Some(position) = cursor {
            frame.set_cursor_position(position);
        }
    }

    frame.render_widget(sidebar::InfoPanel, layout[2]);
}

/// Renders the banner, both result panes and the chart.
fn render_main(frame: &mut Frame, area: Rect, app: &App) {
    let mut constraints = Vec::new();
    if app.error.is_some() {
        constraints.push(Constraint::Length(banner::BANNER_HEIGHT));
    }
    if app.chart.is_some() {
        constraints.extend([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Length(1),
            Constraint::Min(6),
        ]);
    } else {
        constraints.extend([Constraint::Percentage(50), Constraint::Min(3)]);
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut slots = layout.iter().copied();

    if let Some(message) = &app.error {
        if let Some(slot) = slots.next() {
            frame.render_widget(banner::ErrorBanner::new(message), slot);
        }
    }

    let preview_title = match app.current_table() {
        Some(table) => format!("Data from {table}"),
        None => "Data".to_string(),
    };
    if let Some(slot) = slots.next() {
        let pane = table::ResultPane::new(
            preview_title,
            &app.preview,
            app.preview_scroll,
            app.focus == Focus::Preview,
        );
        frame.render_widget(pane, slot);
    }

    if let Some(slot) = slots.next() {
        let pane = table::ResultPane::new(
            "Query Results",
            &app.results,
            app.results_scroll,
            app.focus == Focus::Results,
        );
        frame.render_widget(pane, slot);
    }

    let (Some(controls), Some(result)) = (&app.chart, app.results.result()) else {
        return;
    };
    let focused = app.focus == Focus::Chart;

    if let Some(slot) = slots.next() {
        frame.render_widget(chart::ControlsBar::new(controls, focused), slot);
    }
    if let Some(slot) = slots.next() {
        let data = charting::build(result, &controls.spec());
        frame.render_widget(chart::ChartView::new(controls.kind, &data, focused), slot);
    }
}
