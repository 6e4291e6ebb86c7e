//! Result panes: a bordered box holding a ratatui [`Table`] of rows and a
//! one-line footer with the row count, timing and truncation notice.

use crate::db::{QueryResult, Value};
use crate::tui::app::QueryState;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

const MIN_COLUMN_WIDTH: u16 = 4;
const MAX_COLUMN_WIDTH: u16 = 40;

/// Widest of header and cells per column, clamped to a readable range.
fn column_widths(result: &QueryResult) -> Vec<u16> {
    result
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let widest_cell = result
                .column_values(i)
                .map(|v| v.to_string().chars().count())
                .max()
                .unwrap_or(0);
            let width = column.name.chars().count().max(widest_cell);
            u16::try_from(width)
                .unwrap_or(MAX_COLUMN_WIDTH)
                .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// Cuts `text` to `width` characters, marking the cut with an ellipsis.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    match width {
        0 => String::new(),
        _ => text.chars().take(width - 1).chain(['…']).collect(),
    }
}

fn cell(value: &Value, width: u16) -> Cell<'static> {
    let text = clip(&value.to_string(), usize::from(width));
    if value.is_null() {
        Cell::from(text).style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Cell::from(text)
    }
}

fn footer(result: &QueryResult, scroll: usize) -> Line<'static> {
    let plural = if result.row_count == 1 { "" } else { "s" };
    let mut summary = format!(
        "{} row{plural} returned ({}ms)",
        result.row_count,
        result.execution_time.as_millis()
    );
    if scroll > 0 && !result.rows.is_empty() {
        summary += &format!(" | from row {}", scroll.min(result.rows.len() - 1) + 1);
    }

    let mut spans = vec![Span::styled(summary, Style::default().fg(Color::DarkGray))];
    if let Some(warning) = result.truncation_warning() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(warning, Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

/// A titled, bordered pane showing one [`QueryState`].
pub struct ResultPane<'a> {
    title: String,
    state: &'a QueryState,
    scroll: usize,
    focused: bool,
}

impl<'a> ResultPane<'a> {
    pub fn new(title: impl Into<String>, state: &'a QueryState, scroll: usize, focused: bool) -> Self {
        Self {
            title: title.into(),
            state,
            scroll,
            focused,
        }
    }

    fn render_rows(&self, result: &QueryResult, area: Rect, buf: &mut Buffer) {
        let [table_area, footer_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let widths = column_widths(result);
        let header = Row::new(result.columns.iter().zip(&widths).map(|(column, &width)| {
            Cell::from(clip(&column.name, usize::from(width)))
        }))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let visible = usize::from(table_area.height.saturating_sub(1));
        let rows = result
            .rows
            .iter()
            .skip(self.scroll)
            .take(visible)
            .map(|row| Row::new(row.iter().zip(&widths).map(|(value, &width)| cell(value, width))));

        Table::new(rows, widths.iter().copied().map(Constraint::Length))
            .header(header)
            .column_spacing(1)
            .render(table_area, buf);
        Paragraph::new(footer(result, self.scroll)).render(footer_area, buf);
    }
}

impl Widget for ResultPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", self.title));
        let inner = block.inner(area);
        block.render(area, buf);

        let placeholder = match self.state {
            QueryState::Loaded(result) if !result.is_empty() => {
                return self.render_rows(result, inner, buf);
            }
            QueryState::NotRun => "No query run yet",
            QueryState::Failed(_) | QueryState::Loaded(_) => "(no rows)",
        };
        Paragraph::new(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
            .render(inner, buf);
    }
}
