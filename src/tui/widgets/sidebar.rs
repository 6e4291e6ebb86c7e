//! Left column: the table picker on top, the help box at the bottom.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub const INFO_TEXT: &str =
    "Use this dashboard to query and visualize your MySQL data interactively!";

const KEY_HINTS: &str = "Tab: focus  F5: run  Esc: dismiss  Ctrl+Q: quit";

fn frame(title: &'static str, highlighted: bool) -> Block<'static> {
    let color = if highlighted { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
}

/// "Select a Table": one line per table, the current one marked with `>`.
pub struct TablePicker<'a> {
    tables: &'a [String],
    selected: usize,
    focused: bool,
}

impl<'a> TablePicker<'a> {
    pub fn new(tables: &'a [String], selected: usize, focused: bool) -> Self {
        Self {
            tables,
            selected,
            focused,
        }
    }

    /// Rows needed to list every table inside the border.
    pub fn height(tables: &[String]) -> u16 {
        u16::try_from(tables.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
    }
}

impl Widget for TablePicker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let selected = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let lines: Vec<Line> = self
            .tables
            .iter()
            .enumerate()
            .map(|(i, table)| {
                if i == self.selected {
                    Line::styled(format!("> {table}"), selected)
                } else {
                    Line::raw(format!("  {table}"))
                }
            })
            .collect();

        Paragraph::new(lines)
            .block(frame(" Select a Table ", self.focused))
            .render(area, buf);
    }
}

/// "Database Controls": what the dashboard is for and the main keys.
pub struct InfoPanel;

impl Widget for InfoPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = vec![
            Line::from(INFO_TEXT.blue()),
            Line::default(),
            Line::from(KEY_HINTS.dark_gray()),
        ];
        Paragraph::new(text)
            .block(frame(" Database Controls ", false))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
