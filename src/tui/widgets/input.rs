//! Query editor widget for the TUI.
//!
//! A multi-line view of the query box that wraps long SQL at the panel width.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Splits `text` into rows of at most `width` characters.
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if width == 0 || chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

/// Row and column of the cursor within wrapped text.
pub fn cursor_cell(cursor: usize, width: usize) -> (usize, usize) {
    if width == 0 {
        return (0, 0);
    }
    (cursor / width, cursor % width)
}

/// Query editor widget.
pub struct QueryEditor<'a> {
    text: &'a str,
    cursor: usize,
    focused: bool,
}

impl<'a> QueryEditor<'a> {
    /// Creates a new query editor widget.
    pub fn new(text: &'a str, cursor: usize, focused: bool) -> Self {
        Self {
            text,
            cursor,
            focused,
        }
    }

    fn block(&self) -> Block<'static> {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Run a Custom SQL Query ")
            .title_bottom(Line::from(" Enter/F5: Run Query ").right_aligned())
    }

    /// First wrapped row shown so the cursor stays visible.
    fn scroll_rows(&self, inner: Rect) -> usize {
        let (row, _) = cursor_cell(self.cursor, inner.width as usize);
        let height = inner.height.max(1) as usize;
        (row + 1).saturating_sub(height)
    }

    /// Screen position of the cursor when rendered into `area`.
    pub fn cursor_position(&self, area: Rect) -> Option<Position> {
        let inner = self.block().inner(area);
        if inner.width == 0 || inner.height == 0 {
            return None;
        }
        let (row, col) = cursor_cell(self.cursor, inner.width as usize);
        let row = row - self.scroll_rows(inner);
        Some(Position::new(inner.x + col as u16, inner.y + row as u16))
    }
}

impl Widget for QueryEditor<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        let skip = self.scroll_rows(inner);

        let lines: Vec<Line> = wrap_chars(self.text, inner.width as usize)
            .into_iter()
            .skip(skip)
            .map(|row| Line::from(Span::raw(row)))
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_chars() {
        assert_eq!(wrap_chars("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_chars("", 4), vec![""]);
        assert_eq!(wrap_chars("abc", 0), vec![""]);
    }

    #[test]
    fn test_cursor_cell() {
        assert_eq!(cursor_cell(0, 10), (0, 0));
        assert_eq!(cursor_cell(10, 10), (1, 0));
        assert_eq!(cursor_cell(23, 10), (2, 3));
        assert_eq!(cursor_cell(5, 0), (0, 0));
    }

    #[test]
    fn test_cursor_position_scrolls_with_text() {
        // Inner area is 10x2
        let area = Rect::new(0, 0, 12, 4);
        let editor = QueryEditor::new("SELECT * FROM Players LIMIT 10", 30, true);
        let pos = editor.cursor_position(area).unwrap();
        // Cursor on wrapped row 3, shown on the last visible row
        assert_eq!(pos, Position::new(1, 2));
    }

    #[test]
    fn test_render_shows_title_and_text() {
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        QueryEditor::new("SELECT 1", 8, false).render(area, &mut buf);

        let row = |y: u16| -> String { (0..40).map(|x| buf[(x, y)].symbol().to_string()).collect() };
        assert!(row(0).contains("Run a Custom SQL Query"));
        assert!(row(1).contains("SELECT 1"));
    }
}
