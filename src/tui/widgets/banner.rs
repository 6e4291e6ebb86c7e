//! The red box above the result panes. It stays until Esc or the next success.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Rows taken by the banner, border included.
pub const BANNER_HEIGHT: u16 = 4;

pub struct ErrorBanner<'a>(&'a str);

impl<'a> ErrorBanner<'a> {
    pub fn new(message: &'a str) -> Self {
        Self(message)
    }
}

impl Widget for ErrorBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Error (Esc to dismiss) ");
        Paragraph::new(format!("Error executing query: {}", self.0).red().bold())
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_shows_message() {
        let area = Rect::new(0, 0, 80, BANNER_HEIGHT);
        let mut buf = Buffer::empty(area);
        ErrorBanner::new("Query error: table missing").render(area, &mut buf);

        let title: String = (0..80).map(|x| buf[(x, 0)].symbol()).collect();
        let body: String = (0..80).map(|x| buf[(x, 1)].symbol()).collect();
        assert!(title.contains("Esc to dismiss"));
        assert!(body.contains("Error executing query: Query error: table missing"));
        assert_eq!(buf[(1, 1)].fg, Color::Red);
    }
}
