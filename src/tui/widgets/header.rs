//! Top bar: `title vX.Y.Z` on the left, the running notice in the middle,
//! the connected database on the right.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Widget,
};

const RUNNING: &str = "Running query...";

pub struct Header<'a> {
    title: &'a str,
    connection_info: Option<&'a str>,
    is_processing: bool,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str, connection_info: Option<&'a str>, is_processing: bool) -> Self {
        Self {
            title,
            connection_info,
            is_processing,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(bar) = area.rows().next() else {
            return;
        };
        let style = Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD);
        buf.set_style(bar, style);

        Line::raw(format!(" {} v{}", self.title, env!("CARGO_PKG_VERSION"))).render(bar, buf);
        if self.is_processing {
            Line::styled(RUNNING, style.fg(Color::Yellow))
                .alignment(Alignment::Center)
                .render(bar, buf);
        }
        // Dropped rather than clipped when the bar is too narrow
        if let Some(info) = self.connection_info {
            let text = format!(" [db: {info}] ");
            if text.chars().count() < usize::from(bar.width) {
                Line::raw(text).alignment(Alignment::Right).render(bar, buf);
            }
        }
    }
}
