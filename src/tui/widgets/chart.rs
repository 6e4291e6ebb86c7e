//! Chart widgets for the TUI.
//!
//! `ChartView` draws any `ChartData` (scatter and line through ratatui's
//! `Chart`, bars and histograms through `BarChart`). `ControlsBar` shows the
//! axis pickers and the chart type selector.

use crate::chart::{format_number, BarData, ChartData, ChartKind, HistogramData, PointChart, XScale};
use crate::error::Result;
use crate::tui::app::{ChartControl, ChartControls};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};

/// Series colors, reused in order.
const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
    Color::Blue,
];

/// Most X labels drawn on a categorical axis before only the ends are shown.
const MAX_CATEGORY_LABELS: usize = 8;

const MAX_BAR_WIDTH: usize = 12;

/// Heading over every chart, followed by the chart kind.
pub const CHART_HEADING: &str = "Visualization of Query Results";

/// Renders the chart built for the current controls, or the reason it
/// could not be built.
pub struct ChartView<'a> {
    kind: ChartKind,
    data: &'a Result<ChartData>,
    focused: bool,
}

impl<'a> ChartView<'a> {
    pub fn new(kind: ChartKind, data: &'a Result<ChartData>, focused: bool) -> Self {
        Self {
            kind,
            data,
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
            .title(format!(" {CHART_HEADING}: {} ", self.kind.title()))
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);

        match self.data {
            Ok(ChartData::Scatter(chart)) => render_points(chart, GraphType::Scatter, inner, buf),
            Ok(ChartData::Line(chart)) => render_points(chart, GraphType::Line, inner, buf),
            Ok(ChartData::Bar(bars)) => render_bars(bars, inner, buf),
            Ok(ChartData::Histogram(hist)) => render_histogram(hist, inner, buf),
            Err(e) => Paragraph::new(Line::from(Span::styled(
                e.to_string(),
                Style::default().fg(Color::Red),
            )))
            .wrap(Wrap { trim: true })
            .render(inner, buf),
        }
    }
}

fn render_points(chart: &PointChart, graph_type: GraphType, area: Rect, buf: &mut Buffer) {
    let datasets: Vec<Dataset> = chart
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            Dataset::default()
                .name(series.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
                .data(&series.points)
        })
        .collect();

    let x_labels = match &chart.x_scale {
        XScale::Numeric => numeric_labels(chart.x_bounds),
        XScale::Categorical(labels) => category_labels(labels),
    };

    let y_title = chart
        .series
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(Span::styled(chart.x_title.clone(), Style::default().fg(Color::Gray)))
                .style(Style::default().fg(Color::DarkGray))
                .bounds(chart.x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(y_title, Style::default().fg(Color::Gray)))
                .style(Style::default().fg(Color::DarkGray))
                .bounds(chart.y_bounds)
                .labels(numeric_labels(chart.y_bounds)),
        )
        .render(area, buf);
}

fn numeric_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::raw(format_number(v)))
        .collect()
}

/// Labels spread evenly over positions `0..n`, so they line up only when
/// every label or just the two ends are drawn.
fn category_labels(labels: &[String]) -> Vec<Span<'static>> {
    match labels.len() {
        0 => Vec::new(),
        // A lone category sits in the middle of the widened bounds
        1 => vec![Span::raw(""), Span::raw(labels[0].clone()), Span::raw("")],
        n if n <= MAX_CATEGORY_LABELS => labels.iter().map(|l| Span::raw(l.clone())).collect(),
        n => vec![Span::raw(labels[0].clone()), Span::raw(labels[n - 1].clone())],
    }
}

/// Bar width that fits `groups * per_group` bars plus gaps into `width`
/// columns. Counts past `u16::MAX` collapse to the narrowest bar.
fn bar_width(width: u16, groups: usize, per_group: usize) -> u16 {
    let bars = groups.saturating_mul(per_group).max(1);
    let gaps = groups.saturating_mul(2).saturating_add(bars);
    let fit = usize::from(width).saturating_sub(gaps) / bars;
    u16::try_from(fit.clamp(1, MAX_BAR_WIDTH)).unwrap_or(1)
}

fn render_bars(data: &BarData, area: Rect, buf: &mut Buffer) {
    // One legend line when there are several series
    let (legend_area, chart_area) = if data.series_names.len() > 1 && area.height > 3 {
        (
            Some(Rect { height: 1, ..area }),
            Rect {
                y: area.y + 1,
                height: area.height - 1,
                ..area
            },
        )
    } else {
        (None, area)
    };

    if let Some(legend_area) = legend_area {
        let spans: Vec<Span> = data
            .series_names
            .iter()
            .enumerate()
            .flat_map(|(i, name)| {
                [
                    Span::styled("■ ", Style::default().fg(PALETTE[i % PALETTE.len()])),
                    Span::raw(format!("{name}  ")),
                ]
            })
            .collect();
        buf.set_line(legend_area.x, legend_area.y, &Line::from(spans), legend_area.width);
    }

    let width = bar_width(chart_area.width, data.categories.len(), data.series_names.len());

    let mut chart = BarChart::default()
        .bar_width(width)
        .bar_gap(0)
        .group_gap(2)
        .value_style(Style::default().fg(Color::Black).add_modifier(Modifier::BOLD));

    for (category, values) in data.categories.iter().zip(&data.values) {
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Bar::default()
                    .value(v.max(0.0).round() as u64)
                    .text_value(format_number(v))
                    .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(category.clone()))
                .bars(&bars),
        );
    }

    chart.render(chart_area, buf);
}

fn render_histogram(data: &HistogramData, area: Rect, buf: &mut Buffer) {
    let bars: Vec<Bar> = data
        .bins
        .iter()
        .map(|bin| {
            Bar::default()
                .value(bin.count)
                .label(Line::from(bin.label.clone()))
                .style(Style::default().fg(PALETTE[0]))
        })
        .collect();

    BarChart::default()
        .bar_width(bar_width(area.width, bars.len(), 1))
        .bar_gap(1)
        .value_style(Style::default().fg(Color::Black).add_modifier(Modifier::BOLD))
        .data(BarGroup::default().bars(&bars))
        .render(area, buf);
}

/// One-line summary of the chart controls.
pub struct ControlsBar<'a> {
    controls: &'a ChartControls,
    focused: bool,
}

impl<'a> ControlsBar<'a> {
    pub fn new(controls: &'a ChartControls, focused: bool) -> Self {
        Self { controls, focused }
    }

    fn label_style(&self, control: ChartControl) -> Style {
        if self.focused && self.controls.active == control {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        }
    }

    /// Y picker text: selected columns, plus the cursor column while the
    /// Y control is active.
    fn y_text(&self) -> String {
        let c = self.controls;
        if !c.kind.uses_y() {
            return "(not used)".to_string();
        }

        let selected = c.y_names().join(", ");
        let selected = if selected.is_empty() {
            "(none)".to_string()
        } else {
            selected
        };

        if self.focused && c.active == ChartControl::Y {
            let cursor = c.columns.get(c.y_cursor).map(String::as_str).unwrap_or("");
            let mark = if c.y.contains(&c.y_cursor) { "x" } else { " " };
            format!("{selected}  [{mark}] {cursor}")
        } else {
            selected
        }
    }
}

impl Widget for ControlsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" X: ", self.label_style(ChartControl::X)),
            Span::raw(format!(" {}   ", self.controls.x_name())),
            Span::styled(" Y: ", self.label_style(ChartControl::Y)),
            Span::raw(format!(" {}   ", self.y_text())),
            Span::styled(" Type: ", self.label_style(ChartControl::Type)),
            Span::raw(format!(" {}", self.controls.kind.label())),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
