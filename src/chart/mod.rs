//! Chart data for query results.
//!
//! Turns a `QueryResult` plus an axis selection into plot-ready data. Every
//! chart kind goes through [`build`]; the TUI draws whatever `ChartData` comes
//! back.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::db::{QueryResult, Value};
use crate::error::{DashError, Result};

/// Upper bound on histogram bins.
pub const MAX_HISTOGRAM_BINS: usize = 20;

/// The chart types offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChartKind {
    #[default]
    Scatter,
    Line,
    Bar,
    Histogram,
}

impl ChartKind {
    /// All kinds in selector order.
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Histogram,
    ];

    /// Short name shown in the type selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scatter => "Scatter",
            Self::Line => "Line",
            Self::Bar => "Bar",
            Self::Histogram => "Histogram",
        }
    }

    /// Title drawn above the chart.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Scatter => "Scatter Plot",
            Self::Line => "Line Chart",
            Self::Bar => "Bar Chart",
            Self::Histogram => "Histogram",
        }
    }

    /// Whether this kind plots Y columns. Histograms take X only.
    pub fn uses_y(&self) -> bool {
        !matches!(self, Self::Histogram)
    }

    /// Next kind in selector order, wrapping.
    pub fn next(&self) -> Self {
        let i = self.position();
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Previous kind in selector order, wrapping.
    pub fn prev(&self) -> Self {
        let i = self.position();
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Parses a kind from its label, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s.trim()))
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Selected X column and Y columns, as column indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSelection {
    pub x: usize,
    pub y: Vec<usize>,
}

impl AxisSelection {
    /// Default selection for a result with `column_count` columns: X is the
    /// first column, Y the second (or the first when there is only one).
    pub fn default_for(column_count: usize) -> Option<Self> {
        match column_count {
            0 => None,
            1 => Some(Self { x: 0, y: vec![0] }),
            _ => Some(Self { x: 0, y: vec![1] }),
        }
    }
}

/// A chart request: kind plus axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub selection: AxisSelection,
}

/// One plotted series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// How X positions map back to labels.
#[derive(Debug, Clone, PartialEq)]
pub enum XScale {
    Numeric,
    /// Position `i` is the `i`th label.
    Categorical(Vec<String>),
}

/// Scatter or line data.
#[derive(Debug, Clone, PartialEq)]
pub struct PointChart {
    pub x_title: String,
    pub x_scale: XScale,
    pub series: Vec<Series>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Bar data: `values[category][series]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BarData {
    pub x_title: String,
    pub categories: Vec<String>,
    pub series_names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub label: String,
    pub count: u64,
}

/// Histogram data over the X column.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramData {
    pub x_title: String,
    pub bins: Vec<Bin>,
}

/// Plot-ready data for one chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Scatter(PointChart),
    Line(PointChart),
    Bar(BarData),
    Histogram(HistogramData),
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Scatter(_) => ChartKind::Scatter,
            Self::Line(_) => ChartKind::Line,
            Self::Bar(_) => ChartKind::Bar,
            Self::Histogram(_) => ChartKind::Histogram,
        }
    }
}

/// Builds chart data for `spec` from `result`.
pub fn build(result: &QueryResult, spec: &ChartSpec) -> Result<ChartData> {
    if result.is_empty() {
        return Err(DashError::chart("No rows to plot"));
    }

    let x = spec.selection.x;
    check_column(result, x)?;

    if spec.kind.uses_y() {
        if spec.selection.y.is_empty() {
            return Err(DashError::chart("Select at least one Y column"));
        }
        for &y in &spec.selection.y {
            check_column(result, y)?;
        }
    }

    match spec.kind {
        ChartKind::Scatter => points(result, &spec.selection).map(ChartData::Scatter),
        ChartKind::Line => points(result, &spec.selection).map(ChartData::Line),
        ChartKind::Bar => bars(result, &spec.selection).map(ChartData::Bar),
        ChartKind::Histogram => histogram(result, x).map(ChartData::Histogram),
    }
}

fn check_column(result: &QueryResult, index: usize) -> Result<()> {
    if index < result.columns.len() {
        Ok(())
    } else {
        Err(DashError::chart(format!("Column {index} is out of range")))
    }
}

fn column_name(result: &QueryResult, index: usize) -> String {
    result
        .columns
        .get(index)
        .map(|c| c.name.clone())
        .unwrap_or_default()
}

/// True when every non-null value is numeric and at least one exists.
fn is_numeric_column(result: &QueryResult, index: usize) -> bool {
    let mut seen = false;
    for value in result.column_values(index).filter(|v| !v.is_null()) {
        if value.as_f64().is_none() {
            return false;
        }
        seen = true;
    }
    seen
}

/// Maps each row's X value to a plot position.
fn x_positions(result: &QueryResult, x: usize) -> (XScale, Vec<Option<f64>>) {
    if is_numeric_column(result, x) {
        let positions = result.column_values(x).map(Value::as_f64).collect();
        return (XScale::Numeric, positions);
    }

    let mut labels: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let positions = result
        .column_values(x)
        .map(|v| {
            let label = v.to_string();
            let next = labels.len();
            let pos = *index.entry(label.clone()).or_insert_with(|| {
                labels.push(label);
                next
            });
            Some(pos as f64)
        })
        .collect();

    (XScale::Categorical(labels), positions)
}

fn points(result: &QueryResult, selection: &AxisSelection) -> Result<PointChart> {
    let (x_scale, xs) = x_positions(result, selection.x);

    let mut series = Vec::with_capacity(selection.y.len());
    for &y in &selection.y {
        let name = column_name(result, y);
        let pts: Vec<(f64, f64)> = xs
            .iter()
            .zip(result.column_values(y))
            .filter_map(|(x, v)| Some(((*x)?, v.as_f64()?)))
            .collect();

        if pts.is_empty() {
            return Err(DashError::chart(format!(
                "Column '{name}' has no numeric values to plot"
            )));
        }
        series.push(Series { name, points: pts });
    }

    let all = series.iter().flat_map(|s| s.points.iter());
    let x_bounds = bounds(all.clone().map(|p| p.0));
    let y_bounds = bounds(all.map(|p| p.1));

    Ok(PointChart {
        x_title: column_name(result, selection.x),
        x_scale,
        series,
        x_bounds,
        y_bounds,
    })
}

fn bars(result: &QueryResult, selection: &AxisSelection) -> Result<BarData> {
    let mut categories: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut values: Vec<Vec<f64>> = Vec::new();
    let width = selection.y.len();

    for row in &result.rows {
        let label = row
            .get(selection.x)
            .map(Value::to_string)
            .unwrap_or_default();
        let slot = *index.entry(label.clone()).or_insert_with(|| {
            categories.push(label);
            values.push(vec![0.0; width]);
            values.len() - 1
        });

        for (s, &y) in selection.y.iter().enumerate() {
            if let Some(v) = row.get(y).and_then(Value::as_f64) {
                values[slot][s] += v;
            }
        }
    }

    let series_names: Vec<String> = selection.y.iter().map(|&y| column_name(result, y)).collect();
    for (s, name) in series_names.iter().enumerate() {
        let y = selection.y[s];
        if result.column_values(y).all(|v| v.as_f64().is_none()) {
            return Err(DashError::chart(format!(
                "Column '{name}' has no numeric values to plot"
            )));
        }
    }

    Ok(BarData {
        x_title: column_name(result, selection.x),
        categories,
        series_names,
        values,
    })
}

fn histogram(result: &QueryResult, x: usize) -> Result<HistogramData> {
    let name = column_name(result, x);

    if !is_numeric_column(result, x) {
        let mut bins: Vec<Bin> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for value in result.column_values(x).filter(|v| !v.is_null()) {
            let label = value.to_string();
            match index.get(&label) {
                Some(&i) => bins[i].count += 1,
                None => {
                    index.insert(label.clone(), bins.len());
                    bins.push(Bin { label, count: 1 });
                }
            }
        }
        if bins.is_empty() {
            return Err(DashError::chart(format!("Column '{name}' has no values to plot")));
        }
        return Ok(HistogramData { x_title: name, bins });
    }

    let values: Vec<f64> = result.column_values(x).filter_map(Value::as_f64).collect();
    if values.is_empty() {
        return Err(DashError::chart(format!("Column '{name}' has no values to plot")));
    }

    let [min, max] = [
        values.iter().copied().fold(f64::INFINITY, f64::min),
        values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    ];

    if min == max {
        return Ok(HistogramData {
            x_title: name,
            bins: vec![Bin {
                label: format_number(min),
                count: values.len() as u64,
            }],
        });
    }

    let bin_count = bin_count(values.len());
    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0u64; bin_count];
    for v in &values {
        let i = (((v - min) / width).floor() as usize).min(bin_count - 1);
        counts[i] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = min + width * i as f64;
            Bin {
                label: format!("{}..{}", format_number(lo), format_number(lo + width)),
                count,
            }
        })
        .collect();

    Ok(HistogramData { x_title: name, bins })
}

/// Number of equal-width bins for `n` values.
pub fn bin_count(n: usize) -> usize {
    ((n as f64).sqrt().ceil() as usize).clamp(1, MAX_HISTOGRAM_BINS)
}

/// Min/max of `values`, widened when they coincide.
fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        [0.0, 1.0]
    } else if lo == hi {
        [lo - 1.0, hi + 1.0]
    } else {
        [lo, hi]
    }
}

/// Formats an axis number compactly.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{v:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
