//! Chart specifications for the presentation layer.
//!
//! Builders are pure: the same result and bindings always produce the same
//! spec, including color assignment. Rendering is someone else's job; a
//! `ChartSpec` only carries labeled data and styling hints.

use serde::Serialize;

use crate::db::result::QueryResult;

/// Fixed dashboard palette, cycled by series or slice position.
pub const CHART_COLORS: [&str; 6] = [
    "#29B5E8", "#146EF5", "#28C840", "#FFA500", "#DC3545", "#667eea",
];

pub fn palette_color(index: usize) -> &'static str {
    CHART_COLORS[index % CHART_COLORS.len()]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeBand {
    pub from: f64,
    pub to: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChartSpec {
    #[serde(rename_all = "camelCase")]
    Pie {
        title: String,
        labels: Vec<String>,
        values: Vec<f64>,
        colors: Vec<String>,
        donut: bool,
    },
    #[serde(rename_all = "camelCase")]
    Bar {
        title: String,
        labels: Vec<String>,
        series: Vec<Series>,
        horizontal: bool,
    },
    #[serde(rename_all = "camelCase")]
    Line {
        title: String,
        x_labels: Vec<String>,
        series: Vec<Series>,
        markers: bool,
    },
    #[serde(rename_all = "camelCase")]
    Heatmap {
        title: String,
        x_labels: Vec<String>,
        y_labels: Vec<String>,
        /// Dense grid, one row per y label, one cell per x label.
        cells: Vec<Vec<f64>>,
    },
    #[serde(rename_all = "camelCase")]
    Gauge {
        title: String,
        value: f64,
        max: f64,
        bands: Vec<GaugeBand>,
    },
    NoData,
}

// ─── Builders ────────────────────────────────────────────────────────────

pub fn pie(qr: &QueryResult, title: &str, label_col: &str, value_col: &str, donut: bool) -> ChartSpec {
    if qr.is_empty() {
        return ChartSpec::NoData;
    }
    let labels = qr.labels(label_col);
    let values = qr.numbers(value_col);
    let colors = (0..labels.len())
        .map(|i| palette_color(i).to_string())
        .collect();
    ChartSpec::Pie {
        title: title.to_string(),
        labels,
        values,
        colors,
        donut,
    }
}

pub fn bar(qr: &QueryResult, title: &str, label_col: &str, value_col: &str, horizontal: bool) -> ChartSpec {
    if qr.is_empty() {
        return ChartSpec::NoData;
    }
    ChartSpec::Bar {
        title: title.to_string(),
        labels: qr.labels(label_col),
        series: vec![Series {
            name: value_col.to_string(),
            values: qr.numbers(value_col),
            color: palette_color(0).to_string(),
        }],
        horizontal,
    }
}

/// Grouped bar: one series per distinct value of `group_col`, aligned on the
/// distinct labels of `label_col` in first-seen order. Missing combinations
/// plot as 0.
pub fn grouped_bar(
    qr: &QueryResult,
    title: &str,
    label_col: &str,
    group_col: &str,
    value_col: &str,
) -> ChartSpec {
    if qr.is_empty() {
        return ChartSpec::NoData;
    }
    let labels = distinct_in_order(&qr.labels(label_col));
    let groups = distinct_in_order(&qr.labels(group_col));

    let series = groups
        .iter()
        .enumerate()
        .map(|(gi, group)| Series {
            name: group.clone(),
            values: pivot_values(qr, &labels, label_col, group_col, group, value_col),
            color: palette_color(gi).to_string(),
        })
        .collect();

    ChartSpec::Bar {
        title: title.to_string(),
        labels,
        series,
        horizontal: false,
    }
}

pub fn line(qr: &QueryResult, title: &str, x_col: &str, value_cols: &[&str], markers: bool) -> ChartSpec {
    if qr.is_empty() {
        return ChartSpec::NoData;
    }
    let series = value_cols
        .iter()
        .enumerate()
        .map(|(i, col)| Series {
            name: (*col).to_string(),
            values: qr.numbers(col),
            color: palette_color(i).to_string(),
        })
        .collect();
    ChartSpec::Line {
        title: title.to_string(),
        x_labels: qr.labels(x_col),
        series,
        markers,
    }
}

/// Long-form line: one series per distinct value of `series_col`, aligned on
/// the distinct x labels in first-seen order.
pub fn multi_line(
    qr: &QueryResult,
    title: &str,
    x_col: &str,
    series_col: &str,
    value_col: &str,
    markers: bool,
) -> ChartSpec {
    if qr.is_empty() {
        return ChartSpec::NoData;
    }
    let x_labels = distinct_in_order(&qr.labels(x_col));
    let names = distinct_in_order(&qr.labels(series_col));

    let series = names
        .iter()
        .enumerate()
        .map(|(i, name)| Series {
            name: name.clone(),
            values: pivot_values(qr, &x_labels, x_col, series_col, name, value_col),
            color: palette_color(i).to_string(),
        })
        .collect();

    ChartSpec::Line {
        title: title.to_string(),
        x_labels,
        series,
        markers,
    }
}

/// Pivots `(y, x, value)` rows into a dense grid. When axis vectors are
/// supplied the grid covers them fully and combinations absent from the
/// result are 0.0; otherwise axes are derived from the data in first-seen
/// order.
pub fn heatmap(
    qr: &QueryResult,
    title: &str,
    x_col: &str,
    y_col: &str,
    value_col: &str,
    axes: Option<(&[String], &[String])>,
) -> ChartSpec {
    if qr.is_empty() {
        return ChartSpec::NoData;
    }
    let (x_labels, y_labels) = match axes {
        Some((xs, ys)) => (xs.to_vec(), ys.to_vec()),
        None => (
            distinct_in_order(&qr.labels(x_col)),
            distinct_in_order(&qr.labels(y_col)),
        ),
    };

    let cells = y_labels
        .iter()
        .map(|y| pivot_values(qr, &x_labels, x_col, y_col, y, value_col))
        .collect();

    ChartSpec::Heatmap {
        title: title.to_string(),
        x_labels,
        y_labels,
        cells,
    }
}

/// Scalar dial against `0..max` with green/amber/red bands at the supplied
/// thresholds (green below `warn`, red at `alert` and above).
pub fn gauge(title: &str, value: f64, max: f64, warn: f64, alert: f64) -> ChartSpec {
    ChartSpec::Gauge {
        title: title.to_string(),
        value,
        max,
        bands: vec![
            GaugeBand {
                from: 0.0,
                to: warn,
                color: CHART_COLORS[2].to_string(),
            },
            GaugeBand {
                from: warn,
                to: alert,
                color: CHART_COLORS[3].to_string(),
            },
            GaugeBand {
                from: alert,
                to: max,
                color: CHART_COLORS[4].to_string(),
            },
        ],
    }
}

// ─── Pivot helpers ───────────────────────────────────────────────────────

fn distinct_in_order(labels: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for label in labels {
        if !seen.contains(label) {
            seen.push(label.clone());
        }
    }
    seen
}

fn pivot_values(
    qr: &QueryResult,
    axis: &[String],
    axis_col: &str,
    filter_col: &str,
    filter_value: &str,
    value_col: &str,
) -> Vec<f64> {
    let axis_idx = qr.column_index(axis_col);
    let filter_idx = qr.column_index(filter_col);
    let value_idx = qr.column_index(value_col);
    let (axis_idx, filter_idx, value_idx) = match (axis_idx, filter_idx, value_idx) {
        (Some(a), Some(f), Some(v)) => (a, f, v),
        _ => return vec![0.0; axis.len()],
    };

    axis.iter()
        .map(|wanted| {
            qr.rows
                .iter()
                .find(|row| {
                    row[filter_idx].display() == filter_value && row[axis_idx].display() == *wanted
                })
                .and_then(|row| row[value_idx].as_f64())
                .unwrap_or(0.0)
        })
        .collect()
}
