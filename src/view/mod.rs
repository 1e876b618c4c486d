//! Page composition.
//!
//! One module per role page. Every page function has the same shape:
//! fetch each dataset through the cache, turn it into a section, and
//! collect the sections into a `PageView`. A dataset that fails to load
//! degrades its own section to `Empty` with a message; the rest of the
//! page still renders. An empty-but-successful dataset is a different
//! state: charts become `NoData`, tables say "no data in range".

pub mod analyst;
pub mod billing;
pub mod executive;
pub mod network;
pub mod revenue;
pub mod service;
pub mod vip;

use std::sync::Arc;

use serde::Serialize;

use crate::chart::ChartSpec;
use crate::db::result::QueryResult;
use crate::error::{AppError, AppResult};
use crate::model::DateRange;
use crate::recommend::Advisory;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub title: String,
    pub range: DateRange,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SectionBody {
    Metrics { metrics: Vec<Metric> },
    Chart { spec: ChartSpec },
    Table { table: Arc<QueryResult> },
    Advisories { advisories: Vec<Advisory> },
    Empty { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Metric {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

fn section(title: &str, body: SectionBody) -> Section {
    Section {
        title: title.to_string(),
        body,
    }
}

fn failed_section(title: &str, err: &AppError) -> Section {
    log::error!("section '{title}' failed to load: {err}");
    section(
        title,
        SectionBody::Empty {
            message: format!("data unavailable: {err}"),
        },
    )
}

/// Chart section: the builder runs only on a loaded dataset; the chart
/// builder itself handles the empty case with `NoData`.
pub(crate) fn chart_section<F>(
    title: &str,
    fetched: AppResult<Arc<QueryResult>>,
    build: F,
) -> Section
where
    F: FnOnce(&QueryResult) -> ChartSpec,
{
    match fetched {
        Ok(qr) => section(title, SectionBody::Chart { spec: build(&qr) }),
        Err(err) => failed_section(title, &err),
    }
}

pub(crate) fn table_section(title: &str, fetched: AppResult<Arc<QueryResult>>) -> Section {
    match fetched {
        Ok(qr) if qr.is_empty() => section(
            title,
            SectionBody::Empty {
                message: "no data in range".to_string(),
            },
        ),
        Ok(qr) => section(title, SectionBody::Table { table: qr }),
        Err(err) => failed_section(title, &err),
    }
}

pub(crate) fn metrics_section<F>(
    title: &str,
    fetched: AppResult<Arc<QueryResult>>,
    build: F,
) -> Section
where
    F: FnOnce(&QueryResult) -> Vec<Metric>,
{
    match fetched {
        Ok(qr) => section(
            title,
            SectionBody::Metrics {
                metrics: build(&qr),
            },
        ),
        Err(err) => failed_section(title, &err),
    }
}

pub(crate) fn advisory_section(title: &str, advisories: Vec<Advisory>) -> Section {
    section(title, SectionBody::Advisories { advisories })
}

/// Day and hour axes for the weekly volume heatmaps.
pub(crate) fn week_axes() -> (Vec<String>, Vec<String>) {
    let hours = (0..24).map(|h| h.to_string()).collect();
    let days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        .iter()
        .map(|d| d.to_string())
        .collect();
    (hours, days)
}

pub(crate) fn euro(value: f64) -> String {
    format!("€{value:.2}")
}

pub(crate) fn pct(value: f64) -> String {
    format!("{value:.1}%")
}
