//! Data analyst page: distribution statistics, anomaly detection and the
//! exportable row-level detail.

use std::sync::Arc;

use crate::cache::QueryKey;
use crate::chart;
use crate::db::queries::complaints;
use crate::db::result::{QueryResult, Scalar};
use crate::error::AppResult;
use crate::export::{export_file_name, table_to_csv};
use crate::model::DateRange;
use crate::recommend::{advisories_for, Role};
use crate::state::AppState;
use crate::stats;

use super::{
    advisory_section, chart_section, metrics_section, table_section, week_axes, Metric, PageView,
};

/// Daily counts with |z| at or above this are flagged as anomalies.
const ANOMALY_Z_THRESHOLD: f64 = 2.0;

pub fn page(state: &AppState, range: &DateRange) -> PageView {
    let ttl = state.default_ttl();
    let limit = state.config.detail_row_limit;

    let summary = state.cached_query(QueryKey::ranged("complaint_stats_summary", range), ttl, |c| {
        complaints::complaint_stats_summary(c, range)
    });
    let daily = state.cached_query(QueryKey::ranged("daily_counts", range), ttl, |c| {
        complaints::daily_counts(c, range)
    });
    let cohort = state.cached_query(QueryKey::ranged("channel_cohort_analysis", range), ttl, |c| {
        complaints::channel_cohort_analysis(c, range)
    });
    let weekly = state.cached_query(QueryKey::ranged("volume_heatmap", range), ttl, |c| {
        complaints::volume_heatmap(c, range)
    });
    let detail = state.cached_query(QueryKey::ranged("detailed_complaints", range), ttl, |c| {
        complaints::detailed_complaints(c, range, limit)
    });

    let spread = daily.as_ref().ok().map(|qr| daily_spread_metrics(qr));
    let anomalies = daily.as_ref().ok().map(|qr| anomaly_table(qr));

    let mut sections = vec![metrics_section("Daily volume statistics", summary, |qr| {
        let mut metrics = vec![
            Metric::new("Days with data", qr.scalar_i64("days_with_data").to_string()),
            Metric::new("Min daily", qr.scalar_i64("min_daily").to_string()),
            Metric::new("Average daily", format!("{:.1}", qr.scalar_f64("avg_daily"))),
            Metric::new("Max daily", qr.scalar_i64("max_daily").to_string()),
        ];
        if let Some(extra) = spread {
            metrics.extend(extra);
        }
        metrics
    })];

    sections.push(chart_section("Anomaly detection", daily, |qr| {
        chart::line(&with_z_scores(qr), "Daily volume z-scores", "day", &["count", "z_score"], true)
    }));
    if let Some(anomalies) = anomalies {
        sections.push(table_section("Flagged anomalies", Ok(Arc::new(anomalies))));
    }
    sections.push(chart_section("Channel cohorts", cohort, |qr| {
        chart::heatmap(qr, "Monthly volume by channel", "month", "channel", "count", None)
    }));
    sections.push(chart_section("Weekly pattern", weekly, |qr| {
        let (hours, days) = week_axes();
        chart::heatmap(qr, "Volume by day and hour", "hour", "day", "count", Some((&hours, &days)))
    }));
    sections.push(table_section("Complaint detail", detail));
    sections.push(advisory_section("Insights", advisories_for(Role::DataAnalyst)));

    PageView {
        title: "Data Analyst".to_string(),
        range: *range,
        sections,
    }
}

/// Download payload for the detail table: `(file name, CSV body)`.
pub fn export_detail(state: &AppState, range: &DateRange) -> AppResult<(String, String)> {
    let limit = state.config.detail_row_limit;
    let detail = state.cached_query(
        QueryKey::ranged("detailed_complaints", range),
        state.default_ttl(),
        |c| complaints::detailed_complaints(c, range, limit),
    )?;
    Ok((export_file_name("complaints", range), table_to_csv(&detail)?))
}

/// Spread statistics SQLite cannot compute, from the daily count series.
fn daily_spread_metrics(daily: &QueryResult) -> Vec<Metric> {
    let counts = daily.numbers("count");
    vec![
        Metric::new("Std deviation", format!("{:.2}", stats::std_dev(&counts))),
        Metric::new("Median", format!("{:.1}", stats::median(&counts))),
        Metric::new("95th percentile", format!("{:.1}", stats::percentile(&counts, 95.0))),
    ]
}

/// Daily counts extended with a z-score column.
fn with_z_scores(daily: &QueryResult) -> QueryResult {
    let scores = stats::z_scores(&daily.numbers("count"));
    let mut out = daily.clone();
    out.columns.push("z_score".to_string());
    for (row, z) in out.rows.iter_mut().zip(scores) {
        row.push(Scalar::Real((z * 100.0).round() / 100.0));
    }
    out
}

/// Days whose volume deviates beyond the threshold.
fn anomaly_table(daily: &QueryResult) -> QueryResult {
    let scored = with_z_scores(daily);
    let z_idx = match scored.column_index("z_score") {
        Some(idx) => idx,
        None => return QueryResult::empty(&["day", "count", "z_score"]),
    };
    QueryResult {
        columns: scored.columns.clone(),
        rows: scored
            .rows
            .into_iter()
            .filter(|row| {
                row[z_idx]
                    .as_f64()
                    .map(|z| z.abs() >= ANOMALY_Z_THRESHOLD)
                    .unwrap_or(false)
            })
            .collect(),
    }
}
