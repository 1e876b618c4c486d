//! Executive overview page.

use crate::cache::QueryKey;
use crate::chart;
use crate::db::queries::{billing, complaints, customers};
use crate::db::result::QueryResult;
use crate::model::DateRange;
use crate::recommend::{advisories_for, Role};
use crate::state::AppState;

use super::{
    advisory_section, chart_section, euro, metrics_section, pct, table_section, Metric, PageView,
};

pub fn page(state: &AppState, range: &DateRange) -> PageView {
    let ttl = state.default_ttl();
    let now = state.now();
    let seed = state.config.scoring_seed;

    let summary = state.cached_query(QueryKey::ranged("complaint_summary", range), ttl, |c| {
        complaints::complaint_summary(c, range)
    });
    let financial = state.cached_query(QueryKey::ranged("financial_impact", range), ttl, |c| {
        billing::financial_impact(c, range)
    });
    // Fetched twice (CSAT and NPS gauges); the second read is a cache hit.
    let surveys = state.cached_query(QueryKey::ranged("survey_metrics", range), ttl, |c| {
        customers::survey_metrics(c, range)
    });
    let surveys_nps = state.cached_query(QueryKey::ranged("survey_metrics", range), ttl, |c| {
        customers::survey_metrics(c, range)
    });
    let breaches = state.cached_query(QueryKey::ranged("sla_breach_predictions", range), ttl, |c| {
        complaints::sla_breach_predictions(c, range, now)
    });
    let trend = state.cached_query(QueryKey::ranged("daily_complaint_trend", range), ttl, |c| {
        complaints::daily_complaint_trend(c, range)
    });
    let channels = state.cached_query(QueryKey::ranged("channel_distribution", range), ttl, |c| {
        complaints::channel_distribution(c, range)
    });
    let statuses = state.cached_query(QueryKey::ranged("status_distribution", range), ttl, |c| {
        complaints::status_distribution(c, range)
    });
    let categories = state.cached_query(QueryKey::ranged("top_categories", range), ttl, |c| {
        complaints::top_categories(c, range)
    });
    let channel_perf = state.cached_query(QueryKey::ranged("channel_performance", range), ttl, |c| {
        complaints::channel_performance(c, range)
    });
    let tiers = state.cached_query(QueryKey::ranged("impact_by_tier", range), ttl, |c| {
        customers::impact_by_tier(c, range)
    });
    let regions = state.cached_query(QueryKey::ranged("regional_distribution", range), ttl, |c| {
        customers::regional_distribution(c, range)
    });
    let root_causes = state.cached_query(QueryKey::ranged("complaint_root_causes", range), ttl, |c| {
        complaints::complaint_root_causes(c, range)
    });
    let risk = state.cached_query(QueryKey::ranged("top_risk_customers", range), ttl, |c| {
        customers::top_risk_customers(c, range, seed)
    });

    let open_count = summary
        .as_ref()
        .map(|qr| qr.scalar_i64("open_count"))
        .unwrap_or(0);

    let sections = vec![
        metrics_section("Key metrics", summary, |qr| {
            vec![
                Metric::new("Total complaints", qr.scalar_i64("total_complaints").to_string()),
                Metric::new("Unique customers", qr.scalar_i64("unique_customers").to_string()),
                Metric::new("Open", qr.scalar_i64("open_count").to_string()),
                Metric::new("Critical", qr.scalar_i64("critical_count").to_string()),
                Metric::new("Resolution rate", pct(qr.scalar_f64("resolution_rate"))),
            ]
        }),
        metrics_section("Financial impact", financial, |qr| {
            vec![
                Metric::new("Total disputed", euro(qr.scalar_f64("total_disputed"))),
                Metric::new("Resolved", euro(qr.scalar_f64("resolved_amount"))),
                Metric::new("Still at risk", euro(qr.scalar_f64("open_amount"))),
                Metric::new("Network-linked", euro(qr.scalar_f64("network_linked_amount"))),
            ]
        }),
        chart_section("CSAT", surveys, |qr| {
            chart::gauge("CSAT", survey_avg(qr, "CSAT"), 5.0, 3.0, 4.0)
        }),
        chart_section("NPS", surveys_nps, |qr| {
            chart::gauge("NPS", net_promoter_score(qr), 100.0, 0.0, 50.0)
        }),
        chart_section("SLA compliance", breaches, |qr| {
            let breached = qr.len() as f64;
            let open = open_count.max(0) as f64;
            let compliance = if open > 0.0 {
                (100.0 * (1.0 - breached / open)).max(0.0)
            } else {
                100.0
            };
            chart::gauge("SLA compliance", compliance, 100.0, 80.0, 90.0)
        }),
        chart_section("Daily trend", trend, |qr| {
            chart::line(qr, "Daily complaints", "day", &["total", "resolved"], true)
        }),
        chart_section("Channel mix", channels, |qr| {
            chart::pie(qr, "Complaints by channel", "channel", "count", true)
        }),
        chart_section("Status", statuses, |qr| {
            chart::pie(qr, "Complaints by status", "status", "count", false)
        }),
        chart_section("Top categories", categories, |qr| {
            chart::bar(qr, "Top complaint categories", "category", "count", true)
        }),
        chart_section("Resolution by channel", channel_perf, |qr| {
            chart::bar(qr, "Resolution rate by channel", "channel", "resolution_rate", false)
        }),
        chart_section("Impact by tier", tiers, |qr| {
            chart::bar(qr, "Complaints by customer tier", "tier", "complaint_count", false)
        }),
        chart_section("Regional distribution", regions, |qr| {
            chart::bar(qr, "Complaints by region", "region", "complaint_count", false)
        }),
        chart_section("Root causes", root_causes, |qr| {
            chart::bar(qr, "Root cause Pareto", "category", "count", false)
        }),
        table_section("Top risk customers", risk),
        advisory_section("Insights", advisories_for(Role::Executive)),
    ];

    PageView {
        title: "Executive Overview".to_string(),
        range: *range,
        sections,
    }
}

fn survey_avg(qr: &QueryResult, survey_type: &str) -> f64 {
    match qr.column_index("survey_type") {
        Some(idx) => qr
            .rows
            .iter()
            .position(|r| r[idx].display() == survey_type)
            .map(|row| qr.cell(row, "avg_score").as_f64().unwrap_or(0.0))
            .unwrap_or(0.0),
        None => 0.0,
    }
}

/// Net promoter score from the NPS survey row: % promoters - % detractors.
fn net_promoter_score(qr: &QueryResult) -> f64 {
    let idx = match qr.column_index("survey_type") {
        Some(idx) => idx,
        None => return 0.0,
    };
    let row = match qr.rows.iter().position(|r| r[idx].display() == "NPS") {
        Some(row) => row,
        None => return 0.0,
    };
    let responses = qr.cell(row, "responses").as_f64().unwrap_or(0.0);
    if responses == 0.0 {
        return 0.0;
    }
    let promoters = qr.cell(row, "promoters").as_f64().unwrap_or(0.0);
    let detractors = qr.cell(row, "detractors").as_f64().unwrap_or(0.0);
    (100.0 * (promoters - detractors) / responses).round()
}
