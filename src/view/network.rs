//! Network operations page.

use crate::cache::QueryKey;
use crate::chart;
use crate::db::queries::network;
use crate::model::DateRange;
use crate::recommend::{advisories_for, Role};
use crate::state::AppState;

use super::{advisory_section, chart_section, metrics_section, pct, table_section, Metric, PageView};

pub fn page(state: &AppState, range: &DateRange) -> PageView {
    let ttl = state.default_ttl();
    let now = state.now();

    let stats = state.cached_query(QueryKey::ranged("incident_stats", range), ttl, |c| {
        network::incident_stats(c, range)
    });
    let correlation = state.cached_query(QueryKey::ranged("incident_correlation", range), ttl, |c| {
        network::incident_correlation(c, range)
    });
    let ranking = state.cached_query(QueryKey::ranged("incident_impact_ranking", range), ttl, |c| {
        network::incident_impact_ranking(c, range, now)
    });
    let quality = state.cached_query(QueryKey::ranged("service_quality_trend", range), ttl, |c| {
        network::service_quality_trend(c, range)
    });
    let categories = state.cached_query(QueryKey::ranged("network_category_breakdown", range), ttl, |c| {
        network::category_breakdown(c, range)
    });
    let geography = state.cached_query(QueryKey::ranged("geographic_impact", range), ttl, |c| {
        network::geographic_impact(c, range)
    });

    let sections = vec![
        metrics_section("Incident statistics", stats, |qr| {
            vec![
                Metric::new("Active incidents", qr.scalar_i64("incident_count").to_string()),
                Metric::new("Linked complaints", qr.scalar_i64("linked_complaints").to_string()),
                Metric::new("Affected customers", qr.scalar_i64("affected_customers").to_string()),
                Metric::new("Share of volume", pct(qr.scalar_f64("linked_pct"))),
            ]
        }),
        chart_section("Incident correlation", correlation, |qr| {
            chart::bar(qr, "Complaints per incident", "incident_id", "complaint_count", true)
        }),
        table_section("Impact ranking", ranking),
        chart_section("Service quality trend", quality, |qr| {
            chart::line(qr, "Network complaints per day", "day", &["incident_linked", "total"], true)
        }),
        chart_section("Category breakdown", categories, |qr| {
            chart::pie(qr, "Incident-linked complaint categories", "category", "count", true)
        }),
        table_section("Geographic impact", geography),
        advisory_section("Insights", advisories_for(Role::NetworkOps)),
    ];

    PageView {
        title: "Network Operations".to_string(),
        range: *range,
        sections,
    }
}
