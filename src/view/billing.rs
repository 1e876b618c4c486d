//! Billing and finance page.

use crate::cache::QueryKey;
use crate::chart;
use crate::db::queries::billing;
use crate::model::DateRange;
use crate::recommend::{advisories_for, Role};
use crate::state::AppState;

use super::{
    advisory_section, chart_section, euro, metrics_section, pct, table_section, Metric, PageView,
};

pub fn page(state: &AppState, range: &DateRange) -> PageView {
    let ttl = state.default_ttl();
    let now = state.now();

    let summary = state.cached_query(QueryKey::ranged("dispute_summary", range), ttl, |c| {
        billing::dispute_summary(c, range)
    });
    let by_type = state.cached_query(QueryKey::ranged("dispute_by_type", range), ttl, |c| {
        billing::dispute_by_type(c, range)
    });
    let trends = state.cached_query(QueryKey::ranged("dispute_trends", range), ttl, |c| {
        billing::dispute_trends(c, range)
    });
    let buckets = state.cached_query(QueryKey::ranged("dispute_resolution_buckets", range), ttl, |c| {
        billing::dispute_resolution_buckets(c, range)
    });
    let at_risk = state.cached_query(QueryKey::ranged("revenue_at_risk_by_tier", range), ttl, |c| {
        billing::revenue_at_risk_by_tier(c, range)
    });
    let high_value = state.cached_query(QueryKey::ranged("high_value_disputes", range), ttl, |c| {
        billing::high_value_disputes(c, range, now)
    });
    let frequent = state.cached_query(QueryKey::ranged("frequent_disputers", range), ttl, |c| {
        billing::frequent_disputers(c, range)
    });
    let aging = state.cached_query(QueryKey::new("ar_aging_summary", vec![]), ttl, |c| {
        billing::ar_aging_summary(c)
    });
    let shock = state.cached_query(QueryKey::ranged("bill_shock", range), ttl, |c| {
        billing::bill_shock(c, range)
    });
    let cycle = state.cached_query(QueryKey::ranged("billing_cycle_pattern", range), ttl, |c| {
        billing::billing_cycle_pattern(c, range)
    });
    let correlation = state.cached_query(QueryKey::ranged("payment_complaint_correlation", range), ttl, |c| {
        billing::payment_complaint_correlation(c, range)
    });

    let sections = vec![
        metrics_section("Dispute metrics", summary, |qr| {
            vec![
                Metric::new("Total disputes", qr.scalar_i64("total_disputes").to_string()),
                Metric::new("Open", qr.scalar_i64("open_count").to_string()),
                Metric::new("Total amount", euro(qr.scalar_f64("total_amount"))),
                Metric::new("Average amount", euro(qr.scalar_f64("avg_amount"))),
                Metric::new("Resolution rate", pct(qr.scalar_f64("resolution_rate"))),
            ]
        }),
        chart_section("Dispute types", by_type, |qr| {
            chart::bar(qr, "Disputed amount by category", "category", "total_amount", true)
        }),
        chart_section("Dispute trends", trends, |qr| {
            chart::line(qr, "Daily disputes", "day", &["count", "total_amount"], true)
        }),
        chart_section("Resolution time", buckets, |qr| {
            chart::bar(qr, "Days to resolution", "bucket", "count", false)
        }),
        chart_section("Revenue at risk", at_risk, |qr| {
            chart::bar(qr, "Open disputed amount by tier", "tier", "amount_at_risk", false)
        }),
        table_section("High value disputes", high_value),
        table_section("Frequent disputers", frequent),
        metrics_section("Receivables ageing", aging, |qr| {
            vec![
                Metric::new("Total balance", euro(qr.scalar_f64("total_balance"))),
                Metric::new("0-30 days", euro(qr.scalar_f64("aging_0_30"))),
                Metric::new("31-60 days", euro(qr.scalar_f64("aging_31_60"))),
                Metric::new("61-90 days", euro(qr.scalar_f64("aging_61_90"))),
                Metric::new("91+ days", euro(qr.scalar_f64("aging_91_plus"))),
            ]
        }),
        table_section("Bill shock", shock),
        chart_section("Billing cycle", cycle, |qr| {
            chart::bar(qr, "Disputes by day of month", "day_of_month", "count", false)
        }),
        chart_section("Payments vs billing complaints", correlation, |qr| {
            chart::line(qr, "Daily payments and billing complaints", "day", &["billing_complaints", "payments"], false)
        }),
        advisory_section("Insights", advisories_for(Role::BillingFinance)),
    ];

    PageView {
        title: "Billing & Finance".to_string(),
        range: *range,
        sections,
    }
}
