//! VIP (Gold tier) customer health page.

use crate::cache::QueryKey;
use crate::db::queries::customers;
use crate::model::DateRange;
use crate::state::AppState;
use crate::stats;

use super::{euro, metrics_section, table_section, Metric, PageView};

pub fn page(state: &AppState, range: &DateRange) -> PageView {
    let ttl = state.default_ttl();
    let now = state.now();
    let seed = state.config.scoring_seed;

    // Fetched twice (summary metrics and the table); second read hits the
    // cache.
    let health = state.cached_query(QueryKey::ranged("vip_customer_health", range), ttl, |c| {
        customers::vip_customer_health(c, range, now, seed)
    });
    let health_table = state.cached_query(QueryKey::ranged("vip_customer_health", range), ttl, |c| {
        customers::vip_customer_health(c, range, now, seed)
    });

    let sections = vec![
        metrics_section("VIP summary", health, |qr| {
            let risks = qr.numbers("churn_risk");
            let at_risk = risks.iter().filter(|r| **r >= 80.0).count();
            let open_disputes: f64 = qr.numbers("open_dispute_amount").iter().sum();
            vec![
                Metric::new("Gold accounts with complaints", qr.len().to_string()),
                Metric::new("Average churn risk", format!("{:.0}", stats::mean(&risks))),
                Metric::new("High risk (80+)", at_risk.to_string()),
                Metric::new("Open disputed amount", euro(open_disputes)),
            ]
        }),
        table_section("Account health", health_table),
    ];

    PageView {
        title: "VIP Customers".to_string(),
        range: *range,
        sections,
    }
}
