//! Revenue optimization page.

use crate::cache::QueryKey;
use crate::db::queries::customers;
use crate::error::AppResult;
use crate::export::{export_file_name, table_to_csv};
use crate::model::DateRange;
use crate::recommend::{advisories_for, Role};
use crate::state::AppState;

use super::{advisory_section, metrics_section, table_section, Metric, PageView};

pub fn page(state: &AppState, range: &DateRange) -> PageView {
    let ttl = state.default_ttl();
    let seed = state.config.scoring_seed;

    let metrics = state.cached_query(QueryKey::ranged("revenue_expansion_metrics", range), ttl, |c| {
        customers::revenue_expansion_metrics(c, range)
    });
    let upsell = state.cached_query(QueryKey::ranged("upsell_opportunities", range), ttl, |c| {
        customers::upsell_opportunities(c, range, seed)
    });

    let sections = vec![
        metrics_section("Expansion metrics", metrics, |qr| {
            vec![
                Metric::new("Candidate accounts", qr.scalar_i64("candidate_accounts").to_string()),
                Metric::new("Gold", qr.scalar_i64("gold_candidates").to_string()),
                Metric::new("Silver", qr.scalar_i64("silver_candidates").to_string()),
                Metric::new("Bronze", qr.scalar_i64("bronze_candidates").to_string()),
            ]
        }),
        table_section("Upsell opportunities", upsell),
        advisory_section("Insights", advisories_for(Role::RevenueOptimization)),
    ];

    PageView {
        title: "Revenue Optimization".to_string(),
        range: *range,
        sections,
    }
}

/// Download payload for the upsell table: `(file name, CSV body)`.
pub fn export_upsell(state: &AppState, range: &DateRange) -> AppResult<(String, String)> {
    let seed = state.config.scoring_seed;
    let upsell = state.cached_query(
        QueryKey::ranged("upsell_opportunities", range),
        state.default_ttl(),
        |c| customers::upsell_opportunities(c, range, seed),
    )?;
    Ok((export_file_name("upsell", range), table_to_csv(&upsell)?))
}
