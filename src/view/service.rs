//! Customer service manager page, plus the two-step customer 360 lookup.

use std::sync::Arc;

use crate::cache::QueryKey;
use crate::chart;
use crate::db::queries::{agents, complaints, customers};
use crate::db::result::QueryResult;
use crate::error::{AppError, AppResult};
use crate::model::DateRange;
use crate::recommend::{advisories_for, Role};
use crate::state::AppState;

use super::{
    advisory_section, chart_section, metrics_section, pct, table_section, week_axes, Metric,
    PageView, Section, SectionBody,
};

pub fn page(state: &AppState, range: &DateRange) -> PageView {
    let ttl = state.default_ttl();
    let now = state.now();
    let seed = state.config.scoring_seed;

    let summary = state.cached_query(QueryKey::ranged("complaint_summary", range), ttl, |c| {
        complaints::complaint_summary(c, range)
    });
    let resolution = state.cached_query(QueryKey::ranged("resolution_metrics", range), ttl, |c| {
        complaints::resolution_metrics(c, range)
    });
    let escalation = state.cached_query(QueryKey::ranged("escalation_summary", range), ttl, |c| {
        complaints::escalation_summary(c, range)
    });
    let priorities = state.cached_query(QueryKey::ranged("priority_distribution", range), ttl, |c| {
        complaints::priority_distribution(c, range)
    });
    let statuses = state.cached_query(QueryKey::ranged("status_distribution", range), ttl, |c| {
        complaints::status_distribution(c, range)
    });
    let heat = state.cached_query(QueryKey::ranged("volume_heatmap", range), ttl, |c| {
        complaints::volume_heatmap(c, range)
    });
    let staffing = state.cached_query(QueryKey::ranged("hourly_volume_staffing", range), ttl, |c| {
        complaints::hourly_volume_staffing(c, range)
    });
    let channel_trends = state.cached_query(QueryKey::ranged("channel_trends_over_time", range), ttl, |c| {
        complaints::channel_trends_over_time(c, range)
    });
    let leaderboard = state.cached_query(QueryKey::ranged("agent_performance", range), ttl, |c| {
        agents::agent_performance(c, range, seed)
    });
    let sentiment = state.cached_query(QueryKey::ranged("voice_sentiment_by_agent", range), ttl, |c| {
        agents::voice_sentiment_by_agent(c, range)
    });
    let sentiment_trend = state.cached_query(QueryKey::ranged("voice_sentiment_trends", range), ttl, |c| {
        agents::voice_sentiment_trends(c, range)
    });
    let sla_breaches = state.cached_query(QueryKey::ranged("sla_breach_predictions", range), ttl, |c| {
        complaints::sla_breach_predictions(c, range, now)
    });
    let at_risk = state.cached_query(QueryKey::ranged("cases_at_risk_escalation", range), ttl, |c| {
        complaints::cases_at_risk_escalation(c, range, now)
    });
    let repeats = state.cached_query(QueryKey::ranged("repeat_callers", range), ttl, |c| {
        complaints::repeat_callers(c, range)
    });
    let costs = state.cached_query(QueryKey::ranged("cost_per_contact", range), ttl, |c| {
        complaints::cost_per_contact(c, range)
    });
    let ages = state.cached_query(QueryKey::ranged("case_age_distribution", range), ttl, |c| {
        complaints::case_age_distribution(c, range, now)
    });
    let high_priority = state.cached_query(QueryKey::ranged("high_priority_cases", range), ttl, |c| {
        complaints::high_priority_cases(c, range)
    });

    let sections = vec![
        metrics_section("Summary", summary, |qr| {
            vec![
                Metric::new("Total complaints", qr.scalar_i64("total_complaints").to_string()),
                Metric::new("Open", qr.scalar_i64("open_count").to_string()),
                Metric::new("Escalated", qr.scalar_i64("escalated_count").to_string()),
                Metric::new("Resolution rate", pct(qr.scalar_f64("resolution_rate"))),
            ]
        }),
        metrics_section("Resolution", resolution, |qr| {
            vec![
                Metric::new("Resolved", qr.scalar_i64("resolved_count").to_string()),
                Metric::new("Still open", qr.scalar_i64("open_count").to_string()),
                Metric::new("Resolution rate", pct(qr.scalar_f64("resolution_rate"))),
                Metric::new("Escalation rate", pct(qr.scalar_f64("escalation_rate"))),
            ]
        }),
        chart_section("Escalation rate", escalation, |qr| {
            chart::gauge("Escalation rate", qr.scalar_f64("escalation_rate"), 100.0, 10.0, 20.0)
        }),
        chart_section("Priorities", priorities, |qr| {
            chart::bar(qr, "Complaints by priority", "priority", "count", false)
        }),
        chart_section("Statuses", statuses, |qr| {
            chart::pie(qr, "Complaints by status", "status", "count", false)
        }),
        chart_section("Weekly volume", heat, |qr| {
            let (hours, days) = week_axes();
            chart::heatmap(qr, "Volume by day and hour", "hour", "day", "count", Some((&hours, &days)))
        }),
        chart_section("Staffing", staffing, |qr| {
            chart::line(qr, "Hourly volume and suggested agents", "hour", &["count", "suggested_agents"], true)
        }),
        chart_section("Channel trends", channel_trends, |qr| {
            chart::multi_line(qr, "Daily volume by channel", "day", "channel", "count", false)
        }),
        table_section("Agent leaderboard", leaderboard),
        chart_section("Sentiment by agent", sentiment, |qr| {
            chart::bar(qr, "Average voice satisfaction by agent", "agent_id", "avg_satisfaction", true)
        }),
        chart_section("Sentiment trend", sentiment_trend, |qr| {
            chart::line(qr, "Daily voice satisfaction", "day", &["avg_satisfaction"], true)
        }),
        table_section("SLA breach predictions", sla_breaches),
        table_section("Escalation risk", at_risk),
        table_section("Repeat callers", repeats),
        chart_section("Cost per contact", costs, |qr| {
            chart::bar(qr, "Handling cost by channel", "channel", "total_cost", false)
        }),
        chart_section("Case age", ages, |qr| {
            chart::bar(qr, "Open cases by age", "age_bucket", "count", false)
        }),
        table_section("High priority open cases", high_priority),
        advisory_section("Insights", advisories_for(Role::CustomerService)),
    ];

    PageView {
        title: "Customer Service".to_string(),
        range: *range,
        sections,
    }
}

/// Step one of the 360 lookup: the searchable candidate list. Short TTL,
/// since it reflects current state rather than a window.
pub fn lookup_candidates(state: &AppState) -> AppResult<Arc<QueryResult>> {
    state.cached_query(
        QueryKey::new("customers_with_complete_data", vec![]),
        state.lookup_ttl(),
        customers::customers_with_complete_data,
    )
}

/// Step two: the per-customer drill-down. Facets are cached individually
/// under the lookup TTL; an unknown id is a lookup failure, not an empty
/// page.
pub fn customer_view(state: &AppState, customer_id: &str) -> AppResult<PageView> {
    let ttl = state.lookup_ttl();
    let id = customer_id.to_string();

    let profile = state.cached_query(
        QueryKey::new("customer_360_profile", vec![id.clone()]),
        ttl,
        |c| customers::customer_profile(c, customer_id),
    )?;
    if profile.is_empty() {
        return Err(AppError::LookupNotFound(customer_id.to_string()));
    }

    let complaints = state.cached_query(
        QueryKey::new("customer_360_complaints", vec![id.clone()]),
        ttl,
        |c| customers::customer_complaint_history(c, customer_id),
    );
    let calls = state.cached_query(
        QueryKey::new("customer_360_calls", vec![id.clone()]),
        ttl,
        |c| customers::customer_call_history(c, customer_id),
    );
    let disputes = state.cached_query(
        QueryKey::new("customer_360_disputes", vec![id]),
        ttl,
        |c| customers::customer_dispute_history(c, customer_id),
    );

    let profile_section = Section {
        title: "Profile".to_string(),
        body: SectionBody::Metrics {
            metrics: vec![
                Metric::new("Customer", profile.cell(0, "customer_id").display()),
                Metric::new("Account", profile.cell(0, "account_name").display()),
                Metric::new("Tier", profile.cell(0, "tier").display()),
                Metric::new("Region", profile.cell(0, "region").display()),
                Metric::new("Customer since", profile.cell(0, "customer_since").display()),
                Metric::new("Complaints", profile.cell(0, "complaint_count").display()),
            ],
        },
    };

    // The 360 view is not windowed; it carries a degenerate single-day
    // range so the page shape stays uniform.
    let today = state.now().date_naive();
    Ok(PageView {
        title: format!("Customer 360: {customer_id}"),
        range: DateRange::new(today, today),
        sections: vec![
            profile_section,
            table_section("Complaint history", complaints),
            table_section("Call history", calls),
            table_section("Dispute history", disputes),
        ],
    })
}
