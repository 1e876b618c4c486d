//! Complaint-facet queries: volumes, distributions, ageing and SLA views.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use super::{ts_param, PRIORITY_CASE, SLA_HOURS_CASE};
use crate::db::result::{run_query, QueryResult};
use crate::error::AppResult;
use crate::model::DateRange;

/// One-row headline aggregate for the selected window. Always returns a
/// row; an empty window reports zero counts and a 0 resolution rate.
pub fn complaint_summary(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT COUNT(*) AS total_complaints,
                COUNT(DISTINCT customer_id) AS unique_customers,
                SUM(CASE WHEN status = 'Open' THEN 1 ELSE 0 END) AS open_count,
                SUM(CASE WHEN status = 'Escalated' THEN 1 ELSE 0 END) AS escalated_count,
                SUM(CASE WHEN status IN ('Resolved', 'Closed') THEN 1 ELSE 0 END) AS resolved_count,
                SUM(CASE WHEN priority = 'Critical' THEN 1 ELSE 0 END) AS critical_count,
                COALESCE(ROUND(100.0 * SUM(CASE WHEN status IN ('Resolved', 'Closed') THEN 1 ELSE 0 END)
                    / NULLIF(COUNT(*), 0), 1), 0) AS resolution_rate
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2",
        &[&start, &end],
    )
}

/// Complaint counts per channel, busiest first.
pub fn channel_distribution(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT channel, COUNT(*) AS count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY channel
         ORDER BY count DESC, channel",
        &[&start, &end],
    )
}

/// Daily totals with the resolved share, chronological.
pub fn daily_complaint_trend(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT date(complaint_ts) AS day,
                COUNT(*) AS total,
                SUM(CASE WHEN status IN ('Resolved', 'Closed') THEN 1 ELSE 0 END) AS resolved
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY day
         ORDER BY day",
        &[&start, &end],
    )
}

/// Plain daily counts, chronological. Feeds the anomaly z-score pass.
pub fn daily_counts(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT date(complaint_ts) AS day, COUNT(*) AS count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY day
         ORDER BY day",
        &[&start, &end],
    )
}

pub fn top_categories(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT category, COUNT(*) AS count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2 AND category IS NOT NULL
         GROUP BY category
         ORDER BY count DESC, category
         LIMIT 10",
        &[&start, &end],
    )
}

pub fn status_distribution(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT status, COUNT(*) AS count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY status
         ORDER BY count DESC, status",
        &[&start, &end],
    )
}

/// Counts per priority in the canonical Critical-first order.
pub fn priority_distribution(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let sql = format!(
        "SELECT priority, COUNT(*) AS count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2 AND priority IS NOT NULL
         GROUP BY priority
         ORDER BY {PRIORITY_CASE}"
    );
    run_query(conn, &sql, &[&start, &end])
}

/// Pareto view of complaint categories: count plus cumulative share of the
/// window total, largest category first.
pub fn complaint_root_causes(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "WITH cause AS (
             SELECT category, COUNT(*) AS count
             FROM complaints
             WHERE complaint_ts BETWEEN ?1 AND ?2 AND category IS NOT NULL
             GROUP BY category
         )
         SELECT category, count,
                COALESCE(ROUND(100.0 * SUM(count) OVER (ORDER BY count DESC, category)
                    / NULLIF((SELECT SUM(count) FROM cause), 0), 1), 0) AS cumulative_pct
         FROM cause
         ORDER BY count DESC, category",
        &[&start, &end],
    )
}

/// Sparse day-of-week by hour counts. The chart builder densifies this
/// against full 7x24 axes.
pub fn volume_heatmap(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT CASE strftime('%w', complaint_ts)
                    WHEN '0' THEN 'Sun' WHEN '1' THEN 'Mon' WHEN '2' THEN 'Tue'
                    WHEN '3' THEN 'Wed' WHEN '4' THEN 'Thu' WHEN '5' THEN 'Fri'
                    ELSE 'Sat' END AS day,
                CAST(strftime('%H', complaint_ts) AS INTEGER) AS hour,
                COUNT(*) AS count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY day, hour",
        &[&start, &end],
    )
}

/// Hourly volume with a naive agents-needed estimate (one agent per eight
/// contacts per hour, rounded up).
pub fn hourly_volume_staffing(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT CAST(strftime('%H', complaint_ts) AS INTEGER) AS hour,
                COUNT(*) AS count,
                CAST((COUNT(*) + 7) / 8 AS INTEGER) AS suggested_agents
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY hour
         ORDER BY hour",
        &[&start, &end],
    )
}

/// Long-form day x channel counts for the per-channel trend lines.
pub fn channel_trends_over_time(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT date(complaint_ts) AS day, channel, COUNT(*) AS count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY day, channel
         ORDER BY day, channel",
        &[&start, &end],
    )
}

/// Month x channel counts for the cohort heatmap.
pub fn channel_cohort_analysis(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT strftime('%Y-%m', complaint_ts) AS month, channel, COUNT(*) AS count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY month, channel
         ORDER BY month, channel",
        &[&start, &end],
    )
}

/// Per-channel volumes with resolution and escalation rates.
pub fn channel_performance(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT channel,
                COUNT(*) AS total,
                COALESCE(ROUND(100.0 * SUM(CASE WHEN status IN ('Resolved', 'Closed') THEN 1 ELSE 0 END)
                    / NULLIF(COUNT(*), 0), 1), 0) AS resolution_rate,
                COALESCE(ROUND(100.0 * SUM(CASE WHEN status = 'Escalated' THEN 1 ELSE 0 END)
                    / NULLIF(COUNT(*), 0), 1), 0) AS escalation_rate
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY channel
         ORDER BY total DESC, channel",
        &[&start, &end],
    )
}

/// One-row resolution and escalation rates for the window.
pub fn resolution_metrics(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT SUM(CASE WHEN status IN ('Resolved', 'Closed') THEN 1 ELSE 0 END) AS resolved_count,
                SUM(CASE WHEN status = 'Open' THEN 1 ELSE 0 END) AS open_count,
                COALESCE(ROUND(100.0 * SUM(CASE WHEN status IN ('Resolved', 'Closed') THEN 1 ELSE 0 END)
                    / NULLIF(COUNT(*), 0), 1), 0) AS resolution_rate,
                COALESCE(ROUND(100.0 * SUM(CASE WHEN status = 'Escalated' THEN 1 ELSE 0 END)
                    / NULLIF(COUNT(*), 0), 1), 0) AS escalation_rate
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2",
        &[&start, &end],
    )
}

/// Min/avg/max of the daily volume. Spread statistics over the same series
/// are computed in Rust from [`daily_counts`].
pub fn complaint_stats_summary(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "WITH daily AS (
             SELECT date(complaint_ts) AS day, COUNT(*) AS count
             FROM complaints
             WHERE complaint_ts BETWEEN ?1 AND ?2
             GROUP BY day
         )
         SELECT COUNT(*) AS days_with_data,
                COALESCE(MIN(count), 0) AS min_daily,
                COALESCE(ROUND(AVG(count), 1), 0) AS avg_daily,
                COALESCE(MAX(count), 0) AS max_daily
         FROM daily",
        &[&start, &end],
    )
}

pub fn escalation_summary(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT SUM(CASE WHEN status = 'Escalated' THEN 1 ELSE 0 END) AS escalated_count,
                COALESCE(ROUND(100.0 * SUM(CASE WHEN status = 'Escalated' THEN 1 ELSE 0 END)
                    / NULLIF(COUNT(*), 0), 1), 0) AS escalation_rate
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2",
        &[&start, &end],
    )
}

/// Open Critical and High cases, most urgent and oldest first.
pub fn high_priority_cases(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let sql = format!(
        "SELECT complaint_id, customer_id, channel, category, priority, status, complaint_ts
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
           AND status NOT IN ('Resolved', 'Closed')
           AND priority IN ('Critical', 'High')
         ORDER BY {PRIORITY_CASE}, complaint_ts"
    );
    run_query(conn, &sql, &[&start, &end])
}

/// Open-case counts bucketed by time since intake, youngest bucket first.
pub fn case_age_distribution(
    conn: &Connection,
    range: &DateRange,
    now: DateTime<Utc>,
) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let as_of = ts_param(now);
    run_query(
        conn,
        "WITH aged AS (
             SELECT (julianday(?3) - julianday(complaint_ts)) * 24.0 AS hours_open
             FROM complaints
             WHERE complaint_ts BETWEEN ?1 AND ?2
               AND status NOT IN ('Resolved', 'Closed')
         )
         SELECT CASE
                    WHEN hours_open < 4 THEN '< 4h'
                    WHEN hours_open < 24 THEN '4-24h'
                    WHEN hours_open < 72 THEN '1-3d'
                    WHEN hours_open < 168 THEN '3-7d'
                    ELSE '> 7d'
                END AS age_bucket,
                COUNT(*) AS count
         FROM aged
         GROUP BY age_bucket
         ORDER BY MIN(hours_open)",
        &[&start, &end, &as_of],
    )
}

/// Open cases that have burned at least three quarters of their SLA budget,
/// most exposed first.
pub fn cases_at_risk_escalation(
    conn: &Connection,
    range: &DateRange,
    now: DateTime<Utc>,
) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let as_of = ts_param(now);
    let sql = format!(
        "WITH open_cases AS (
             SELECT complaint_id, customer_id, channel, category, priority,
                    (julianday(?3) - julianday(complaint_ts)) * 24.0 AS hours_open,
                    {SLA_HOURS_CASE} AS sla_hours
             FROM complaints
             WHERE complaint_ts BETWEEN ?1 AND ?2
               AND status NOT IN ('Resolved', 'Closed', 'Escalated')
         )
         SELECT complaint_id, customer_id, channel, category, priority,
                ROUND(hours_open, 1) AS hours_open,
                ROUND(100.0 * hours_open / sla_hours, 1) AS sla_elapsed_pct
         FROM open_cases
         WHERE hours_open >= 0.75 * sla_hours
         ORDER BY sla_elapsed_pct DESC"
    );
    run_query(conn, &sql, &[&start, &end, &as_of])
}

/// Open cases past 85% of their SLA budget, with the remaining hours
/// (negative once breached). Most urgent first.
pub fn sla_breach_predictions(
    conn: &Connection,
    range: &DateRange,
    now: DateTime<Utc>,
) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let as_of = ts_param(now);
    let sql = format!(
        "WITH open_cases AS (
             SELECT complaint_id, customer_id, priority,
                    (julianday(?3) - julianday(complaint_ts)) * 24.0 AS hours_open,
                    {SLA_HOURS_CASE} AS sla_hours
             FROM complaints
             WHERE complaint_ts BETWEEN ?1 AND ?2
               AND status NOT IN ('Resolved', 'Closed')
         )
         SELECT complaint_id, customer_id, priority,
                ROUND(hours_open, 1) AS hours_open,
                ROUND(sla_hours - hours_open, 1) AS hours_remaining
         FROM open_cases
         WHERE hours_open >= 0.85 * sla_hours
         ORDER BY hours_remaining"
    );
    run_query(conn, &sql, &[&start, &end, &as_of])
}

/// Customers with three or more complaints in the window.
pub fn repeat_callers(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT customer_id,
                COUNT(*) AS complaint_count,
                SUM(CASE WHEN status NOT IN ('Resolved', 'Closed') THEN 1 ELSE 0 END) AS open_count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY customer_id
         HAVING COUNT(*) >= 3
         ORDER BY complaint_count DESC, customer_id
         LIMIT 20",
        &[&start, &end],
    )
}

/// Handling cost per channel from the fixed per-contact cost assumptions.
pub fn cost_per_contact(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT channel,
                COUNT(*) AS count,
                CASE channel
                    WHEN 'Voice' THEN 22 WHEN 'Email' THEN 12 WHEN 'Chat' THEN 8
                    WHEN 'Social' THEN 15 ELSE 3 END AS unit_cost,
                COUNT(*) * CASE channel
                    WHEN 'Voice' THEN 22 WHEN 'Email' THEN 12 WHEN 'Chat' THEN 8
                    WHEN 'Social' THEN 15 ELSE 3 END AS total_cost
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         GROUP BY channel
         ORDER BY total_cost DESC, channel",
        &[&start, &end],
    )
}

/// Row-level detail for the exportable analyst table, newest first.
pub fn detailed_complaints(
    conn: &Connection,
    range: &DateRange,
    limit: u32,
) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT complaint_id, customer_id, account_id, channel, category,
                priority, status, complaint_ts, network_incident_id
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
         ORDER BY complaint_ts DESC
         LIMIT ?3",
        &[&start, &end, &limit],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup::init_memory_db;
    use crate::model::Channel;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
    }

    fn seed(conn: &Connection) {
        conn.execute_batch(
            "INSERT INTO complaints
                 (complaint_id, customer_id, channel, category, priority, status, complaint_ts)
             VALUES
                 ('C-1', 'CU-1', 'Voice',  'Billing', 'Critical', 'Open',      '2025-01-06 09:15:00'),
                 ('C-2', 'CU-1', 'Chat',   'Network', 'High',     'Resolved',  '2025-01-07 10:00:00'),
                 ('C-3', 'CU-1', 'Email',  'Billing', 'Medium',   'Escalated', '2025-01-07 14:30:00'),
                 ('C-4', 'CU-2', 'Voice',  'Network', 'Low',      'Closed',    '2025-01-10 16:45:00'),
                 ('C-5', 'CU-3', 'Social', 'Service', 'High',     'Open',      '2025-02-02 11:00:00');",
        )
        .unwrap();
    }

    #[test]
    fn test_summary_respects_window() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        let qr = complaint_summary(&conn, &range()).unwrap();
        // C-5 falls outside January.
        assert_eq!(qr.scalar_i64("total_complaints"), 4);
        assert_eq!(qr.scalar_i64("resolved_count"), 2);
        assert_eq!(qr.scalar_f64("resolution_rate"), 50.0);
    }

    #[test]
    fn test_summary_on_empty_window_is_zeroes() {
        let conn = init_memory_db().unwrap();
        let qr = complaint_summary(&conn, &range()).unwrap();
        assert_eq!(qr.len(), 1);
        assert_eq!(qr.scalar_i64("total_complaints"), 0);
        assert_eq!(qr.scalar_f64("resolution_rate"), 0.0);
    }

    #[test]
    fn test_resolution_metrics_rates() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        let qr = resolution_metrics(&conn, &range()).unwrap();
        // Of the four January cases: C-2 and C-4 are terminal, C-1 is open,
        // C-3 escalated.
        assert_eq!(qr.scalar_i64("resolved_count"), 2);
        assert_eq!(qr.scalar_i64("open_count"), 1);
        assert_eq!(qr.scalar_f64("resolution_rate"), 50.0);
        assert_eq!(qr.scalar_f64("escalation_rate"), 25.0);
    }

    #[test]
    fn test_resolution_metrics_empty_window_is_zeroes() {
        let conn = init_memory_db().unwrap();
        let qr = resolution_metrics(&conn, &range()).unwrap();
        assert_eq!(qr.len(), 1);
        assert_eq!(qr.scalar_i64("resolved_count"), 0);
        assert_eq!(qr.scalar_f64("resolution_rate"), 0.0);
        assert_eq!(qr.scalar_f64("escalation_rate"), 0.0);
    }

    #[test]
    fn test_channel_distribution_sorted_by_count() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        let qr = channel_distribution(&conn, &range()).unwrap();
        assert_eq!(qr.labels("channel")[0], "Voice");
        let counts = qr.numbers("count");
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_priority_distribution_in_canonical_order() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        let qr = priority_distribution(&conn, &range()).unwrap();
        assert_eq!(qr.labels("priority"), vec!["Critical", "High", "Medium", "Low"]);
    }

    #[test]
    fn test_root_causes_cumulative_reaches_100() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        let qr = complaint_root_causes(&conn, &range()).unwrap();
        let cumulative = qr.numbers("cumulative_pct");
        assert_eq!(cumulative.last().copied(), Some(100.0));
        assert!(cumulative.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_heatmap_rows_carry_day_names_and_hours() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        let qr = volume_heatmap(&conn, &range()).unwrap();
        // 2025-01-06 was a Monday.
        assert!(qr.labels("day").iter().any(|d| d == "Mon"));
        assert!(qr.numbers("hour").iter().all(|h| (0.0..24.0).contains(h)));
    }

    #[test]
    fn test_age_distribution_uses_injected_now() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        let now: DateTime<Utc> = "2025-01-31T12:00:00Z".parse().unwrap();
        let qr = case_age_distribution(&conn, &range(), now).unwrap();
        // C-1 (Open) and C-3 (Escalated) are both well past a week old.
        assert_eq!(qr.labels("age_bucket"), vec!["> 7d"]);
        assert_eq!(qr.scalar_i64("count"), 2);

        // Two hours after C-1 came in, it is the only open case.
        let early: DateTime<Utc> = "2025-01-06T11:15:00Z".parse().unwrap();
        let early_range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        );
        let qr = case_age_distribution(&conn, &early_range, early).unwrap();
        assert_eq!(qr.labels("age_bucket"), vec!["< 4h"]);
        assert_eq!(qr.scalar_i64("count"), 1);
    }

    #[test]
    fn test_sla_breach_flags_overdue_critical_case() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        // C-1 is Critical (4h SLA) and 6 hours old: breached.
        let now: DateTime<Utc> = "2025-01-06T15:15:00Z".parse().unwrap();
        let qr = sla_breach_predictions(&conn, &range(), now).unwrap();
        assert_eq!(qr.labels("complaint_id"), vec!["C-1"]);
        assert!(qr.scalar_f64("hours_remaining") < 0.0);
    }

    #[test]
    fn test_repeat_callers_threshold() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        let qr = repeat_callers(&conn, &range()).unwrap();
        assert_eq!(qr.labels("customer_id"), vec!["CU-1"]);
        assert_eq!(qr.scalar_i64("complaint_count"), 3);
    }

    #[test]
    fn test_cost_per_contact_multiplies_unit_cost() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        let qr = cost_per_contact(&conn, &range()).unwrap();
        let idx = qr.column_index("channel").unwrap();
        for (i, row) in qr.rows.iter().enumerate() {
            if row[idx].display() == "Voice" {
                assert_eq!(qr.cell(i, "total_cost").as_i64(), Some(44));
            }
        }
    }

    #[test]
    fn test_unit_costs_match_channel_assumptions() {
        let conn = init_memory_db().unwrap();
        for (i, channel) in Channel::ALL.iter().enumerate() {
            conn.execute(
                "INSERT INTO complaints
                     (complaint_id, customer_id, channel, category, priority, status, complaint_ts)
                 VALUES (?1, 'CU-1', ?2, 'Billing', 'Low', 'Open', '2025-01-10 10:00:00')",
                rusqlite::params![format!("C-{i}"), channel.as_str()],
            )
            .unwrap();
        }

        let qr = cost_per_contact(&conn, &range()).unwrap();
        assert_eq!(qr.len(), Channel::ALL.len());
        let idx = qr.column_index("channel").unwrap();
        for (i, row) in qr.rows.iter().enumerate() {
            let channel = Channel::ALL
                .iter()
                .find(|c| c.as_str() == row[idx].display())
                .unwrap();
            assert_eq!(qr.cell(i, "unit_cost").as_i64(), Some(channel.cost_per_contact()));
        }
    }

    #[test]
    fn test_detailed_complaints_honors_limit() {
        let conn = init_memory_db().unwrap();
        seed(&conn);
        let qr = detailed_complaints(&conn, &range(), 2).unwrap();
        assert_eq!(qr.len(), 2);
        // Newest first.
        assert_eq!(qr.labels("complaint_id"), vec!["C-4", "C-3"]);
    }
}
