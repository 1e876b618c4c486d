//! Customer-facet queries: segmentation, surveys, risk rankings and the
//! per-customer 360 lookup.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use super::{ts_param, TIER_CASE};
use crate::db::result::{run_query, QueryResult, Scalar};
use crate::error::AppResult;
use crate::model::{DateRange, Tier};
use crate::scoring;

/// Complaint volume and open share per tier, highest tier first.
pub fn impact_by_tier(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let sql = format!(
        "SELECT a.tier AS tier,
                COUNT(*) AS complaint_count,
                COUNT(DISTINCT c.customer_id) AS customers,
                SUM(CASE WHEN c.status NOT IN ('Resolved', 'Closed') THEN 1 ELSE 0 END) AS open_count
         FROM complaints c
         JOIN accounts a ON a.account_id = c.account_id
         WHERE c.complaint_ts BETWEEN ?1 AND ?2 AND a.tier IS NOT NULL
         GROUP BY a.tier
         ORDER BY {TIER_CASE}"
    );
    run_query(conn, &sql, &[&start, &end])
}

/// Complaint volume per account region, loudest region first.
pub fn regional_distribution(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT a.region AS region, COUNT(*) AS complaint_count
         FROM complaints c
         JOIN accounts a ON a.account_id = c.account_id
         WHERE c.complaint_ts BETWEEN ?1 AND ?2 AND a.region IS NOT NULL
         GROUP BY a.region
         ORDER BY complaint_count DESC, region",
        &[&start, &end],
    )
}

/// Survey response counts and average score per survey type. Promoter and
/// detractor counts follow the 0..10 NPS convention and are meaningful for
/// the NPS rows.
pub fn survey_metrics(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT survey_type,
                COUNT(*) AS responses,
                COALESCE(ROUND(AVG(score), 2), 0) AS avg_score,
                SUM(CASE WHEN score >= 9 THEN 1 ELSE 0 END) AS promoters,
                SUM(CASE WHEN score <= 6 THEN 1 ELSE 0 END) AS detractors
         FROM survey_responses
         WHERE response_ts BETWEEN ?1 AND ?2
         GROUP BY survey_type
         ORDER BY survey_type",
        &[&start, &end],
    )
}

/// Customers ranked by churn risk. Complaint pressure comes from SQL; the
/// risk score itself is a seeded placeholder in 60..95 keyed by customer id
/// (no modelled score exists in the feed yet), so a fixed seed gives an
/// exactly reproducible ranking.
pub fn top_risk_customers(
    conn: &Connection,
    range: &DateRange,
    seed: u64,
) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let mut qr = run_query(
        conn,
        "SELECT c.customer_id AS customer_id,
                a.tier AS tier,
                COUNT(*) AS complaint_count,
                SUM(CASE WHEN c.status NOT IN ('Resolved', 'Closed') THEN 1 ELSE 0 END) AS open_count
         FROM complaints c
         LEFT JOIN accounts a ON a.account_id = c.account_id
         WHERE c.complaint_ts BETWEEN ?1 AND ?2
         GROUP BY c.customer_id, a.tier
         ORDER BY complaint_count DESC, c.customer_id
         LIMIT 10",
        &[&start, &end],
    )?;

    append_score(&mut qr, "risk_score", |identity| {
        scoring::churn_risk_score(seed, identity)
    });
    sort_by_score_desc(&mut qr, "risk_score");
    Ok(qr)
}

/// Health view of Gold accounts: complaint load, open disputes, recency of
/// the last complaint and a seeded churn risk score. Riskiest first.
pub fn vip_customer_health(
    conn: &Connection,
    range: &DateRange,
    now: DateTime<Utc>,
    seed: u64,
) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let as_of = ts_param(now);
    let mut qr = run_query(
        conn,
        "SELECT a.account_id AS account_id,
                a.account_name AS account_name,
                a.region AS region,
                COUNT(c.complaint_id) AS complaint_count,
                SUM(CASE WHEN c.status NOT IN ('Resolved', 'Closed') THEN 1 ELSE 0 END) AS open_count,
                COALESCE(ROUND((SELECT SUM(d.amount) FROM disputes d
                    WHERE d.account_id = a.account_id AND d.status = 'Open'), 2), 0) AS open_dispute_amount,
                CAST(julianday(?3) - julianday(MAX(c.complaint_ts)) AS INTEGER) AS days_since_last
         FROM accounts a
         JOIN complaints c ON c.account_id = a.account_id
         WHERE a.tier = 'Gold' AND c.complaint_ts BETWEEN ?1 AND ?2
         GROUP BY a.account_id, a.account_name, a.region
         ORDER BY complaint_count DESC, a.account_id",
        &[&start, &end, &as_of],
    )?;

    append_score(&mut qr, "churn_risk", |identity| {
        scoring::churn_risk_score(seed, identity)
    });
    sort_by_score_desc(&mut qr, "churn_risk");
    Ok(qr)
}

/// Accounts whose complaint history marks them as upsell candidates, with a
/// seeded estimated annual value anchored on tier pricing. Highest value
/// first.
pub fn upsell_opportunities(
    conn: &Connection,
    range: &DateRange,
    seed: u64,
) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let mut qr = run_query(
        conn,
        "SELECT a.account_id AS account_id,
                a.tier AS tier,
                COUNT(*) AS complaint_count,
                COALESCE(ROUND(100.0 * SUM(CASE WHEN c.status IN ('Resolved', 'Closed') THEN 1 ELSE 0 END)
                    / NULLIF(COUNT(*), 0), 1), 0) AS resolution_rate
         FROM complaints c
         JOIN accounts a ON a.account_id = c.account_id
         WHERE c.complaint_ts BETWEEN ?1 AND ?2 AND a.tier IS NOT NULL
         GROUP BY a.account_id, a.tier
         HAVING COUNT(*) >= 2
         ORDER BY complaint_count DESC, a.account_id
         LIMIT 25",
        &[&start, &end],
    )?;

    let account_idx = qr.column_index("account_id");
    let tier_idx = qr.column_index("tier");
    qr.columns.push("estimated_annual_value".to_string());
    for row in &mut qr.rows {
        let account = account_idx.and_then(|i| row[i].as_text().map(str::to_owned));
        let tier = tier_idx
            .and_then(|i| row[i].as_text())
            .and_then(Tier::parse);
        let value = match (account, tier) {
            (Some(account), Some(tier)) => {
                Scalar::Real(scoring::upsell_annual_value(seed, &account, tier))
            }
            _ => Scalar::Null,
        };
        row.push(value);
    }
    sort_by_score_desc(&mut qr, "estimated_annual_value");
    Ok(qr)
}

/// One-row candidate counts behind the expansion page metrics.
pub fn revenue_expansion_metrics(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "WITH candidates AS (
             SELECT a.account_id, a.tier
             FROM complaints c
             JOIN accounts a ON a.account_id = c.account_id
             WHERE c.complaint_ts BETWEEN ?1 AND ?2 AND a.tier IS NOT NULL
             GROUP BY a.account_id, a.tier
             HAVING COUNT(*) >= 2
         )
         SELECT COUNT(*) AS candidate_accounts,
                SUM(CASE WHEN tier = 'Gold' THEN 1 ELSE 0 END) AS gold_candidates,
                SUM(CASE WHEN tier = 'Silver' THEN 1 ELSE 0 END) AS silver_candidates,
                SUM(CASE WHEN tier = 'Bronze' THEN 1 ELSE 0 END) AS bronze_candidates
         FROM candidates",
        &[&start, &end],
    )
}

/// Candidate list for the 360 lookup: customers that appear in both the
/// complaint and voice histories, most active first.
pub fn customers_with_complete_data(conn: &Connection) -> AppResult<QueryResult> {
    run_query(
        conn,
        "SELECT c.customer_id AS customer_id,
                COUNT(DISTINCT c.complaint_id) AS complaints,
                (SELECT COUNT(*) FROM voice_calls v
                 WHERE v.customer_id = c.customer_id) AS calls
         FROM complaints c
         WHERE EXISTS (SELECT 1 FROM voice_calls v WHERE v.customer_id = c.customer_id)
         GROUP BY c.customer_id
         ORDER BY complaints DESC, customer_id
         LIMIT 100",
        &[],
    )
}

/// Profile facet of the 360 lookup. Empty when the customer id has no
/// complaint history at all; the composer treats that as a failed lookup.
pub fn customer_profile(conn: &Connection, customer_id: &str) -> AppResult<QueryResult> {
    run_query(
        conn,
        "SELECT c.customer_id AS customer_id,
                a.account_id AS account_id,
                a.account_name AS account_name,
                a.tier AS tier,
                a.region AS region,
                a.customer_since AS customer_since,
                COUNT(c.complaint_id) AS complaint_count
         FROM complaints c
         LEFT JOIN accounts a ON a.account_id = c.account_id
         WHERE c.customer_id = ?1
         GROUP BY c.customer_id, a.account_id, a.account_name, a.tier, a.region, a.customer_since",
        &[&customer_id],
    )
}

pub fn customer_complaint_history(conn: &Connection, customer_id: &str) -> AppResult<QueryResult> {
    run_query(
        conn,
        "SELECT complaint_id, channel, category, priority, status, complaint_ts
         FROM complaints
         WHERE customer_id = ?1
         ORDER BY complaint_ts DESC",
        &[&customer_id],
    )
}

pub fn customer_call_history(conn: &Connection, customer_id: &str) -> AppResult<QueryResult> {
    run_query(
        conn,
        "SELECT call_id, agent_id, call_ts, duration_seconds, satisfaction
         FROM voice_calls
         WHERE customer_id = ?1
         ORDER BY call_ts DESC",
        &[&customer_id],
    )
}

pub fn customer_dispute_history(conn: &Connection, customer_id: &str) -> AppResult<QueryResult> {
    run_query(
        conn,
        "SELECT d.dispute_id, d.category, d.amount, d.status, d.opened_date, d.resolved_date
         FROM disputes d
         WHERE d.account_id IN (SELECT account_id FROM complaints WHERE customer_id = ?1)
         ORDER BY d.opened_date DESC",
        &[&customer_id],
    )
}

/// Appends a computed column keyed by the row identity in column 0.
fn append_score<F>(qr: &mut QueryResult, column: &str, score: F)
where
    F: Fn(&str) -> f64,
{
    qr.columns.push(column.to_string());
    for row in &mut qr.rows {
        let value = match row.first().and_then(|s| s.as_text()) {
            Some(identity) => Scalar::Real(score(&identity.to_owned())),
            None => Scalar::Null,
        };
        row.push(value);
    }
}

fn sort_by_score_desc(qr: &mut QueryResult, column: &str) {
    if let Some(idx) = qr.column_index(column) {
        qr.rows.sort_by(|a, b| {
            let av = a[idx].as_f64().unwrap_or(0.0);
            let bv = b[idx].as_f64().unwrap_or(0.0);
            bv.partial_cmp(&av).unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup::init_memory_db;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
    }

    fn seed_data(conn: &Connection) {
        conn.execute_batch(
            "INSERT INTO accounts (account_id, account_name, tier, region, customer_since) VALUES
                 ('AC-1', 'Alfa SA', 'Gold', 'North', '2020-03-01'),
                 ('AC-2', 'Beta Lda', 'Bronze', 'South', '2023-07-15');
             INSERT INTO complaints
                 (complaint_id, customer_id, account_id, channel, category, priority, status, complaint_ts)
             VALUES
                 ('C-1', 'CU-1', 'AC-1', 'Voice', 'Network', 'High',   'Open',     '2025-01-05 09:00:00'),
                 ('C-2', 'CU-1', 'AC-1', 'Chat',  'Billing', 'Medium', 'Resolved', '2025-01-08 10:00:00'),
                 ('C-3', 'CU-2', 'AC-2', 'Email', 'Billing', 'Low',    'Resolved', '2025-01-09 11:00:00'),
                 ('C-4', 'CU-2', 'AC-2', 'Voice', 'Service', 'Low',    'Open',     '2025-01-12 12:00:00');
             INSERT INTO voice_calls
                 (call_id, customer_id, agent_id, call_ts, duration_seconds, satisfaction, first_call_resolution)
             VALUES ('V-1', 'CU-1', 'AG-1', '2025-01-05 09:30:00', 400, 4, 1);
             INSERT INTO disputes (dispute_id, account_id, amount, status, opened_date)
             VALUES ('D-1', 'AC-1', 75.0, 'Open', '2025-01-06');
             INSERT INTO survey_responses (response_id, customer_id, survey_type, score, response_ts)
             VALUES
                 ('R-1', 'CU-1', 'NPS',  9, '2025-01-10 08:00:00'),
                 ('R-2', 'CU-2', 'NPS',  4, '2025-01-11 08:00:00'),
                 ('R-3', 'CU-1', 'CSAT', 5, '2025-01-12 08:00:00');",
        )
        .unwrap();
    }

    #[test]
    fn test_impact_by_tier_gold_first() {
        let conn = init_memory_db().unwrap();
        seed_data(&conn);
        let qr = impact_by_tier(&conn, &range()).unwrap();
        assert_eq!(qr.labels("tier"), vec!["Gold", "Bronze"]);
    }

    #[test]
    fn test_survey_metrics_nps_counts() {
        let conn = init_memory_db().unwrap();
        seed_data(&conn);
        let qr = survey_metrics(&conn, &range()).unwrap();
        let idx = qr.column_index("survey_type").unwrap();
        let nps_row = qr.rows.iter().position(|r| r[idx].display() == "NPS").unwrap();
        assert_eq!(qr.cell(nps_row, "promoters").as_i64(), Some(1));
        assert_eq!(qr.cell(nps_row, "detractors").as_i64(), Some(1));
    }

    #[test]
    fn test_top_risk_is_seed_reproducible() {
        let conn = init_memory_db().unwrap();
        seed_data(&conn);
        let a = top_risk_customers(&conn, &range(), 7).unwrap();
        let b = top_risk_customers(&conn, &range(), 7).unwrap();
        assert_eq!(a, b);
        let scores = a.numbers("risk_score");
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores.iter().all(|s| (60.0..=95.0).contains(s)));
    }

    #[test]
    fn test_vip_health_only_gold_accounts() {
        let conn = init_memory_db().unwrap();
        seed_data(&conn);
        let now: DateTime<Utc> = "2025-01-15T09:00:00Z".parse().unwrap();
        let qr = vip_customer_health(&conn, &range(), now, 7).unwrap();
        assert_eq!(qr.labels("account_id"), vec!["AC-1"]);
        assert_eq!(qr.scalar_f64("open_dispute_amount"), 75.0);
        assert_eq!(qr.scalar_i64("days_since_last"), 6);
    }

    #[test]
    fn test_upsell_value_anchored_on_tier() {
        let conn = init_memory_db().unwrap();
        seed_data(&conn);
        let qr = upsell_opportunities(&conn, &range(), 7).unwrap();
        assert_eq!(qr.len(), 2);
        let tier_idx = qr.column_index("tier").unwrap();
        let value_idx = qr.column_index("estimated_annual_value").unwrap();
        for row in &qr.rows {
            let value = row[value_idx].as_f64().unwrap();
            match row[tier_idx].display().as_str() {
                "Gold" => assert!((432.0..=648.0).contains(&value)),
                "Bronze" => assert!((96.0..=144.0).contains(&value)),
                other => panic!("unexpected tier {other}"),
            }
        }
    }

    #[test]
    fn test_complete_data_requires_both_histories() {
        let conn = init_memory_db().unwrap();
        seed_data(&conn);
        let qr = customers_with_complete_data(&conn).unwrap();
        assert_eq!(qr.labels("customer_id"), vec!["CU-1"]);
    }

    #[test]
    fn test_customer_facets_collect_history() {
        let conn = init_memory_db().unwrap();
        seed_data(&conn);
        let profile = customer_profile(&conn, "CU-1").unwrap();
        assert_eq!(profile.scalar_i64("complaint_count"), 2);
        assert_eq!(customer_complaint_history(&conn, "CU-1").unwrap().len(), 2);
        assert_eq!(customer_call_history(&conn, "CU-1").unwrap().len(), 1);
        assert_eq!(customer_dispute_history(&conn, "CU-1").unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_customer_has_empty_profile() {
        let conn = init_memory_db().unwrap();
        seed_data(&conn);
        assert!(customer_profile(&conn, "CU-404").unwrap().is_empty());
    }
}
