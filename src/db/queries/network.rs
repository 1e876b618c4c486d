//! Network-facet queries over complaints linked to network incidents.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use super::ts_param;
use crate::db::result::{run_query, QueryResult};
use crate::error::AppResult;
use crate::model::DateRange;

/// One-row incident headline: how much of the complaint volume traces back
/// to network incidents.
pub fn incident_stats(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT COUNT(DISTINCT network_incident_id) AS incident_count,
                SUM(CASE WHEN network_incident_id IS NOT NULL THEN 1 ELSE 0 END) AS linked_complaints,
                COUNT(DISTINCT CASE WHEN network_incident_id IS NOT NULL THEN customer_id END)
                    AS affected_customers,
                COALESCE(ROUND(100.0 * SUM(CASE WHEN network_incident_id IS NOT NULL THEN 1 ELSE 0 END)
                    / NULLIF(COUNT(*), 0), 1), 0) AS linked_pct
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2",
        &[&start, &end],
    )
}

/// Complaint counts per incident, loudest incident first.
pub fn incident_correlation(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT network_incident_id AS incident_id, COUNT(*) AS complaint_count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2 AND network_incident_id IS NOT NULL
         GROUP BY network_incident_id
         ORDER BY complaint_count DESC, incident_id
         LIMIT 10",
        &[&start, &end],
    )
}

/// Incidents ranked by blast radius: complaints, customers touched, linked
/// disputed value, and days since first linked complaint.
pub fn incident_impact_ranking(
    conn: &Connection,
    range: &DateRange,
    now: DateTime<Utc>,
) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let as_of = ts_param(now);
    run_query(
        conn,
        "SELECT c.network_incident_id AS incident_id,
                COUNT(*) AS complaint_count,
                COUNT(DISTINCT c.customer_id) AS affected_customers,
                COALESCE(ROUND((SELECT SUM(d.amount) FROM disputes d
                    WHERE d.network_incident_id = c.network_incident_id), 2), 0) AS disputed_amount,
                CAST(julianday(?3) - julianday(MIN(c.complaint_ts)) AS INTEGER) AS days_since_first
         FROM complaints c
         WHERE c.complaint_ts BETWEEN ?1 AND ?2 AND c.network_incident_id IS NOT NULL
         GROUP BY c.network_incident_id
         ORDER BY complaint_count DESC, disputed_amount DESC
         LIMIT 10",
        &[&start, &end, &as_of],
    )
}

/// Daily network complaint volume, the proxy for perceived service quality.
pub fn service_quality_trend(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT date(complaint_ts) AS day,
                SUM(CASE WHEN network_incident_id IS NOT NULL THEN 1 ELSE 0 END) AS incident_linked,
                COUNT(*) AS total
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2 AND category = 'Network'
         GROUP BY day
         ORDER BY day",
        &[&start, &end],
    )
}

/// Category mix within incident-linked complaints.
pub fn category_breakdown(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT category, COUNT(*) AS count
         FROM complaints
         WHERE complaint_ts BETWEEN ?1 AND ?2
           AND network_incident_id IS NOT NULL
           AND category IS NOT NULL
         GROUP BY category
         ORDER BY count DESC, category",
        &[&start, &end],
    )
}

/// Incident-linked complaints by account region and city.
pub fn geographic_impact(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT a.region AS region, a.city AS city,
                COUNT(*) AS complaint_count,
                COUNT(DISTINCT c.customer_id) AS affected_customers
         FROM complaints c
         JOIN accounts a ON a.account_id = c.account_id
         WHERE c.complaint_ts BETWEEN ?1 AND ?2
           AND c.network_incident_id IS NOT NULL
           AND a.region IS NOT NULL
         GROUP BY a.region, a.city
         ORDER BY complaint_count DESC, region, city",
        &[&start, &end],
    )
}
