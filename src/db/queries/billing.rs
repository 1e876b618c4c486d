//! Billing-facet queries: disputes, invoices, payments and receivables.
//!
//! Dispute and invoice dates are date columns, so these statements bind the
//! plain `YYYY-MM-DD` bounds rather than the timestamp bounds used on
//! `complaints`.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use super::{ts_param, TIER_CASE};
use crate::db::result::{run_query, QueryResult};
use crate::error::AppResult;
use crate::model::DateRange;

/// One-row dispute headline for the window.
pub fn dispute_summary(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_date_param(), range.end_date_param());
    run_query(
        conn,
        "SELECT COUNT(*) AS total_disputes,
                SUM(CASE WHEN status = 'Open' THEN 1 ELSE 0 END) AS open_count,
                SUM(CASE WHEN status = 'Resolved' THEN 1 ELSE 0 END) AS resolved_count,
                COALESCE(ROUND(SUM(amount), 2), 0) AS total_amount,
                COALESCE(ROUND(AVG(amount), 2), 0) AS avg_amount,
                COALESCE(ROUND(100.0 * SUM(CASE WHEN status = 'Resolved' THEN 1 ELSE 0 END)
                    / NULLIF(COUNT(*), 0), 1), 0) AS resolution_rate
         FROM disputes
         WHERE opened_date BETWEEN ?1 AND ?2",
        &[&start, &end],
    )
}

/// Dispute counts and value per category, largest value first.
pub fn dispute_by_type(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_date_param(), range.end_date_param());
    run_query(
        conn,
        "SELECT category, COUNT(*) AS count, COALESCE(ROUND(SUM(amount), 2), 0) AS total_amount
         FROM disputes
         WHERE opened_date BETWEEN ?1 AND ?2 AND category IS NOT NULL
         GROUP BY category
         ORDER BY total_amount DESC, category",
        &[&start, &end],
    )
}

/// Daily openings with disputed value, chronological.
pub fn dispute_trends(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_date_param(), range.end_date_param());
    run_query(
        conn,
        "SELECT opened_date AS day,
                COUNT(*) AS count,
                COALESCE(ROUND(SUM(amount), 2), 0) AS total_amount
         FROM disputes
         WHERE opened_date BETWEEN ?1 AND ?2
         GROUP BY opened_date
         ORDER BY opened_date",
        &[&start, &end],
    )
}

/// Disputed value split by lifecycle state: recovered, written off, still
/// at risk.
pub fn financial_impact(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_date_param(), range.end_date_param());
    run_query(
        conn,
        "SELECT COALESCE(ROUND(SUM(amount), 2), 0) AS total_disputed,
                COALESCE(ROUND(SUM(CASE WHEN status = 'Resolved' THEN amount ELSE 0 END), 2), 0) AS resolved_amount,
                COALESCE(ROUND(SUM(CASE WHEN status = 'Open' THEN amount ELSE 0 END), 2), 0) AS open_amount,
                COALESCE(ROUND(SUM(CASE WHEN network_incident_id IS NOT NULL THEN amount ELSE 0 END), 2), 0)
                    AS network_linked_amount
         FROM disputes
         WHERE opened_date BETWEEN ?1 AND ?2",
        &[&start, &end],
    )
}

/// Open disputes ranked by value, with age as of the supplied instant.
pub fn high_value_disputes(
    conn: &Connection,
    range: &DateRange,
    now: DateTime<Utc>,
) -> AppResult<QueryResult> {
    let (start, end) = (range.start_date_param(), range.end_date_param());
    let as_of = ts_param(now);
    run_query(
        conn,
        "SELECT dispute_id, account_id, category,
                ROUND(amount, 2) AS amount,
                CAST(julianday(?3) - julianday(opened_date) AS INTEGER) AS days_open
         FROM disputes
         WHERE opened_date BETWEEN ?1 AND ?2 AND status = 'Open'
         ORDER BY amount DESC, dispute_id
         LIMIT 15",
        &[&start, &end, &as_of],
    )
}

/// Accounts that disputed twice or more in the window.
pub fn frequent_disputers(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_date_param(), range.end_date_param());
    run_query(
        conn,
        "SELECT account_id,
                COUNT(*) AS dispute_count,
                COALESCE(ROUND(SUM(amount), 2), 0) AS total_amount
         FROM disputes
         WHERE opened_date BETWEEN ?1 AND ?2
         GROUP BY account_id
         HAVING COUNT(*) >= 2
         ORDER BY dispute_count DESC, total_amount DESC
         LIMIT 20",
        &[&start, &end],
    )
}

/// Open disputed value by customer tier, highest tier first.
pub fn revenue_at_risk_by_tier(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_date_param(), range.end_date_param());
    let sql = format!(
        "SELECT a.tier AS tier,
                COUNT(*) AS dispute_count,
                COALESCE(ROUND(SUM(d.amount), 2), 0) AS amount_at_risk
         FROM disputes d
         JOIN accounts a ON a.account_id = d.account_id
         WHERE d.opened_date BETWEEN ?1 AND ?2
           AND d.status = 'Open'
           AND a.tier IS NOT NULL
         GROUP BY a.tier
         ORDER BY {TIER_CASE}"
    );
    run_query(conn, &sql, &[&start, &end])
}

/// Resolved disputes bucketed by days to resolution, fastest first.
pub fn dispute_resolution_buckets(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_date_param(), range.end_date_param());
    run_query(
        conn,
        "WITH resolved AS (
             SELECT julianday(resolved_date) - julianday(opened_date) AS days
             FROM disputes
             WHERE opened_date BETWEEN ?1 AND ?2 AND resolved_date IS NOT NULL
         )
         SELECT CASE
                    WHEN days <= 7 THEN '0-7d'
                    WHEN days <= 14 THEN '8-14d'
                    WHEN days <= 30 THEN '15-30d'
                    ELSE '> 30d'
                END AS bucket,
                COUNT(*) AS count
         FROM resolved
         GROUP BY bucket
         ORDER BY MIN(days)",
        &[&start, &end],
    )
}

/// Dispute openings by day of month, to expose billing-cycle clustering.
pub fn billing_cycle_pattern(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_date_param(), range.end_date_param());
    run_query(
        conn,
        "SELECT CAST(strftime('%d', opened_date) AS INTEGER) AS day_of_month,
                COUNT(*) AS count
         FROM disputes
         WHERE opened_date BETWEEN ?1 AND ?2
         GROUP BY day_of_month
         ORDER BY day_of_month",
        &[&start, &end],
    )
}

/// Invoices in the window that jumped at least 50% over the account's
/// previous invoice, biggest jump first.
pub fn bill_shock(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_date_param(), range.end_date_param());
    run_query(
        conn,
        "WITH sequenced AS (
             SELECT account_id, invoice_date,
                    total_amount,
                    LAG(total_amount) OVER (
                        PARTITION BY account_id ORDER BY invoice_date
                    ) AS prev_amount
             FROM invoices
         )
         SELECT account_id, invoice_date,
                ROUND(total_amount, 2) AS total_amount,
                ROUND(prev_amount, 2) AS prev_amount,
                ROUND(100.0 * (total_amount - prev_amount) / NULLIF(prev_amount, 0), 1) AS increase_pct
         FROM sequenced
         WHERE invoice_date BETWEEN ?1 AND ?2
           AND prev_amount IS NOT NULL
           AND prev_amount > 0
           AND total_amount >= prev_amount * 1.5
         ORDER BY increase_pct DESC, account_id",
        &[&start, &end],
    )
}

/// Receivables totals across the standard ageing buckets. Not windowed:
/// balances describe the present state of each account.
pub fn ar_aging_summary(conn: &Connection) -> AppResult<QueryResult> {
    run_query(
        conn,
        "SELECT COALESCE(ROUND(SUM(current_balance), 2), 0) AS total_balance,
                COALESCE(ROUND(SUM(aging_0_30), 2), 0) AS aging_0_30,
                COALESCE(ROUND(SUM(aging_31_60), 2), 0) AS aging_31_60,
                COALESCE(ROUND(SUM(aging_61_90), 2), 0) AS aging_61_90,
                COALESCE(ROUND(SUM(aging_91_plus), 2), 0) AS aging_91_plus
         FROM ar_balances",
        &[],
    )
}

/// Daily billing complaints alongside payments received the same day.
pub fn payment_complaint_correlation(
    conn: &Connection,
    range: &DateRange,
) -> AppResult<QueryResult> {
    let (start_day, end_day) = (range.start_date_param(), range.end_date_param());
    let (start_ts, end_ts) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "WITH pay AS (
             SELECT payment_date AS day, COUNT(*) AS count
             FROM payments
             WHERE payment_date BETWEEN ?1 AND ?2
             GROUP BY payment_date
         ),
         comp AS (
             SELECT date(complaint_ts) AS day, COUNT(*) AS count
             FROM complaints
             WHERE category = 'Billing' AND complaint_ts BETWEEN ?3 AND ?4
             GROUP BY day
         )
         SELECT comp.day AS day,
                comp.count AS billing_complaints,
                COALESCE(pay.count, 0) AS payments
         FROM comp
         LEFT JOIN pay ON pay.day = comp.day
         ORDER BY comp.day",
        &[&start_day, &end_day, &start_ts, &end_ts],
    )
}
