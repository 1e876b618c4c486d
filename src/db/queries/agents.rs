//! Agent-facet queries over voice calls and chat sessions.

use rusqlite::Connection;

use crate::db::result::{run_query, QueryResult, Scalar};
use crate::error::AppResult;
use crate::model::DateRange;
use crate::scoring;

/// Per-agent workload across voice and chat, busiest agent first. For chat,
/// a session that avoided escalation counts as first-contact resolution.
///
/// A `quality_score` column is appended in Rust: the feed has no QA scores
/// yet, so a seeded placeholder in 45..95 keyed by agent id stands in. The
/// same seed always yields the same leaderboard.
pub fn agent_performance(
    conn: &Connection,
    range: &DateRange,
    seed: u64,
) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    let mut qr = run_query(
        conn,
        "WITH contact AS (
             SELECT agent_id, duration_seconds, satisfaction,
                    first_call_resolution AS fcr
             FROM voice_calls
             WHERE call_ts BETWEEN ?1 AND ?2
             UNION ALL
             SELECT agent_id, duration_seconds, satisfaction,
                    CASE WHEN escalated = 0 THEN 1 ELSE 0 END
             FROM chat_sessions
             WHERE start_ts BETWEEN ?1 AND ?2
         )
         SELECT agent_id,
                COUNT(*) AS contacts,
                ROUND(AVG(duration_seconds) / 60.0, 1) AS avg_handle_minutes,
                COALESCE(ROUND(AVG(satisfaction), 2), 0) AS avg_satisfaction,
                COALESCE(ROUND(100.0 * SUM(fcr) / NULLIF(COUNT(*), 0), 1), 0) AS fcr_rate
         FROM contact
         GROUP BY agent_id
         ORDER BY contacts DESC, agent_id",
        &[&start, &end],
    )?;

    let agent_idx = qr.column_index("agent_id");
    qr.columns.push("quality_score".to_string());
    for row in &mut qr.rows {
        let score = match agent_idx.and_then(|i| row[i].as_text().map(str::to_owned)) {
            Some(agent) => Scalar::Real(scoring::fcr_rate_estimate(seed, &agent)),
            None => Scalar::Null,
        };
        row.push(score);
    }

    Ok(qr)
}

/// Average voice satisfaction per agent, happiest callers first. Calls
/// without a recorded rating are excluded.
pub fn voice_sentiment_by_agent(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT agent_id,
                COUNT(*) AS rated_calls,
                ROUND(AVG(satisfaction), 2) AS avg_satisfaction
         FROM voice_calls
         WHERE call_ts BETWEEN ?1 AND ?2 AND satisfaction IS NOT NULL
         GROUP BY agent_id
         ORDER BY avg_satisfaction DESC, agent_id",
        &[&start, &end],
    )
}

/// Daily average voice satisfaction, chronological.
pub fn voice_sentiment_trends(conn: &Connection, range: &DateRange) -> AppResult<QueryResult> {
    let (start, end) = (range.start_param(), range.end_param());
    run_query(
        conn,
        "SELECT date(call_ts) AS day,
                COUNT(*) AS rated_calls,
                ROUND(AVG(satisfaction), 2) AS avg_satisfaction
         FROM voice_calls
         WHERE call_ts BETWEEN ?1 AND ?2 AND satisfaction IS NOT NULL
         GROUP BY day
         ORDER BY day",
        &[&start, &end],
    )
}
