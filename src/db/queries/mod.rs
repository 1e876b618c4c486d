//! Parametrized read queries, grouped by facet.
//!
//! Conventions shared by every function here:
//! - placeholders only, never interpolated values;
//! - rows come back pre-sorted in the order the page displays them;
//! - rate denominators are guarded with NULLIF/COALESCE, so an empty
//!   window yields 0 rather than a division fault;
//! - queries that depend on "now" take it as an explicit parameter.

pub mod agents;
pub mod billing;
pub mod complaints;
pub mod customers;
pub mod network;

use chrono::{DateTime, Utc};

/// Canonical priority ordering for SQL sorts, matching `Priority::rank`.
pub const PRIORITY_CASE: &str =
    "CASE priority WHEN 'Critical' THEN 1 WHEN 'High' THEN 2 WHEN 'Medium' THEN 3 ELSE 4 END";

/// Canonical tier ordering for SQL sorts, matching the `Tier` enum.
pub const TIER_CASE: &str = "CASE tier WHEN 'Gold' THEN 1 WHEN 'Silver' THEN 2 ELSE 3 END";

/// SLA budget in hours per priority, matching `Priority::sla_hours`.
pub const SLA_HOURS_CASE: &str =
    "CASE priority WHEN 'Critical' THEN 4 WHEN 'High' THEN 8 WHEN 'Medium' THEN 24 ELSE 48 END";

/// Formats an instant the way the store's timestamp columns are written.
pub(crate) fn ts_param(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}
