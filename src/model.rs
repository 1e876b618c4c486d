//! Domain enumerations and the date-range parameter shared by every
//! windowed query. The orderings defined here are the canonical ones: any
//! sort or tie-break touching priority or tier, in Rust or in SQL, must
//! agree with them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Intake channel of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Voice,
    Email,
    Chat,
    Social,
    Survey,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Voice,
        Channel::Email,
        Channel::Chat,
        Channel::Social,
        Channel::Survey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Voice => "Voice",
            Channel::Email => "Email",
            Channel::Chat => "Chat",
            Channel::Social => "Social",
            Channel::Survey => "Survey",
        }
    }

    /// Assumed handling cost per contact, in euros. Fixed business
    /// assumption, not derived from data.
    pub fn cost_per_contact(&self) -> i64 {
        match self {
            Channel::Voice => 22,
            Channel::Email => 12,
            Channel::Chat => 8,
            Channel::Social => 15,
            Channel::Survey => 3,
        }
    }
}

/// Complaint priority, ordered most urgent first (`Critical < High < ...`
/// so that ascending sort yields the canonical display order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// 1-based rank used by the shared SQL CASE fragment.
    pub fn rank(&self) -> i64 {
        match self {
            Priority::Critical => 1,
            Priority::High => 2,
            Priority::Medium => 3,
            Priority::Low => 4,
        }
    }

    /// SLA target in hours for an open case of this priority.
    pub fn sla_hours(&self) -> i64 {
        match self {
            Priority::Critical => 4,
            Priority::High => 8,
            Priority::Medium => 24,
            Priority::Low => 48,
        }
    }
}

/// Complaint lifecycle status. Resolved and Closed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Open,
    Resolved,
    Closed,
    Escalated,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
            Status::Escalated => "Escalated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Resolved | Status::Closed)
    }
}

/// Customer value segment, highest value first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Gold, Tier::Silver, Tier::Bronze];

    pub fn parse(s: &str) -> Option<Tier> {
        match s {
            "Gold" => Some(Tier::Gold),
            "Silver" => Some(Tier::Silver),
            "Bronze" => Some(Tier::Bronze),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Gold => "Gold",
            Tier::Silver => "Silver",
            Tier::Bronze => "Bronze",
        }
    }
}

/// Closed date interval `[start, end]` driving every time-windowed query.
///
/// `start <= end` is a caller precondition; it is debug-asserted but not
/// validated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "date range start must not exceed end");
        DateRange { start, end }
    }

    /// Inclusive lower bound as a SQL timestamp parameter.
    pub fn start_param(&self) -> String {
        format!("{} 00:00:00", self.start)
    }

    /// Inclusive upper bound as a SQL timestamp parameter (end of day).
    pub fn end_param(&self) -> String {
        format!("{} 23:59:59", self.end)
    }

    pub fn start_date_param(&self) -> String {
        self.start.to_string()
    }

    pub fn end_date_param(&self) -> String {
        self.end.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_canonical_order() {
        let mut shuffled = [Priority::Low, Priority::Critical, Priority::Medium, Priority::High];
        shuffled.sort();
        assert_eq!(shuffled, Priority::ALL);
    }

    #[test]
    fn test_priority_rank_matches_order() {
        for pair in Priority::ALL.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_tier_gold_first() {
        let mut shuffled = [Tier::Bronze, Tier::Gold, Tier::Silver];
        shuffled.sort();
        assert_eq!(shuffled, Tier::ALL);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(Status::Resolved.is_terminal());
        assert!(Status::Closed.is_terminal());
        assert!(!Status::Open.is_terminal());
        assert!(!Status::Escalated.is_terminal());
    }

    #[test]
    fn test_range_params() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        );
        assert_eq!(range.start_param(), "2025-01-01 00:00:00");
        assert_eq!(range.end_param(), "2025-03-31 23:59:59");
    }
}
