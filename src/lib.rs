//! Query-and-visualization pipeline for the customer complaints and
//! sentiment analytics dashboard.
//!
//! The crate reads an analytical SQLite store and turns it into role pages:
//! parametrized queries produce [`db::result::QueryResult`] tables, a
//! TTL cache memoizes them, the chart builder maps them to render-ready
//! [`chart::ChartSpec`] values, and the view composer assembles the seven
//! role pages with per-section failure isolation. Rendering itself is out
//! of scope: the output is data, not pixels.

pub mod cache;
pub mod chart;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod model;
pub mod recommend;
pub mod scoring;
pub mod state;
pub mod stats;
pub mod view;

pub use cache::{Clock, QueryKey, ResultCache, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use model::{Channel, DateRange, Priority, Status, Tier};
pub use state::{AppState, DbAccess};

// ─── End-to-end tests ────────────────────────────────────────────────────

#[cfg(test)]
mod e2e {
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, NaiveDate, Utc};
    use rusqlite::Connection;

    use crate::cache::Clock;
    use crate::chart::ChartSpec;
    use crate::config::AppConfig;
    use crate::db::setup::init_memory_db;
    use crate::error::AppError;
    use crate::model::DateRange;
    use crate::state::AppState;
    use crate::view::{self, SectionBody};

    struct FixedClock(Mutex<DateTime<Utc>>);

    impl FixedClock {
        fn at(iso: &str) -> Arc<Self> {
            Arc::new(FixedClock(Mutex::new(iso.parse().unwrap())))
        }
    }

    impl Clock for FixedClock {
        fn now_utc(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn january() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
    }

    fn seed_demo_data(conn: &Connection) {
        conn.execute_batch(
            "INSERT INTO accounts (account_id, account_name, tier, region, city, customer_since) VALUES
                 ('AC-1', 'Alfa SA',   'Gold',   'North', 'Porto',  '2019-05-01'),
                 ('AC-2', 'Beta Lda',  'Silver', 'South', 'Faro',   '2021-09-12'),
                 ('AC-3', 'Gama Unip', 'Bronze', 'North', 'Braga',  '2023-02-20');

             INSERT INTO complaints
                 (complaint_id, customer_id, account_id, channel, category, priority, status,
                  complaint_ts, network_incident_id)
             VALUES
                 ('C-01', 'CU-1', 'AC-1', 'Voice',  'Network', 'Critical', 'Open',      '2025-01-06 09:10:00', 'INC-1'),
                 ('C-02', 'CU-1', 'AC-1', 'Chat',   'Billing', 'High',     'Resolved',  '2025-01-07 11:20:00', NULL),
                 ('C-03', 'CU-1', 'AC-1', 'Email',  'Billing', 'Medium',   'Escalated', '2025-01-09 15:05:00', NULL),
                 ('C-04', 'CU-2', 'AC-2', 'Voice',  'Network', 'High',     'Open',      '2025-01-10 10:45:00', 'INC-1'),
                 ('C-05', 'CU-2', 'AC-2', 'Social', 'Service', 'Low',      'Resolved',  '2025-01-12 17:30:00', NULL),
                 ('C-06', 'CU-3', 'AC-3', 'Chat',   'Network', 'Medium',   'Closed',    '2025-01-14 08:15:00', 'INC-2'),
                 ('C-07', 'CU-3', 'AC-3', 'Voice',  'Billing', 'Low',      'Open',      '2025-01-20 13:40:00', NULL),
                 ('C-08', 'CU-4', 'AC-2', 'Email',  'Service', 'Medium',   'Resolved',  '2025-01-22 09:55:00', NULL);

             INSERT INTO voice_calls
                 (call_id, customer_id, agent_id, call_ts, duration_seconds, satisfaction, first_call_resolution)
             VALUES
                 ('V-1', 'CU-1', 'AG-1', '2025-01-06 09:30:00', 420, 4, 1),
                 ('V-2', 'CU-2', 'AG-1', '2025-01-10 11:00:00', 610, 3, 0),
                 ('V-3', 'CU-3', 'AG-2', '2025-01-20 14:00:00', 380, 5, 1);

             INSERT INTO chat_sessions
                 (session_id, customer_id, agent_id, start_ts, duration_seconds, satisfaction, escalated)
             VALUES
                 ('S-1', 'CU-1', 'AG-2', '2025-01-07 11:00:00', 800, 4, 0),
                 ('S-2', 'CU-3', 'AG-1', '2025-01-14 08:00:00', 950, 2, 1);

             INSERT INTO survey_responses (response_id, customer_id, survey_type, score, response_ts)
             VALUES
                 ('R-1', 'CU-1', 'CSAT', 4,  '2025-01-08 10:00:00'),
                 ('R-2', 'CU-2', 'CSAT', 3,  '2025-01-13 10:00:00'),
                 ('R-3', 'CU-1', 'NPS',  9,  '2025-01-15 10:00:00'),
                 ('R-4', 'CU-2', 'NPS',  6,  '2025-01-16 10:00:00'),
                 ('R-5', 'CU-3', 'NPS',  10, '2025-01-17 10:00:00');

             INSERT INTO disputes
                 (dispute_id, account_id, amount, category, status, opened_date, resolved_date, network_incident_id)
             VALUES
                 ('D-1', 'AC-1', 180.0, 'Overcharge', 'Open',     '2025-01-08', NULL,         'INC-1'),
                 ('D-2', 'AC-2',  55.0, 'Late fee',   'Resolved', '2025-01-11', '2025-01-14', NULL),
                 ('D-3', 'AC-3',  95.0, 'Roaming',    'Open',     '2025-01-21', NULL,         NULL),
                 ('D-4', 'AC-1',  30.0, 'Late fee',   'Resolved', '2025-01-18', '2025-01-19', NULL);

             INSERT INTO invoices (invoice_id, account_id, invoice_date, total_amount) VALUES
                 ('I-1', 'AC-1', '2024-12-10',  90.0),
                 ('I-2', 'AC-1', '2025-01-10', 150.0),
                 ('I-3', 'AC-2', '2025-01-10',  60.0);

             INSERT INTO payments (payment_id, account_id, payment_date, amount) VALUES
                 ('P-1', 'AC-1', '2025-01-09', 90.0),
                 ('P-2', 'AC-2', '2025-01-12', 60.0);

             INSERT INTO ar_balances (account_id, current_balance, aging_0_30, aging_31_60) VALUES
                 ('AC-1', 240.0, 150.0, 90.0),
                 ('AC-3', 95.0,  95.0,  0.0);",
        )
        .unwrap();
    }

    fn demo_state() -> AppState {
        // Capture section-failure logs in test output when RUST_LOG is set.
        let _ = env_logger::builder().is_test(true).try_init();
        let conn = init_memory_db().unwrap();
        seed_demo_data(&conn);
        AppState::with_clock(
            conn,
            AppConfig::default(),
            FixedClock::at("2025-01-25T12:00:00Z"),
        )
    }

    fn empty_bodies(page: &view::PageView) -> Vec<&str> {
        page.sections
            .iter()
            .filter(|s| matches!(s.body, SectionBody::Empty { .. }))
            .map(|s| s.title.as_str())
            .collect()
    }

    #[test]
    fn test_all_seven_pages_compose() {
        let state = demo_state();
        let range = january();
        let pages = [
            view::executive::page(&state, &range),
            view::service::page(&state, &range),
            view::network::page(&state, &range),
            view::billing::page(&state, &range),
            view::revenue::page(&state, &range),
            view::vip::page(&state, &range),
            view::analyst::page(&state, &range),
        ];
        for page in &pages {
            assert!(!page.sections.is_empty(), "{} has no sections", page.title);
            // The demo data has a steady daily volume, so an empty anomaly
            // table is the correct outcome there.
            let empties: Vec<&str> = empty_bodies(page)
                .into_iter()
                .filter(|title| *title != "Flagged anomalies")
                .collect();
            assert!(
                empties.is_empty(),
                "{} has unexpected empty sections: {:?}",
                page.title,
                empties
            );
        }
    }

    #[test]
    fn test_executive_page_has_charts_and_advisories() {
        let state = demo_state();
        let page = view::executive::page(&state, &january());
        assert_eq!(page.title, "Executive Overview");

        let charts = page
            .sections
            .iter()
            .filter(|s| matches!(s.body, SectionBody::Chart { .. }))
            .count();
        assert!(charts >= 10);
        assert!(page
            .sections
            .iter()
            .any(|s| matches!(s.body, SectionBody::Advisories { .. })));
        // Seeded demo data: every chart should carry real content.
        for section in &page.sections {
            if let SectionBody::Chart { spec } = &section.body {
                assert_ne!(spec, &ChartSpec::NoData, "{} is NoData", section.title);
            }
        }
    }

    #[test]
    fn test_zero_complaint_range_composes_with_empty_states() {
        let state = demo_state();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
        );
        let page = view::executive::page(&state, &range);

        // Summary metrics render with zeroes rather than failing.
        match &page.sections[0].body {
            SectionBody::Metrics { metrics } => {
                assert_eq!(metrics[0].value, "0");
            }
            other => panic!("expected metrics, got {other:?}"),
        }
        // Distribution charts degrade to NoData, not to failures.
        for section in &page.sections {
            match &section.body {
                SectionBody::Empty { message } => {
                    assert_eq!(message, "no data in range", "section {}", section.title)
                }
                SectionBody::Chart { spec } => {
                    if section.title == "Channel mix" {
                        assert_eq!(spec, &ChartSpec::NoData);
                    }
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_partial_failure_isolates_sections() {
        let state = demo_state();
        state
            .db
            .lock()
            .unwrap()
            .as_ref()
            .unwrap()
            .execute_batch("DROP TABLE voice_calls")
            .unwrap();

        let page = view::service::page(&state, &january());
        let failed = empty_bodies(&page);
        assert!(failed.contains(&"Agent leaderboard"));
        assert!(failed.contains(&"Sentiment by agent"));
        // Complaint-backed siblings are untouched.
        assert!(matches!(page.sections[0].body, SectionBody::Metrics { .. }));
        assert!(page
            .sections
            .iter()
            .any(|s| s.title == "Weekly volume" && matches!(s.body, SectionBody::Chart { .. })));
    }

    #[test]
    fn test_customer_lookup_flow() {
        let state = demo_state();

        let candidates = view::service::lookup_candidates(&state).unwrap();
        assert!(candidates.labels("customer_id").contains(&"CU-1".to_string()));

        let found = view::service::customer_view(&state, "CU-1").unwrap();
        assert_eq!(found.title, "Customer 360: CU-1");
        assert_eq!(found.sections.len(), 4);

        let missing = view::service::customer_view(&state, "CU-404");
        assert!(matches!(missing, Err(AppError::LookupNotFound(_))));
    }

    #[test]
    fn test_detail_export_round_trip() {
        let state = demo_state();
        let (name, csv) = view::analyst::export_detail(&state, &january()).unwrap();
        assert_eq!(name, "complaints_2025-01-01_2025-01-31.csv");

        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("complaint_id,customer_id"));
        // Header plus the 8 January complaints.
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_repeated_page_render_hits_cache() {
        let state = demo_state();
        let range = january();
        view::executive::page(&state, &range);
        let entries_after_first = state.cache.len();
        view::executive::page(&state, &range);
        assert_eq!(state.cache.len(), entries_after_first);
    }

    #[test]
    fn test_manual_refresh_clears_cache() {
        let state = demo_state();
        view::executive::page(&state, &january());
        assert!(!state.cache.is_empty());
        state.cache.clear_all();
        assert!(state.cache.is_empty());
    }

    #[test]
    fn test_seeded_rankings_stable_across_states() {
        let range = january();
        let a = view::revenue::page(&demo_state(), &range);
        let b = view::revenue::page(&demo_state(), &range);
        let table = |p: &view::PageView| match &p.sections[1].body {
            SectionBody::Table { table } => table.clone(),
            other => panic!("expected table, got {other:?}"),
        };
        assert_eq!(*table(&a), *table(&b));
    }
}
