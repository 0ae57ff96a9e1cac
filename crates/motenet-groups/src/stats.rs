//! Incremental group statistics.
//!
//! Every time a group's cardinality changes, the new value is folded into
//! its running maximum, minimum and mean:
//!
//! ```text
//! average' = (average × index + n) / (index + 1)
//! ```
//!
//! The folded values depend only on the sequence of observations. Only
//! `lifetime_seconds` reads the clock.

use crate::clock::Timestamp;
use crate::record::GroupRecord;

/// Record a new cardinality observation for `group`.
///
/// Sets `cardinality`, refreshes the lifetime and folds `cardinality` into
/// the running statistics.
pub fn update(group: &mut GroupRecord, cardinality: usize, now: Timestamp) {
    group.cardinality = cardinality;
    refresh_lifetime(group, now);
    group.stats.observe(cardinality);
}

/// Recompute `lifetime_seconds` from `created_at`.
pub fn refresh_lifetime(group: &mut GroupRecord, now: Timestamp) {
    group.lifetime_seconds = lifetime_seconds(group.created_at, now);
}

/// Seconds elapsed between `created_at` and `now`, clamped at zero.
pub fn lifetime_seconds(created_at: Timestamp, now: Timestamp) -> f64 {
    now.saturating_sub(created_at) as f64 / 1000.0
}
