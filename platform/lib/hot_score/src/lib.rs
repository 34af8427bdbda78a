//! Time-decayed popularity ranking for AR models.
//!
//! The score blends the net vote tally with a recency term so that fresh
//! uploads surface even before they collect votes:
//!
//! ```text
//! score = (up - down) * VOTE_WEIGHT * VOTE_SCALE + (RECENCY_SCALE / age_days) * RECENCY_WEIGHT
//! ```
//!
//! `age_days` counts whole days since upload plus one, so an upload made today
//! has age 1 and scores exactly 100 with no votes.

use chrono::{DateTime, Utc};

pub const VOTE_WEIGHT: f64 = 0.9;
pub const VOTE_SCALE: f64 = 100.0;
pub const RECENCY_WEIGHT: f64 = 0.1;
pub const RECENCY_SCALE: f64 = 1000.0;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days elapsed between `uploaded_at` and `now`, plus one.
///
/// Never less than 1; a timestamp in the future is treated as uploaded now.
pub fn age_days(uploaded_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
	let elapsed = now.signed_duration_since(uploaded_at).num_seconds();
	(elapsed.div_euclid(SECONDS_PER_DAY) + 1).max(1)
}

pub fn compute_hot_score(up_votes: u64, down_votes: u64, uploaded_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
	let net = up_votes as i128 - down_votes as i128;
	let time_component = RECENCY_SCALE / age_days(uploaded_at, now) as f64;

	net as f64 * VOTE_WEIGHT * VOTE_SCALE + time_component * RECENCY_WEIGHT
}

/// Score of a model that has just been created with no votes.
#[inline]
pub fn initial_hot_score(uploaded_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
	compute_hot_score(0, 0, uploaded_at, now)
}
