//! The weighting model behind the reliability score.
//!
//! Three weights blend into one score: source trust, verification recency,
//! and field completeness, on fixed 0.4/0.4/0.2 shares.

use chrono::{Duration, NaiveDateTime};

use crate::validator::checks::is_present;
use crate::validator::types::RawResortRecord;

/// Blend shares for the composite score. They sum to 1.0, which keeps the
/// score inside [0,1] for any weight combination.
const SOURCE_SHARE: f64 = 0.4;
const RECENCY_SHARE: f64 = 0.4;
const COMPLETENESS_SHARE: f64 = 0.2;

/// Recency bands as (inclusive max age in hours, weight), tried in order.
/// Ages past the last band fall through to [`STALE_WEIGHT`].
///
/// | Age          | Weight |
/// |--------------|--------|
/// | <= 24h       | 1.0    |
/// | <= 72h       | 0.8    |
/// | > 72h        | 0.6    |
/// | no timestamp | 0.0    |
static RECENCY_BANDS: &[(i64, f64)] = &[(24, 1.0), (72, 0.8)];
const STALE_WEIGHT: f64 = 0.6;

/// Weight for how recently the record was verified. Unverified records get
/// zero; future-dated timestamps land in the freshest band.
pub fn recency_weight(verified_at: Option<NaiveDateTime>, now: NaiveDateTime) -> f64 {
    let Some(ts) = verified_at else {
        return 0.0;
    };

    let age = now - ts;
    for (max_hours, weight) in RECENCY_BANDS {
        if age <= Duration::hours(*max_hours) {
            return *weight;
        }
    }
    STALE_WEIGHT
}

/// Fraction of the required-field set that is present and non-empty.
pub fn completeness_weight(record: &RawResortRecord) -> f64 {
    let fields = record.required_fields();
    let present = fields.iter().filter(|(_, v)| is_present(*v)).count();
    present as f64 / fields.len() as f64
}

/// Blends the three weights into the composite score, rounded to two
/// decimals.
pub fn reliability_score(source_weight: f64, recency: f64, completeness: f64) -> f64 {
    round2(
        SOURCE_SHARE * source_weight
            + RECENCY_SHARE * recency
            + COMPLETENESS_SHARE * completeness,
    )
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
