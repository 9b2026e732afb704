//! AQI score calculation
//!
//! Global invariants enforced:
//! - Deterministic, total scoring (defined for every f64 input)
//! - Monotonic in each reading
//! - Result always within [0, 500]

use crate::readings::PollutantReadings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest possible score
pub const MIN_SCORE: u16 = 0;

/// Highest possible score
pub const MAX_SCORE: u16 = 500;

/// Clamped integer AQI score in [0, 500]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct AqiScore(u16);

impl AqiScore {
    /// Build a score, returning None outside [0, 500]
    pub fn new(value: u16) -> Option<Self> {
        if value <= MAX_SCORE {
            Some(AqiScore(value))
        } else {
            None
        }
    }

    /// Build a score from any integer, clamping to [0, 500]
    pub fn saturating(value: i64) -> Self {
        AqiScore(value.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u16)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for AqiScore {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        AqiScore::new(value).ok_or_else(|| format!("AQI score {} exceeds {}", value, MAX_SCORE))
    }
}

impl From<AqiScore> for u16 {
    fn from(score: AqiScore) -> u16 {
        score.0
    }
}

impl fmt::Display for AqiScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weighted sum of the readings before rounding
///
/// Formula:
/// raw = (pm25 / 500) * 300 + (no2 / 2000) * 100 + (o3 / 500) * 50 + (co / 50) * 50
///
/// Operation order is fixed; it decides which values land exactly on .5.
pub fn raw_score(readings: &PollutantReadings) -> f64 {
    (readings.pm25 / 500.0) * 300.0
        + (readings.no2 / 2000.0) * 100.0
        + (readings.o3 / 500.0) * 50.0
        + (readings.co / 50.0) * 50.0
}

/// Calculate the AQI score for a set of readings
///
/// Rounds half away from zero, then clamps to [0, 500]. A NaN sum scores 0.
pub fn score(readings: &PollutantReadings) -> AqiScore {
    let raw = raw_score(readings);
    if raw.is_nan() {
        return AqiScore(MIN_SCORE);
    }

    // Float-to-int casts saturate, so infinities land on the bounds
    AqiScore::saturating(raw.round() as i64)
}
