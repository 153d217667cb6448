use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Lowest score a user may give.
pub const MIN_SCORE: f64 = 0.0;
/// Highest score a user may give.
pub const MAX_SCORE: f64 = 5.0;

/// A score known to be finite and within `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ScoreValue(f64);

impl ScoreValue {
    pub fn new(value: f64) -> Result<Self, ScoreError> {
        if value.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScoreError::InvalidScoreValue { value })
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ScoreValue {
    type Error = ScoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScoreValue> for f64 {
    fn from(value: ScoreValue) -> Self {
        value.0
    }
}
