use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::value::{MAX_SCORE, MIN_SCORE, ScoreValue};

/// Score summary of a single movie.
///
/// `score` is the mean of all contributed values and is only meaningful while
/// `count > 0`; an unrated movie carries `score == 0.0`.
/// `updates_since_recompute` counts running updates, first-time and
/// replacement alike, applied since the last exact rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieAggregate {
    pub id: i32,
    pub title: String,
    pub count: u32,
    pub score: f64,
    pub updates_since_recompute: u32,
}

/// One user's score for one movie.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub movie_id: i32,
    pub user_id: i32,
    pub value: ScoreValue,
}

impl MovieAggregate {
    /// An aggregate with no contributions.
    pub fn new(id: i32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            count: 0,
            score: 0.0,
            updates_since_recompute: 0,
        }
    }

    /// The average score, or `None` while nobody has rated the movie.
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then_some(self.score)
    }

    /// Running sum implied by the stored average and count.
    pub fn sum(&self) -> f64 {
        self.score * f64::from(self.count)
    }

    /// Rebuild the aggregate from the full set of contributed values.
    ///
    /// Used to discard the rounding error a long chain of running updates
    /// accumulates.
    pub fn recompute<I>(&self, values: I) -> Self
    where
        I: IntoIterator<Item = ScoreValue>,
    {
        let (count, sum) = values
            .into_iter()
            .fold((0u32, 0.0f64), |(count, sum), value| {
                (count.saturating_add(1), sum + value.get())
            });

        Self {
            count,
            score: mean(sum, count),
            updates_since_recompute: 0,
            ..self.clone()
        }
    }
}

/// Fold a first-time or replacement contribution into `movie`.
///
/// `prior` is the value this user previously gave the movie, if any. A first
/// contribution grows `count` by one; a replacement keeps `count` and swaps
/// the prior value out of the running sum. The input is never modified, so a
/// failed call leaves the caller's aggregate as it was.
pub fn apply_score(
    movie: &MovieAggregate,
    prior: Option<f64>,
    new_value: f64,
) -> Result<MovieAggregate, ScoreError> {
    let new_value = ScoreValue::new(new_value)?.get();
    let sum = movie.sum();

    let (count, sum) = match prior {
        None => (movie.count.saturating_add(1), sum + new_value),
        Some(_) if movie.count == 0 => {
            return Err(ScoreError::InconsistentAggregate { movie_id: movie.id });
        }
        Some(prior) => (movie.count, sum - prior + new_value),
    };

    Ok(MovieAggregate {
        count,
        score: mean(sum, count),
        updates_since_recompute: movie.updates_since_recompute.saturating_add(1),
        ..movie.clone()
    })
}

// The mean of in-range values is itself in range; clamping only trims
// rounding residue such as -1e-16.
fn mean(sum: f64, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (sum / f64::from(count)).clamp(MIN_SCORE, MAX_SCORE)
}
