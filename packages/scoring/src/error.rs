use thiserror::Error;

/// Errors raised while folding a contribution into a movie aggregate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// The submitted value is not a finite number within the score range.
    #[error("Score must be between 0 and 5, got {value}")]
    InvalidScoreValue { value: f64 },

    /// A replacement was requested for a movie that has no contributions.
    #[error("Movie {movie_id} has a prior score but no recorded contributions")]
    InconsistentAggregate { movie_id: i32 },
}
