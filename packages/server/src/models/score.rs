use serde::Deserialize;

/// Request body for scoring a movie.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ScoreRequest {
    /// Movie being scored.
    #[schema(example = 1)]
    pub movie_id: i32,
    /// Score between 0.0 and 5.0 inclusive.
    #[schema(example = 4.5)]
    pub score: f64,
}
