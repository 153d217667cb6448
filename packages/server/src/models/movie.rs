use serde::{Deserialize, Serialize};

use crate::repository::{MovieFields, MovieRow};

pub use super::shared::Pagination;
use super::shared::{validate_image_url, validate_title};

/// Request body for creating or replacing a movie.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MovieRequest {
    /// Movie title (5-80 characters).
    #[schema(example = "The Witcher")]
    pub title: String,
    /// Poster URL.
    #[schema(example = "https://www.themoviedb.org/t/p/w533_and_h300_bestv2/jBJWaqoSCiARWtfV0GlqHrcdidd.jpg")]
    pub image: String,
}

/// Check the editable fields of a movie, returning the first problem found.
pub fn validate_movie_fields(fields: &MovieFields) -> Result<(), String> {
    validate_title(&fields.title)?;
    validate_image_url(&fields.image)?;
    Ok(())
}

impl From<MovieRequest> for MovieFields {
    fn from(req: MovieRequest) -> Self {
        Self {
            title: req.title.trim().to_string(),
            image: req.image.trim().to_string(),
        }
    }
}

/// A movie with its aggregated user score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MovieResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "The Witcher")]
    pub title: String,
    /// Average user score, 0.0 while unrated.
    #[schema(example = 4.5)]
    pub score: f64,
    /// Number of users who scored the movie.
    #[schema(example = 2)]
    pub count: i32,
    pub image: String,
}

impl From<MovieRow> for MovieResponse {
    fn from(m: MovieRow) -> Self {
        Self {
            id: m.id,
            title: m.title,
            score: m.score,
            count: m.count,
            image: m.image,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MovieListResponse {
    pub data: Vec<MovieResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovieListQuery {
    /// Case-insensitive title substring.
    pub title: Option<String>,
    /// Page number, 1-based.
    pub page: Option<u64>,
    /// Items per page (1-100, default 10).
    pub per_page: Option<u64>,
}
