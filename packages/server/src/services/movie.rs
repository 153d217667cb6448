use std::sync::Arc;

use tracing::instrument;

use super::ServiceError;
use crate::models::movie::{
    MovieListResponse, MovieResponse, Pagination, validate_movie_fields,
};
use crate::repository::{MovieFields, MovieRepository};

/// Movie catalog operations.
pub struct MovieService {
    repo: Arc<dyn MovieRepository>,
}

impl MovieService {
    pub fn new(repo: Arc<dyn MovieRepository>) -> Self {
        Self { repo }
    }

    /// List movies whose title contains `title`, one page at a time.
    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        title: &str,
        page: u64,
        per_page: u64,
    ) -> Result<MovieListResponse, ServiceError> {
        let result = self.repo.search_by_title(title, page, per_page).await?;

        Ok(MovieListResponse {
            data: result.items.into_iter().map(MovieResponse::from).collect(),
            pagination: Pagination::new(page, per_page, result.total),
        })
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<MovieResponse, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(MovieResponse::from)
            .ok_or_else(|| ServiceError::ResourceNotFound("Movie not found".into()))
    }

    #[instrument(skip(self, new_movie), fields(title = %new_movie.title))]
    pub async fn insert(&self, new_movie: MovieFields) -> Result<MovieResponse, ServiceError> {
        validate_movie_fields(&new_movie).map_err(ServiceError::Validation)?;

        let movie = self.repo.insert(new_movie).await?;
        tracing::info!(movie_id = movie.id, "Movie created");
        Ok(movie.into())
    }

    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        id: i32,
        changes: MovieFields,
    ) -> Result<MovieResponse, ServiceError> {
        validate_movie_fields(&changes).map_err(ServiceError::Validation)?;

        self.repo
            .update(id, changes)
            .await?
            .map(MovieResponse::from)
            .ok_or_else(|| ServiceError::ResourceNotFound("Movie not found".into()))
    }

    /// Delete a movie that nobody has scored yet.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::ResourceNotFound("Movie not found".into()));
        }

        tracing::info!(movie_id = id, "Movie deleted");
        Ok(())
    }
}
