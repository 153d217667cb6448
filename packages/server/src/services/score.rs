use std::sync::Arc;

use scoring::{MovieAggregate, ScoreContribution, ScoreValue, apply_score};
use tracing::instrument;

use super::ServiceError;
use crate::models::movie::MovieResponse;
use crate::models::score::ScoreRequest;
use crate::repository::{RatingStore, StoreError};

/// Records user scores and keeps each movie's average current.
pub struct ScoreService {
    store: Arc<dyn RatingStore>,
    recompute_interval: u32,
}

impl ScoreService {
    /// `recompute_interval` is the number of running updates, first-time or
    /// replacement, after which a movie's average is rebuilt from its stored
    /// scores. `0` never rebuilds.
    pub fn new(store: Arc<dyn RatingStore>, recompute_interval: u32) -> Self {
        Self {
            store,
            recompute_interval,
        }
    }

    /// Save `user_id`'s score for a movie, replacing any earlier one, and
    /// return the movie with its updated average.
    #[instrument(skip(self, request), fields(movie_id = request.movie_id, score = request.score))]
    pub async fn save_score(
        &self,
        user_id: i32,
        request: ScoreRequest,
    ) -> Result<MovieResponse, ServiceError> {
        let value = ScoreValue::new(request.score)?;

        let mut session = self.store.begin().await?;

        let movie = session
            .find_movie(request.movie_id)
            .await?
            .ok_or_else(|| ServiceError::ResourceNotFound("Movie not found".into()))?;
        let prior = session.find_prior_score(movie.id, user_id).await?;

        let current = MovieAggregate::try_from(&movie)?;
        let mut updated = apply_score(&current, prior, value.get())?;

        if self.should_recompute(&updated) {
            let mut values = session
                .other_contributions(movie.id, user_id)
                .await?
                .into_iter()
                .map(ScoreValue::new)
                .collect::<Result<Vec<_>, _>>()?;
            values.push(value);

            let exact = current.recompute(values);
            tracing::debug!(
                running = updated.score,
                exact = exact.score,
                count = exact.count,
                "Recomputed score from stored contributions"
            );
            updated = exact;
        }

        let count = i32::try_from(updated.count).map_err(|_| {
            StoreError::InvalidData(format!("score count overflow on movie {}", movie.id))
        })?;

        let contribution = ScoreContribution {
            movie_id: movie.id,
            user_id,
            value,
        };
        session.persist(&updated, &contribution).await?;
        session.commit().await?;

        tracing::info!(
            user_id,
            replaced = prior.is_some(),
            count = updated.count,
            "Score saved"
        );

        Ok(MovieResponse {
            score: updated.score,
            count,
            ..MovieResponse::from(movie)
        })
    }

    fn should_recompute(&self, updated: &MovieAggregate) -> bool {
        self.recompute_interval > 0 && updated.updates_since_recompute >= self.recompute_interval
    }
}
