use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::*;
use scoring::{MovieAggregate, ScoreContribution};

use super::{MovieRow, RatingSession, RatingStore, StoreError};
use crate::entity::{movie, score};

/// Rating store backed by the `movie` and `score` tables.
#[derive(Clone)]
pub struct SeaRatingStore {
    db: DatabaseConnection,
}

impl SeaRatingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RatingStore for SeaRatingStore {
    async fn begin(&self) -> Result<Box<dyn RatingSession>, StoreError> {
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaRatingSession { txn }))
    }
}

/// A database transaction holding the movie row lock.
pub struct SeaRatingSession {
    txn: DatabaseTransaction,
}

#[async_trait]
impl RatingSession for SeaRatingSession {
    async fn find_movie(&mut self, id: i32) -> Result<Option<MovieRow>, StoreError> {
        Ok(movie::Entity::find_by_id(id)
            .lock(LockType::Update)
            .into_model::<MovieRow>()
            .one(&self.txn)
            .await?)
    }

    async fn find_prior_score(
        &mut self,
        movie_id: i32,
        user_id: i32,
    ) -> Result<Option<f64>, StoreError> {
        let prior = score::Entity::find_by_id((movie_id, user_id))
            .one(&self.txn)
            .await?;
        Ok(prior.map(|s| s.value))
    }

    async fn other_contributions(
        &mut self,
        movie_id: i32,
        user_id: i32,
    ) -> Result<Vec<f64>, StoreError> {
        Ok(score::Entity::find()
            .select_only()
            .column(score::Column::Value)
            .filter(score::Column::MovieId.eq(movie_id))
            .filter(score::Column::UserId.ne(user_id))
            .into_tuple::<f64>()
            .all(&self.txn)
            .await?)
    }

    async fn persist(
        &mut self,
        movie: &MovieAggregate,
        contribution: &ScoreContribution,
    ) -> Result<(), StoreError> {
        let now = chrono::Utc::now();
        let row = score::ActiveModel {
            movie_id: Set(contribution.movie_id),
            user_id: Set(contribution.user_id),
            value: Set(contribution.value.get()),
            updated_at: Set(now),
        };

        score::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([score::Column::MovieId, score::Column::UserId])
                    .update_columns([score::Column::Value, score::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.txn)
            .await?;

        let count = i32::try_from(movie.count).map_err(|_| {
            StoreError::InvalidData(format!("score count overflow on movie {}", movie.id))
        })?;
        let updates = i32::try_from(movie.updates_since_recompute).map_err(|_| {
            StoreError::InvalidData(format!("update counter overflow on movie {}", movie.id))
        })?;

        movie::Entity::update_many()
            .col_expr(movie::Column::Score, Expr::value(movie.score))
            .col_expr(movie::Column::Count, Expr::value(count))
            .col_expr(movie::Column::UpdatesSinceRecompute, Expr::value(updates))
            .col_expr(movie::Column::UpdatedAt, Expr::value(now))
            .filter(movie::Column::Id.eq(movie.id))
            .exec(&self.txn)
            .await?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.commit().await?;
        Ok(())
    }
}
