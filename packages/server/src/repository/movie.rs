use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;

use super::{MovieFields, MoviePage, MovieRepository, MovieRow, StoreError};
use crate::entity::{movie, score};
use crate::models::shared::escape_like;

/// Movie catalog backed by the `movie` table.
#[derive(Clone)]
pub struct SeaMovieRepository {
    db: DatabaseConnection,
}

impl SeaMovieRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieRepository for SeaMovieRepository {
    async fn search_by_title(
        &self,
        title: &str,
        page: u64,
        per_page: u64,
    ) -> Result<MoviePage, StoreError> {
        let mut select = movie::Entity::find();

        let term = escape_like(title.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(movie::Column::Title)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }

        let total = select
            .clone()
            .paginate(&self.db, per_page)
            .num_items()
            .await?;

        let items = select
            .order_by_asc(movie::Column::Id)
            .offset(Some(page.saturating_sub(1) * per_page))
            .limit(Some(per_page))
            .into_model::<MovieRow>()
            .all(&self.db)
            .await?;

        Ok(MoviePage { items, total })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<MovieRow>, StoreError> {
        Ok(movie::Entity::find_by_id(id)
            .into_model::<MovieRow>()
            .one(&self.db)
            .await?)
    }

    async fn insert(&self, fields: MovieFields) -> Result<MovieRow, StoreError> {
        let now = chrono::Utc::now();
        let new_movie = movie::ActiveModel {
            title: Set(fields.title),
            image: Set(fields.image),
            score: Set(0.0),
            count: Set(0),
            updates_since_recompute: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_movie.insert(&self.db).await?;
        Ok(model.into())
    }

    async fn update(&self, id: i32, fields: MovieFields) -> Result<Option<MovieRow>, StoreError> {
        let Some(existing) = movie::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: movie::ActiveModel = existing.into();
        active.title = Set(fields.title);
        active.image = Set(fields.image);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Some(model.into()))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        use sea_orm::sea_query::LockType;

        let txn = self.db.begin().await?;

        let locked = movie::Entity::find_by_id(id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        if locked.is_none() {
            return Ok(false);
        }

        let score_count = score::Entity::find()
            .filter(score::Column::MovieId.eq(id))
            .count(&txn)
            .await?;
        if score_count > 0 {
            return Err(StoreError::IntegrityViolation(format!(
                "movie {id} is referenced by {score_count} scores"
            )));
        }

        // FK on score.movie_id backs up the count above.
        movie::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(true)
    }
}
