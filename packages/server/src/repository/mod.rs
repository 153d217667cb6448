//! Storage traits used by the services, with their SeaORM implementations.

pub mod movie;
pub mod score;
pub mod user;

use async_trait::async_trait;
use sea_orm::{DbErr, FromQueryResult, SqlErr};
use scoring::{MovieAggregate, ScoreContribution};
use thiserror::Error;

pub use movie::SeaMovieRepository;
pub use score::SeaRatingStore;
pub use user::SeaUserRepository;

/// Errors surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write was rejected because other records still reference the target.
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),
    /// A unique constraint rejected the write.
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    /// A stored value does not fit the domain type.
    #[error("invalid stored data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                StoreError::IntegrityViolation(detail)
            }
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::UniqueViolation(detail),
            _ => StoreError::Db(err),
        }
    }
}

/// A movie as read from the catalog.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct MovieRow {
    pub id: i32,
    pub title: String,
    pub score: f64,
    pub count: i32,
    pub updates_since_recompute: i32,
    pub image: String,
}

impl From<crate::entity::movie::Model> for MovieRow {
    fn from(m: crate::entity::movie::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            score: m.score,
            count: m.count,
            updates_since_recompute: m.updates_since_recompute,
            image: m.image,
        }
    }
}

impl TryFrom<&MovieRow> for MovieAggregate {
    type Error = StoreError;

    fn try_from(row: &MovieRow) -> Result<Self, Self::Error> {
        let count = u32::try_from(row.count).map_err(|_| {
            StoreError::InvalidData(format!("movie {} has count {}", row.id, row.count))
        })?;
        let updates_since_recompute = u32::try_from(row.updates_since_recompute).map_err(|_| {
            StoreError::InvalidData(format!(
                "movie {} has updates_since_recompute {}",
                row.id, row.updates_since_recompute
            ))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title.clone(),
            count,
            score: row.score,
            updates_since_recompute,
        })
    }
}

/// Editable movie fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieFields {
    pub title: String,
    pub image: String,
}

/// One page of movies plus the number of matches across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct MoviePage {
    pub items: Vec<MovieRow>,
    pub total: u64,
}

#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Case-insensitive title substring search ordered by id. `page` is 1-based.
    async fn search_by_title(
        &self,
        title: &str,
        page: u64,
        per_page: u64,
    ) -> Result<MoviePage, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<MovieRow>, StoreError>;

    /// Insert an unrated movie.
    async fn insert(&self, fields: MovieFields) -> Result<MovieRow, StoreError>;

    /// Replace the editable fields. Returns `None` when the movie is missing.
    async fn update(&self, id: i32, fields: MovieFields) -> Result<Option<MovieRow>, StoreError>;

    /// Delete a movie. Returns `false` when it does not exist and fails with
    /// [`StoreError::IntegrityViolation`] while scores still reference it.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

/// Opens consistency boundaries for score updates.
#[async_trait]
pub trait RatingStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn RatingSession>, StoreError>;
}

/// A unit of work on one movie's scores.
///
/// The movie read by [`RatingSession::find_movie`] stays locked against other
/// sessions until the session is committed or dropped. Dropping without
/// [`RatingSession::commit`] discards every write.
#[async_trait]
pub trait RatingSession: Send {
    async fn find_movie(&mut self, id: i32) -> Result<Option<MovieRow>, StoreError>;

    async fn find_prior_score(
        &mut self,
        movie_id: i32,
        user_id: i32,
    ) -> Result<Option<f64>, StoreError>;

    /// Stored contribution values for the movie from every user but `user_id`.
    async fn other_contributions(
        &mut self,
        movie_id: i32,
        user_id: i32,
    ) -> Result<Vec<f64>, StoreError>;

    /// Upsert the contribution and write the aggregate's count, score and
    /// update counter.
    async fn persist(
        &mut self,
        movie: &MovieAggregate,
        contribution: &ScoreContribution,
    ) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// A user joined with one of its roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoleRow {
    pub user_id: i32,
    pub username: String,
    pub password: String,
    pub role: String,
}

/// A user account without credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError>;

    /// One row per role. Empty when the user is unknown or holds no role.
    async fn search_user_and_roles(&self, username: &str)
    -> Result<Vec<UserRoleRow>, StoreError>;

    /// Create a user holding a single role. A taken username yields
    /// [`StoreError::UniqueViolation`].
    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<UserRow, StoreError>;
}
