//! Application services: the movie catalog, scoring, and user lookup.

pub mod movie;
pub mod score;
pub mod user;

#[cfg(test)]
pub(crate) mod fakes;

use scoring::ScoreError;
use thiserror::Error;

use crate::repository::StoreError;

pub use movie::MovieService;
pub use score::ScoreService;
pub use user::{UserDetails, UserService};

/// Domain-level failures reported by the services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    ResourceNotFound(String),
    /// The operation would break referential integrity.
    #[error("{0}")]
    Integrity(String),
    /// Rejected by the score rules: an out-of-range value, or an aggregate
    /// that contradicts its stored contributions.
    #[error(transparent)]
    Scoring(#[from] ScoreError),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    UsernameNotFound(String),
    #[error("Username is already taken")]
    UsernameTaken,
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::IntegrityViolation(detail) => {
                tracing::debug!("Store rejected write: {detail}");
                ServiceError::Integrity("Referential integrity failure".into())
            }
            other => ServiceError::Store(other),
        }
    }
}
