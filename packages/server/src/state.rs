use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::repository::{SeaMovieRepository, SeaRatingStore, SeaUserRepository};
use crate::services::{MovieService, ScoreService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub movies: Arc<MovieService>,
    pub scores: Arc<ScoreService>,
    pub users: Arc<UserService>,
}

impl AppState {
    /// Wire the services to SeaORM-backed stores on `db`.
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let movies = MovieService::new(Arc::new(SeaMovieRepository::new(db.clone())));
        let scores = ScoreService::new(
            Arc::new(SeaRatingStore::new(db.clone())),
            config.scoring.recompute_interval,
        );
        let users = UserService::new(Arc::new(SeaUserRepository::new(db)));

        Self {
            config,
            movies: Arc::new(movies),
            scores: Arc::new(scores),
            users: Arc::new(users),
        }
    }
}
