//! In-memory stores for service tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use sea_orm::DbErr;
use scoring::{MovieAggregate, ScoreContribution};
use tokio::sync::OwnedMutexGuard;

use crate::repository::{
    MovieFields, MoviePage, MovieRepository, MovieRow, RatingSession, RatingStore, StoreError,
    UserRepository, UserRoleRow, UserRow,
};

pub fn movie_fields(title: &str, image: &str) -> MovieFields {
    MovieFields {
        title: title.into(),
        image: image.into(),
    }
}

struct StoredUser {
    username: String,
    password: String,
    roles: Vec<String>,
}

#[derive(Default)]
struct State {
    movies: BTreeMap<i32, MovieRow>,
    scores: BTreeMap<(i32, i32), f64>,
    users: BTreeMap<i32, StoredUser>,
    fail_next_commit: bool,
}

/// Movie, score, and user tables kept in memory. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    session_lock: Arc<tokio::sync::Mutex<()>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_movie(&self, id: i32, title: &str, image: &str) {
        self.state().movies.insert(
            id,
            MovieRow {
                id,
                title: title.into(),
                score: 0.0,
                count: 0,
                updates_since_recompute: 0,
                image: image.into(),
            },
        );
    }

    /// Store a score and recompute the movie's aggregate exactly.
    pub fn add_score(&self, movie_id: i32, user_id: i32, value: f64) {
        let mut state = self.state();
        state.scores.insert((movie_id, user_id), value);

        let values: Vec<f64> = state
            .scores
            .iter()
            .filter(|((m, _), _)| *m == movie_id)
            .map(|(_, v)| *v)
            .collect();
        if let Some(movie) = state.movies.get_mut(&movie_id) {
            movie.count = values.len() as i32;
            movie.score = values.iter().sum::<f64>() / values.len() as f64;
        }
    }

    pub fn set_aggregate(&self, movie_id: i32, count: i32, score: f64) {
        if let Some(movie) = self.state().movies.get_mut(&movie_id) {
            movie.count = count;
            movie.score = score;
        }
    }

    pub fn add_user(&self, id: i32, username: &str, password: &str, roles: &[&str]) {
        self.state().users.insert(
            id,
            StoredUser {
                username: username.into(),
                password: password.into(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
        );
    }

    pub fn fail_next_commit(&self) {
        self.state().fail_next_commit = true;
    }

    pub fn movie(&self, id: i32) -> Option<MovieRow> {
        self.state().movies.get(&id).cloned()
    }

    pub fn prior_score(&self, movie_id: i32, user_id: i32) -> Option<f64> {
        self.state().scores.get(&(movie_id, user_id)).copied()
    }
}

#[async_trait]
impl MovieRepository for InMemoryStore {
    async fn search_by_title(
        &self,
        title: &str,
        page: u64,
        per_page: u64,
    ) -> Result<MoviePage, StoreError> {
        let needle = title.trim().to_lowercase();
        let matches: Vec<MovieRow> = self
            .state()
            .movies
            .values()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip((page.saturating_sub(1) * per_page) as usize)
            .take(per_page as usize)
            .collect();

        Ok(MoviePage { items, total })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<MovieRow>, StoreError> {
        Ok(self.movie(id))
    }

    async fn insert(&self, fields: MovieFields) -> Result<MovieRow, StoreError> {
        let mut state = self.state();
        let id = state.movies.keys().next_back().map_or(1, |max| max + 1);
        let row = MovieRow {
            id,
            title: fields.title,
            score: 0.0,
            count: 0,
            updates_since_recompute: 0,
            image: fields.image,
        };
        state.movies.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, fields: MovieFields) -> Result<Option<MovieRow>, StoreError> {
        let mut state = self.state();
        Ok(state.movies.get_mut(&id).map(|movie| {
            movie.title = fields.title;
            movie.image = fields.image;
            movie.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut state = self.state();
        if !state.movies.contains_key(&id) {
            return Ok(false);
        }
        if state.scores.keys().any(|(movie_id, _)| *movie_id == id) {
            return Err(StoreError::IntegrityViolation(format!(
                "movie {id} is referenced by scores"
            )));
        }
        state.movies.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl RatingStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn RatingSession>, StoreError> {
        let guard = self.session_lock.clone().lock_owned().await;
        Ok(Box::new(InMemorySession {
            store: self.clone(),
            pending: None,
            _guard: guard,
        }))
    }
}

struct InMemorySession {
    store: InMemoryStore,
    pending: Option<(MovieAggregate, ScoreContribution)>,
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl RatingSession for InMemorySession {
    async fn find_movie(&mut self, id: i32) -> Result<Option<MovieRow>, StoreError> {
        Ok(self.store.movie(id))
    }

    async fn find_prior_score(
        &mut self,
        movie_id: i32,
        user_id: i32,
    ) -> Result<Option<f64>, StoreError> {
        Ok(self.store.prior_score(movie_id, user_id))
    }

    async fn other_contributions(
        &mut self,
        movie_id: i32,
        user_id: i32,
    ) -> Result<Vec<f64>, StoreError> {
        Ok(self
            .store
            .state()
            .scores
            .iter()
            .filter(|((m, u), _)| *m == movie_id && *u != user_id)
            .map(|(_, v)| *v)
            .collect())
    }

    async fn persist(
        &mut self,
        movie: &MovieAggregate,
        contribution: &ScoreContribution,
    ) -> Result<(), StoreError> {
        self.pending = Some((movie.clone(), *contribution));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let InMemorySession { store, pending, .. } = *self;
        let mut state = store.state();
        if state.fail_next_commit {
            state.fail_next_commit = false;
            return Err(StoreError::Db(DbErr::Custom("commit failed".into())));
        }

        if let Some((movie, contribution)) = pending {
            state.scores.insert(
                (contribution.movie_id, contribution.user_id),
                contribution.value.get(),
            );
            if let Some(row) = state.movies.get_mut(&movie.id) {
                row.count = movie.count as i32;
                row.score = movie.score;
                row.updates_since_recompute = movie.updates_since_recompute as i32;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|(_, u)| u.username == username)
            .map(|(id, u)| UserRow {
                id: *id,
                username: u.username.clone(),
            }))
    }

    async fn search_user_and_roles(
        &self,
        username: &str,
    ) -> Result<Vec<UserRoleRow>, StoreError> {
        let state = self.state();
        let Some((id, user)) = state.users.iter().find(|(_, u)| u.username == username) else {
            return Ok(Vec::new());
        };

        Ok(user
            .roles
            .iter()
            .map(|role| UserRoleRow {
                user_id: *id,
                username: user.username.clone(),
                password: user.password.clone(),
                role: role.clone(),
            })
            .collect())
    }

    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<UserRow, StoreError> {
        let mut state = self.state();
        if state.users.values().any(|u| u.username == username) {
            return Err(StoreError::UniqueViolation(format!(
                "username {username} exists"
            )));
        }

        let id = state.users.keys().next_back().map_or(1, |max| max + 1);
        state.users.insert(
            id,
            StoredUser {
                username: username.into(),
                password: password_hash.into(),
                roles: vec![role.to_string()],
            },
        );
        Ok(UserRow {
            id,
            username: username.into(),
        })
    }
}
