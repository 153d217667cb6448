use std::sync::Arc;

use tracing::instrument;

use super::ServiceError;
use crate::repository::{StoreError, UserRepository, UserRow};

/// Credentials and roles of a user, as needed to authenticate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// User account lookup and registration.
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Resolve the user behind the current request.
    ///
    /// `username` is the identity established by the request layer; `None`
    /// means the request carried none.
    #[instrument(skip(self))]
    pub async fn authenticated(&self, username: Option<&str>) -> Result<UserRow, ServiceError> {
        let Some(username) = username else {
            return Err(ServiceError::UsernameNotFound("Invalid user".into()));
        };

        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::UsernameNotFound("Invalid user".into()))
    }

    /// Load a user with all of their roles.
    #[instrument(skip(self))]
    pub async fn load_user_by_username(&self, username: &str) -> Result<UserDetails, ServiceError> {
        let rows = self.repo.search_user_and_roles(username).await?;

        let Some(first) = rows.first() else {
            return Err(ServiceError::UsernameNotFound(format!(
                "User not found: {username}"
            )));
        };

        Ok(UserDetails {
            id: first.user_id,
            username: first.username.clone(),
            password_hash: first.password.clone(),
            roles: rows.iter().map(|r| r.role.clone()).collect(),
        })
    }

    /// Create an account holding `role`.
    #[instrument(skip(self, password_hash))]
    pub async fn register(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<UserRow, ServiceError> {
        match self.repo.insert(username, password_hash, role).await {
            Ok(user) => Ok(user),
            Err(StoreError::UniqueViolation(_)) => {
                tracing::debug!("Registration race condition: unique constraint caught on insert");
                Err(ServiceError::UsernameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }
}
