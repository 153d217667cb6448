use async_trait::async_trait;
use sea_orm::*;

use super::{StoreError, UserRepository, UserRoleRow, UserRow};
use crate::entity::{user, user_role};

/// User accounts backed by the `user` and `user_role` tables.
#[derive(Clone)]
pub struct SeaUserRepository {
    db: DatabaseConnection,
}

impl SeaUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(found.map(|u| UserRow {
            id: u.id,
            username: u.username,
        }))
    }

    async fn search_user_and_roles(
        &self,
        username: &str,
    ) -> Result<Vec<UserRoleRow>, StoreError> {
        let Some(found) = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
        else {
            return Ok(Vec::new());
        };

        let roles = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(found.id))
            .order_by_asc(user_role::Column::Role)
            .all(&self.db)
            .await?;

        Ok(roles
            .into_iter()
            .map(|r| UserRoleRow {
                user_id: found.id,
                username: found.username.clone(),
                password: found.password.clone(),
                role: r.role,
            })
            .collect())
    }

    async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<UserRow, StoreError> {
        let txn = self.db.begin().await?;

        let new_user = user::ActiveModel {
            username: Set(username.to_string()),
            password: Set(password_hash.to_string()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        let created = new_user.insert(&txn).await?;

        user_role::ActiveModel {
            user_id: Set(created.id),
            role: Set(role.to_string()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(UserRow {
            id: created.id,
            username: created.username,
        })
    }
}
