use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::info;

use crate::config::AuthConfig;
use crate::entity::{role, user, user_role};
use crate::utils::hash;

/// Roles seeded on startup.
const DEFAULT_ROLES: &[&str] = &[role::ROLE_CLIENT, role::ROLE_ADMIN];

/// Seed the `role` table with defaults.
pub async fn seed_roles(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for &authority in DEFAULT_ROLES {
        let model = role::ActiveModel {
            authority: Set(authority.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(
                OnConflict::column(role::Column::Authority)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new roles", inserted);
    }

    Ok(())
}

/// Create the configured administrator account if it does not exist yet.
///
/// The account holds both `ROLE_ADMIN` and `ROLE_CLIENT`. An existing user
/// with the same name is left untouched.
pub async fn ensure_bootstrap_admin(db: &DatabaseConnection, auth: &AuthConfig) -> anyhow::Result<()> {
    let Some(admin) = &auth.bootstrap_admin else {
        return Ok(());
    };

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(admin.username.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash::hash_password(&admin.password)
        .map_err(|e| anyhow::anyhow!("Password hash error: {}", e))?;

    let txn = db.begin().await?;
    let created = user::ActiveModel {
        username: Set(admin.username.clone()),
        password: Set(password_hash),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for &authority in DEFAULT_ROLES {
        user_role::ActiveModel {
            user_id: Set(created.id),
            role: Set(authority.to_string()),
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    info!(username = %admin.username, "Created bootstrap admin account");
    Ok(())
}
