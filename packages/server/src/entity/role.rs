use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role held by every registered user.
pub const ROLE_CLIENT: &str = "ROLE_CLIENT";
/// Role allowed to manage the movie catalog.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub authority: String,

    #[sea_orm(has_many, via = "user_role")]
    pub users: HasMany<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
