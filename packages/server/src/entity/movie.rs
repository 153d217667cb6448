use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    /// Mean of all user scores, 0.0 while unrated.
    pub score: f64,
    /// Number of distinct users who scored the movie.
    pub count: i32,
    /// Running updates applied since the score was last rebuilt exactly.
    #[sea_orm(default_value = 0)]
    pub updates_since_recompute: i32,
    pub image: String,

    #[sea_orm(has_many)]
    pub scores: HasMany<super::score::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
